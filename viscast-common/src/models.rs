//! Core data models shared across the viscast crates
//!
//! The scoring pipeline works entirely on these types: static
//! [`SiteProfile`]s, one [`EnvironmentalSnapshot`] per forecast run, raw
//! [`DiveLogEntry`] rows from the append-only log, and the ephemeral
//! [`ForecastRow`]s handed to the presentation surface.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static physical profile of a dive site, used as scoring priors.
///
/// Loaded once at startup and never mutated. `base_score` is the assumed
/// visibility bucket (1-5) under typical conditions; the fractional fields
/// describe how strongly live conditions act on this site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Unique site name (registry key and display label)
    pub name: String,
    /// Assumed baseline visibility bucket, 1-5
    pub base_score: u8,
    /// How exposed the site is to open-ocean swell, 0-1
    pub swell_exposure: f64,
    /// How strongly rainfall runoff degrades this site, 0-1
    pub runoff_sensitivity: f64,
    /// Kelp canopy damping factor, 0-1 (1 = fully sheltered by kelp)
    pub kelp_index: f64,
    /// Optional webcam URL for the site
    #[serde(default)]
    pub camera_url: Option<String>,
}

impl SiteProfile {
    /// Validate field ranges. Registry construction fails fast on the first
    /// out-of-range profile rather than producing a partially valid table.
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.base_score) {
            return Err(Error::InvalidProfile {
                site: self.name.clone(),
                field: "base_score",
                value: self.base_score.to_string(),
            });
        }
        for (field, value) in [
            ("swell_exposure", self.swell_exposure),
            ("runoff_sensitivity", self.runoff_sensitivity),
            ("kelp_index", self.kelp_index),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(Error::InvalidProfile {
                    site: self.name.clone(),
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Five-level categorical underwater-visibility range.
///
/// Order-isomorphic to the integer score 1-5. The `Display` strings are the
/// exact values stored in the dive log, so the same mapping interprets
/// logged observations and renders computed scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VisibilityBucket {
    /// Less than 4 ft
    Under4Ft,
    /// 4-6 ft
    Ft4To6,
    /// 6-8 ft
    Ft6To8,
    /// 8-10 ft
    Ft8To10,
    /// 15 ft and up
    Over15Ft,
}

impl VisibilityBucket {
    /// Integer score equivalent, 1-5
    pub fn ordinal(self) -> u8 {
        match self {
            VisibilityBucket::Under4Ft => 1,
            VisibilityBucket::Ft4To6 => 2,
            VisibilityBucket::Ft6To8 => 3,
            VisibilityBucket::Ft8To10 => 4,
            VisibilityBucket::Over15Ft => 5,
        }
    }

    /// Bucket for an integer score 1-5
    pub fn from_ordinal(score: u8) -> Option<Self> {
        match score {
            1 => Some(VisibilityBucket::Under4Ft),
            2 => Some(VisibilityBucket::Ft4To6),
            3 => Some(VisibilityBucket::Ft6To8),
            4 => Some(VisibilityBucket::Ft8To10),
            5 => Some(VisibilityBucket::Over15Ft),
            _ => None,
        }
    }

    /// All buckets in ascending order
    pub fn all() -> [VisibilityBucket; 5] {
        [
            VisibilityBucket::Under4Ft,
            VisibilityBucket::Ft4To6,
            VisibilityBucket::Ft6To8,
            VisibilityBucket::Ft8To10,
            VisibilityBucket::Over15Ft,
        ]
    }
}

impl fmt::Display for VisibilityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VisibilityBucket::Under4Ft => "<4 ft",
            VisibilityBucket::Ft4To6 => "4\u{2013}6 ft",
            VisibilityBucket::Ft6To8 => "6\u{2013}8 ft",
            VisibilityBucket::Ft8To10 => "8\u{2013}10 ft",
            VisibilityBucket::Over15Ft => "15+ ft",
        };
        f.write_str(s)
    }
}

/// Unparseable visibility string from a log row.
///
/// Rows carrying one are excluded from calibration but stay in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBucket(pub String);

impl fmt::Display for InvalidBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized visibility value: {:?}", self.0)
    }
}

impl std::error::Error for InvalidBucket {}

impl FromStr for VisibilityBucket {
    type Err = InvalidBucket;

    /// Parse a logged visibility string.
    ///
    /// Input is trimmed; both the en-dash form written by the forecast
    /// surface and the ASCII-hyphen form from hand-edited logs are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "<4 ft" => Ok(VisibilityBucket::Under4Ft),
            "4\u{2013}6 ft" | "4-6 ft" => Ok(VisibilityBucket::Ft4To6),
            "6\u{2013}8 ft" | "6-8 ft" => Ok(VisibilityBucket::Ft6To8),
            "8\u{2013}10 ft" | "8-10 ft" => Ok(VisibilityBucket::Ft8To10),
            "15+ ft" => Ok(VisibilityBucket::Over15Ft),
            other => Err(InvalidBucket(other.to_string())),
        }
    }
}

/// Direction of tide movement over the observed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideStage {
    Rising,
    Falling,
}

impl fmt::Display for TideStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideStage::Rising => f.write_str("Rising"),
            TideStage::Falling => f.write_str("Falling"),
        }
    }
}

/// One live snapshot field, for default-provenance reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotField {
    SwellHeight,
    SwellPeriod,
    SwellDirection,
    WindSpeed,
    WindDirection,
    TideStage,
    TideRate,
    RainTotal,
    SeaSurfaceTemp,
    Chlorophyll,
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SnapshotField::SwellHeight => "swell height",
            SnapshotField::SwellPeriod => "swell period",
            SnapshotField::SwellDirection => "swell direction",
            SnapshotField::WindSpeed => "wind speed",
            SnapshotField::WindDirection => "wind direction",
            SnapshotField::TideStage => "tide stage",
            SnapshotField::TideRate => "tide rate",
            SnapshotField::RainTotal => "rain total",
            SnapshotField::SeaSurfaceTemp => "sea surface temp",
            SnapshotField::Chlorophyll => "chlorophyll",
        };
        f.write_str(s)
    }
}

/// Record of one snapshot field that fell back to its default constant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultedField {
    pub field: SnapshotField,
    /// Cause of the fallback (timeout, HTTP status, parse failure, offline)
    pub cause: String,
}

/// Neutral default constants for snapshot fields whose source is unavailable.
///
/// Chosen so that a defaulted field fires no scoring rule: a dead data
/// source must not bias any site's score. Tide defaults are fixed by the
/// forecast contract (rate 0, Rising, "W (up)").
pub mod snapshot_defaults {
    use super::TideStage;

    pub const SWELL_HEIGHT_FT: f64 = 2.5;
    pub const SWELL_PERIOD_S: f64 = 13.0;
    pub const SWELL_DIRECTION: &str = "W";
    pub const WIND_SPEED_KT: f64 = 6.0;
    pub const WIND_DIRECTION: &str = "NW";
    pub const TIDE_STAGE: TideStage = TideStage::Rising;
    pub const TIDE_RATE_FT: f64 = 0.0;
    pub const CURRENT: &str = "W (up)";
    pub const RAIN_TOTAL_IN: f64 = 0.0;
    pub const SEA_SURFACE_TEMP_F: f64 = 62.0;
    pub const CHLOROPHYLL_MG_M3: f64 = 1.0;
}

/// One consistent set of live environmental readings shared by all sites in
/// a single forecast run.
///
/// Always fully populated: any field whose source was unavailable carries
/// its documented default and an entry in `defaulted` naming the cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalSnapshot {
    /// Significant swell height in feet
    pub swell_height_ft: f64,
    /// Dominant swell period in seconds
    pub swell_period_s: f64,
    /// Swell direction as a compass point ("W", "SSW", ...)
    pub swell_direction: String,
    /// Wind speed in knots
    pub wind_speed_kt: f64,
    /// Wind direction as a compass point
    pub wind_direction: String,
    /// Tide movement direction over the observed window
    pub tide_stage: TideStage,
    /// Magnitude of water level change over the observed window, in feet
    pub tide_rate_ft: f64,
    /// Current display label derived from the tide stage, e.g. "W (up)"
    pub current: String,
    /// Accumulated rainfall proxy in inches
    pub rain_total_in: f64,
    /// Sea surface temperature in degrees Fahrenheit
    pub sea_surface_temp_f: f64,
    /// Near-surface chlorophyll concentration in mg/m3
    pub chlorophyll_mg_m3: f64,
    /// Fields that fell back to their defaults, with causes
    pub defaulted: Vec<DefaultedField>,
}

impl EnvironmentalSnapshot {
    /// The all-default snapshot, every field flagged with the given cause.
    pub fn defaults(cause: &str) -> Self {
        use snapshot_defaults as d;
        let defaulted = [
            SnapshotField::SwellHeight,
            SnapshotField::SwellPeriod,
            SnapshotField::SwellDirection,
            SnapshotField::WindSpeed,
            SnapshotField::WindDirection,
            SnapshotField::TideStage,
            SnapshotField::TideRate,
            SnapshotField::RainTotal,
            SnapshotField::SeaSurfaceTemp,
            SnapshotField::Chlorophyll,
        ]
        .into_iter()
        .map(|field| DefaultedField {
            field,
            cause: cause.to_string(),
        })
        .collect();

        Self {
            swell_height_ft: d::SWELL_HEIGHT_FT,
            swell_period_s: d::SWELL_PERIOD_S,
            swell_direction: d::SWELL_DIRECTION.to_string(),
            wind_speed_kt: d::WIND_SPEED_KT,
            wind_direction: d::WIND_DIRECTION.to_string(),
            tide_stage: d::TIDE_STAGE,
            tide_rate_ft: d::TIDE_RATE_FT,
            current: d::CURRENT.to_string(),
            rain_total_in: d::RAIN_TOTAL_IN,
            sea_surface_temp_f: d::SEA_SURFACE_TEMP_F,
            chlorophyll_mg_m3: d::CHLOROPHYLL_MG_M3,
            defaulted,
        }
    }

    /// Whether a given field fell back to its default
    pub fn is_defaulted(&self, field: SnapshotField) -> bool {
        self.defaulted.iter().any(|d| d.field == field)
    }

    /// Swell display string, e.g. "3.2 ft @ 14s W"
    pub fn swell_label(&self) -> String {
        format!(
            "{:.1} ft @ {:.0}s {}",
            self.swell_height_ft, self.swell_period_s, self.swell_direction
        )
    }

    /// Wind display string, e.g. "8 kt NW"
    pub fn wind_label(&self) -> String {
        format!("{:.0} kt {}", self.wind_speed_kt, self.wind_direction)
    }
}

/// One raw row from the append-only dive log, as stored.
///
/// Fields are kept as strings: the log file is user data and a row is never
/// rejected for bad values. Missing columns default to empty strings; extra
/// columns are preserved under synthetic names in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiveLogEntry {
    pub date: String,
    pub time: String,
    pub site: String,
    /// Observed visibility as a display string, trimmed of whitespace
    pub visibility: String,
    pub notes: String,
    pub catch: String,
    /// Extra columns beyond the expected header, as (name, value) pairs
    #[serde(default)]
    pub extras: Vec<(String, String)>,
}

impl DiveLogEntry {
    /// Parse the observed visibility into a bucket, if it is recognizable.
    pub fn bucket(&self) -> Option<VisibilityBucket> {
        self.visibility.parse().ok()
    }
}

/// One per-site output row of a forecast run.
///
/// Created fresh every run and discarded after presentation; the snapshot
/// display fields are carried through as preformatted strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    pub site: String,
    pub bucket: VisibilityBucket,
    /// Final clamped score, 1-5
    pub score: u8,
    /// Integer correction applied from logged history
    pub calibration_delta: i32,
    pub tide: String,
    pub current: String,
    pub swell: String,
    pub wind: String,
}
