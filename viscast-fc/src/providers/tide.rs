//! Tide predictions client
//!
//! Fetches the day's water level series from the NOAA CO-OPS predictions API
//! and derives tide stage and rate from the last two points: rising if the
//! later level exceeds the earlier, rate as the absolute difference.

use super::ProviderError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::time::Duration;
use viscast_common::models::TideStage;

const TIDE_BASE_URL: &str = "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter";

/// Observed window for deriving the tide rate, matching the forecast's
/// "ft over the window" display
pub const DEFAULT_WINDOW_HOURS: u32 = 12;

/// One point of the predicted water level series
#[derive(Debug, Clone, PartialEq)]
pub struct TidePoint {
    pub t: NaiveDateTime,
    pub level_ft: f64,
}

/// Derived tide movement for the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TideMovement {
    pub stage: TideStage,
    /// Absolute water level change between the last two points, in feet
    pub rate_ft: f64,
}

/// NOAA CO-OPS predictions response
#[derive(Debug, Deserialize)]
struct PredictionsResponse {
    predictions: Option<Vec<Prediction>>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    /// Timestamp, "YYYY-MM-DD HH:MM"
    t: String,
    /// Water level in feet, as a string
    v: String,
}

/// Tide predictions API client
pub struct TideClient {
    http_client: reqwest::Client,
}

impl TideClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: super::http_client(timeout)?,
        })
    }

    /// Fetch the hourly predicted water levels for a station over the
    /// trailing window, oldest first (as the API returns them).
    pub async fn fetch(
        &self,
        station: &str,
        window_hours: u32,
    ) -> Result<Vec<TidePoint>, ProviderError> {
        let begin = (chrono::Local::now()
            - chrono::Duration::hours(i64::from(window_hours)))
        .format("%Y%m%d %H:%M");
        let url = format!(
            "{}?product=predictions&application=viscast&station={}&begin_date={}&range={}&datum=MLLW&time_zone=lst_ldt&units=english&interval=h&format=json",
            TIDE_BASE_URL, station, begin, window_hours
        );

        tracing::debug!(station, url = %url, "Querying tide predictions");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let parsed: PredictionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let predictions = parsed
            .predictions
            .ok_or_else(|| ProviderError::MissingData("no predictions array".to_string()))?;

        let mut points = Vec::with_capacity(predictions.len());
        for p in predictions {
            let t = NaiveDateTime::parse_from_str(&p.t, "%Y-%m-%d %H:%M")
                .map_err(|e| ProviderError::Parse(format!("bad timestamp {:?}: {}", p.t, e)))?;
            let level_ft: f64 = p
                .v
                .trim()
                .parse()
                .map_err(|_| ProviderError::Parse(format!("bad water level {:?}", p.v)))?;
            points.push(TidePoint { t, level_ft });
        }

        tracing::info!(station, points = points.len(), "Tide predictions fetched");
        Ok(points)
    }
}

/// Derive tide stage and rate from the last two points of the series.
///
/// Fewer than two points cannot establish a direction and reports the tide
/// source as missing, which sends the tide fields to their defaults.
pub fn derive_tide(points: &[TidePoint]) -> Result<TideMovement, ProviderError> {
    let n = points.len();
    if n < 2 {
        return Err(ProviderError::MissingData(format!(
            "need two tide points to derive stage, got {}",
            n
        )));
    }
    let earlier = &points[n - 2];
    let later = &points[n - 1];
    let stage = if later.level_ft > earlier.level_ft {
        TideStage::Rising
    } else {
        TideStage::Falling
    };
    Ok(TideMovement {
        stage,
        rate_ft: (later.level_ft - earlier.level_ft).abs(),
    })
}

/// Current display label for a tide stage, as the forecast table shows it
pub fn current_label(stage: TideStage) -> &'static str {
    match stage {
        TideStage::Rising => "W (up)",
        TideStage::Falling => "E (down)",
    }
}
