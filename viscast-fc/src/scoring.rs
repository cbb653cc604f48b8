//! Visibility scoring engine
//!
//! Pure and deterministic: identical inputs always yield the identical
//! score, with no clock or randomness anywhere. The running total starts at
//! the calibrated baseline, every rule applies as an independent additive
//! adjustment, and a single round-and-clamp happens after all rules so that
//! stacked penalties cannot create intermediate-clamping artifacts.

use viscast_common::models::{EnvironmentalSnapshot, SiteProfile, VisibilityBucket};

/// Swell height as this site actually feels it: open-ocean swell scaled by
/// exposure and damped by kelp canopy.
pub fn exposed_swell(profile: &SiteProfile, snapshot: &EnvironmentalSnapshot) -> f64 {
    snapshot.swell_height_ft * profile.swell_exposure * (1.0 - profile.kelp_index)
}

/// Score one site against the shared snapshot, returning 1-5.
///
/// Rules, applied to `base_score + calibration_delta`:
/// 1. exposed swell > 3 ft or wind > 10 kt: -1
/// 2. otherwise, exposed swell < 2 ft and wind < 5 kt: +1
/// 3. tide rate > 1.5 ft over the window: -1
/// 4. rain x runoff sensitivity > 0.1 in: -1
/// 5. SST below 57 F: -1
/// 6. chlorophyll above 2 mg/m3: -1
///
/// Rules 1 and 2 are mutually exclusive; everything else is independent and
/// can stack in a single pass. The final total is rounded half away from
/// zero, then clamped to [1, 5].
pub fn score_site(
    profile: &SiteProfile,
    snapshot: &EnvironmentalSnapshot,
    calibration_delta: i32,
) -> u8 {
    let mut total = f64::from(profile.base_score) + f64::from(calibration_delta);

    let exposed = exposed_swell(profile, snapshot);
    if exposed > 3.0 || snapshot.wind_speed_kt > 10.0 {
        total -= 1.0;
    } else if exposed < 2.0 && snapshot.wind_speed_kt < 5.0 {
        total += 1.0;
    }

    if snapshot.tide_rate_ft > 1.5 {
        total -= 1.0;
    }
    if snapshot.rain_total_in * profile.runoff_sensitivity > 0.1 {
        total -= 1.0;
    }
    if snapshot.sea_surface_temp_f < 57.0 {
        total -= 1.0;
    }
    if snapshot.chlorophyll_mg_m3 > 2.0 {
        total -= 1.0;
    }

    total.round().clamp(1.0, 5.0) as u8
}

/// Bucket shown for a computed score
pub fn score_bucket(score: u8) -> VisibilityBucket {
    VisibilityBucket::from_ordinal(score.clamp(1, 5))
        .expect("clamped score is always a valid ordinal")
}

/// Static scoring-rule breakdown shown with every forecast
pub fn rule_summary() -> &'static str {
    "Forecast scoring breakdown:\n\
     - Exposed swell > 3 ft or wind > 10 kt -> -1\n\
     - Exposed swell < 2 ft and wind < 5 kt -> +1\n\
     - Tide rate > 1.5 ft over the window -> -1\n\
     - Rain x runoff sensitivity > 0.1 in -> -1\n\
     - SST < 57 F -> -1\n\
     - Chlorophyll > 2 mg/m3 -> -1\n\
     Exposed swell = swell height x site exposure x (1 - kelp index).\n\
     Score starts at the site baseline plus the log-derived adjustment\n\
     and is clamped to 1-5 after all rules."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(base: u8, exposure: f64, runoff: f64, kelp: f64) -> SiteProfile {
        SiteProfile {
            name: "Test Cove".to_string(),
            base_score: base,
            swell_exposure: exposure,
            runoff_sensitivity: runoff,
            kelp_index: kelp,
            camera_url: None,
        }
    }

    /// Snapshot where no rule fires, starting from the neutral defaults.
    fn neutral_snapshot() -> EnvironmentalSnapshot {
        EnvironmentalSnapshot::defaults("test")
    }

    #[test]
    fn test_swell_penalty() {
        // exposed swell = 4 * 1 * (1 - 0) = 4 > 3 -> -1
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 4.0;
        snapshot.wind_speed_kt = 3.0;
        snapshot.sea_surface_temp_f = 60.0;
        snapshot.chlorophyll_mg_m3 = 1.0;
        let p = profile(4, 1.0, 0.2, 0.0);
        assert_eq!(score_site(&p, &snapshot, 0), 3);
    }

    #[test]
    fn test_calm_bonus() {
        // exposed swell = 1.5 < 2 and wind 3 < 5 -> +1
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 1.5;
        snapshot.wind_speed_kt = 3.0;
        let p = profile(3, 1.0, 0.2, 0.0);
        assert_eq!(score_site(&p, &snapshot, 0), 4);
    }

    #[test]
    fn test_four_penalties_clamp_to_floor() {
        // base 2, swell/wind neutral, then tide + rain + SST + chlorophyll
        // all fire: 2 - 4 = -2, clamped to 1
        let mut snapshot = neutral_snapshot();
        snapshot.tide_rate_ft = 2.0;
        snapshot.rain_total_in = 0.6;
        snapshot.sea_surface_temp_f = 54.0;
        snapshot.chlorophyll_mg_m3 = 3.5;
        let p = profile(2, 1.0, 0.5, 0.0);
        assert_eq!(score_site(&p, &snapshot, 0), 1);
    }

    #[test]
    fn test_upper_clamp() {
        // base 4 + delta 2 + calm bonus = 7, clamped to 5
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 1.0;
        snapshot.wind_speed_kt = 2.0;
        let p = profile(4, 1.0, 0.2, 0.0);
        assert_eq!(score_site(&p, &snapshot, 2), 5);
    }

    #[test]
    fn test_wind_alone_triggers_penalty() {
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 1.0;
        snapshot.wind_speed_kt = 15.0;
        let p = profile(3, 1.0, 0.2, 0.0);
        // Penalty branch wins; the calm bonus is unreachable (else-if)
        assert_eq!(score_site(&p, &snapshot, 0), 2);
    }

    #[test]
    fn test_kelp_damps_swell() {
        // 4 ft swell, full exposure, but kelp 0.6: exposed = 1.6 < 2,
        // wind 3 < 5 -> the same swell turns into a bonus
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 4.0;
        snapshot.wind_speed_kt = 3.0;
        let p = profile(3, 1.0, 0.2, 0.6);
        assert_eq!(score_site(&p, &snapshot, 0), 4);
    }

    #[test]
    fn test_rule_thresholds_are_strict() {
        let p = profile(3, 1.0, 1.0, 0.0);

        // Exactly at each threshold: nothing fires
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 3.0; // exposed == 3, not > 3
        snapshot.wind_speed_kt = 10.0; // not > 10
        snapshot.tide_rate_ft = 1.5; // not > 1.5
        snapshot.rain_total_in = 0.1; // 0.1 * 1.0 == 0.1, not > 0.1
        snapshot.sea_surface_temp_f = 57.0; // not < 57
        snapshot.chlorophyll_mg_m3 = 2.0; // not > 2
        assert_eq!(score_site(&p, &snapshot, 0), 3);

        // exposed == 2 is not < 2: no calm bonus either
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 2.0;
        snapshot.wind_speed_kt = 3.0;
        assert_eq!(score_site(&p, &snapshot, 0), 3);
    }

    #[test]
    fn test_negative_delta_applies_before_rules() {
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 1.0;
        snapshot.wind_speed_kt = 2.0;
        let p = profile(4, 1.0, 0.2, 0.0);
        // 4 - 2 + 1 = 3
        assert_eq!(score_site(&p, &snapshot, -2), 3);
    }

    #[test]
    fn test_score_always_in_range() {
        let snapshots = {
            let mut worst = neutral_snapshot();
            worst.swell_height_ft = 12.0;
            worst.wind_speed_kt = 30.0;
            worst.tide_rate_ft = 4.0;
            worst.rain_total_in = 2.0;
            worst.sea_surface_temp_f = 50.0;
            worst.chlorophyll_mg_m3 = 9.0;

            let mut best = neutral_snapshot();
            best.swell_height_ft = 0.5;
            best.wind_speed_kt = 0.0;

            [neutral_snapshot(), worst, best]
        };

        for snapshot in &snapshots {
            for base in 1..=5 {
                for delta in [-6, -1, 0, 1, 6] {
                    let p = profile(base, 1.0, 1.0, 0.0);
                    let score = score_site(&p, snapshot, delta);
                    assert!((1..=5).contains(&score), "score {} out of range", score);
                }
            }
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let mut snapshot = neutral_snapshot();
        snapshot.swell_height_ft = 2.7;
        snapshot.wind_speed_kt = 7.3;
        snapshot.chlorophyll_mg_m3 = 2.4;
        let p = profile(3, 0.8, 0.4, 0.3);
        let first = score_site(&p, &snapshot, 1);
        let second = score_site(&p, &snapshot, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_bucket_mapping() {
        assert_eq!(score_bucket(1), VisibilityBucket::Under4Ft);
        assert_eq!(score_bucket(5), VisibilityBucket::Over15Ft);
    }

    #[test]
    fn test_rule_summary_names_every_rule() {
        let summary = rule_summary();
        for needle in ["swell", "wind", "Tide rate", "Rain", "SST", "Chlorophyll"] {
            assert!(summary.contains(needle), "missing {}", needle);
        }
    }
}
