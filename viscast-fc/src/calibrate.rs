//! Adaptive calibration from logged observations
//!
//! Derives a per-site integer correction: how much better or worse a site
//! actually reports relative to its assumed baseline. Recomputed from the
//! full log history on every run; nothing is stored between runs.

use viscast_common::models::{DiveLogEntry, SiteProfile};

/// Compute the calibration delta for one site.
///
/// Usable rows are those whose site matches the profile and whose logged
/// visibility maps to a bucket; malformed visibility strings are dropped
/// from the mean silently, never an error. With no usable rows the delta
/// is 0. Otherwise `delta = round(mean(ordinals) - base_score)`, rounding
/// half away from zero (`f64::round`, the convention used repo-wide).
pub fn calibration_delta(profile: &SiteProfile, entries: &[DiveLogEntry]) -> i32 {
    let ordinals: Vec<f64> = entries
        .iter()
        .filter(|e| e.site == profile.name)
        .filter_map(|e| e.bucket())
        .map(|b| f64::from(b.ordinal()))
        .collect();

    if ordinals.is_empty() {
        return 0;
    }

    let observed_mean = ordinals.iter().sum::<f64>() / ordinals.len() as f64;
    let delta = (observed_mean - f64::from(profile.base_score)).round() as i32;

    tracing::debug!(
        site = %profile.name,
        base = profile.base_score,
        observed_mean = %format!("{:.1}", observed_mean),
        delta,
        samples = ordinals.len(),
        "Calibration computed"
    );
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, base: u8) -> SiteProfile {
        SiteProfile {
            name: name.to_string(),
            base_score: base,
            swell_exposure: 0.5,
            runoff_sensitivity: 0.2,
            kelp_index: 0.1,
            camera_url: None,
        }
    }

    fn entry(site: &str, visibility: &str) -> DiveLogEntry {
        DiveLogEntry {
            date: "2025-06-14".to_string(),
            time: "07:30".to_string(),
            site: site.to_string(),
            visibility: visibility.to_string(),
            notes: String::new(),
            catch: String::new(),
            extras: Vec::new(),
        }
    }

    #[test]
    fn test_no_logs_means_zero_delta() {
        assert_eq!(calibration_delta(&profile("Cove", 3), &[]), 0);
    }

    #[test]
    fn test_logs_matching_baseline_mean_zero_delta() {
        let entries = vec![
            entry("Cove", "4\u{2013}6 ft"),  // 2
            entry("Cove", "8\u{2013}10 ft"), // 4
        ];
        // mean 3.0 == base 3
        assert_eq!(calibration_delta(&profile("Cove", 3), &entries), 0);
    }

    #[test]
    fn test_one_bucket_above_baseline_is_plus_one() {
        let entries = vec![
            entry("Cove", "8\u{2013}10 ft"), // 4
            entry("Cove", "8\u{2013}10 ft"), // 4
        ];
        assert_eq!(calibration_delta(&profile("Cove", 3), &entries), 1);
    }

    #[test]
    fn test_observations_below_baseline_pull_down() {
        let entries = vec![
            entry("Cove", "<4 ft"), // 1
            entry("Cove", "<4 ft"), // 1
        ];
        // mean 1.0 - base 4 = -3
        assert_eq!(calibration_delta(&profile("Cove", 4), &entries), -3);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // mean 3.5 - base 3 = 0.5 -> +1
        let up = vec![
            entry("Cove", "6\u{2013}8 ft"),  // 3
            entry("Cove", "8\u{2013}10 ft"), // 4
        ];
        assert_eq!(calibration_delta(&profile("Cove", 3), &up), 1);

        // mean 2.5 - base 4 = -1.5 -> -2
        let down = vec![
            entry("Cove", "4\u{2013}6 ft"), // 2
            entry("Cove", "6\u{2013}8 ft"), // 3
        ];
        assert_eq!(calibration_delta(&profile("Cove", 4), &down), -2);
    }

    #[test]
    fn test_other_sites_are_ignored() {
        let entries = vec![
            entry("Shores", "15+ ft"),
            entry("Shores", "15+ ft"),
            entry("Cove", "6\u{2013}8 ft"),
        ];
        // Only the Cove row counts: mean 3 == base 3
        assert_eq!(calibration_delta(&profile("Cove", 3), &entries), 0);
    }

    #[test]
    fn test_malformed_visibility_dropped_from_mean() {
        let entries = vec![
            entry("Cove", "pretty murky"),
            entry("Cove", ""),
            entry("Cove", "8\u{2013}10 ft"), // 4
        ];
        // Only the parseable row counts: mean 4 - base 3 = +1
        assert_eq!(calibration_delta(&profile("Cove", 3), &entries), 1);
    }

    #[test]
    fn test_all_malformed_is_zero_delta() {
        let entries = vec![entry("Cove", "murky"), entry("Cove", "n/a")];
        assert_eq!(calibration_delta(&profile("Cove", 2), &entries), 0);
    }
}
