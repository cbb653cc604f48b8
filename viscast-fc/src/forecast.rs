//! Forecast aggregation
//!
//! Produces the ranked per-site table for one run and selects the best
//! pick. Iteration is always in registry order, which doubles as the
//! tie-break order: the first maximum encountered wins, independent of any
//! collection's sort stability.

use crate::calibrate::calibration_delta;
use crate::scoring::{score_bucket, score_site};
use crate::sites::SiteRegistry;
use viscast_common::models::{DiveLogEntry, EnvironmentalSnapshot, ForecastRow};
use viscast_common::{Error, Result};

/// Build the per-site forecast rows in registry order.
///
/// Each site gets its calibration delta from the full log history, then its
/// score against the shared snapshot. An empty registry is a hard error,
/// never an empty table.
pub fn build_forecast(
    registry: &SiteRegistry,
    snapshot: &EnvironmentalSnapshot,
    log_entries: &[DiveLogEntry],
) -> Result<Vec<ForecastRow>> {
    if registry.is_empty() {
        return Err(Error::EmptyRegistry);
    }

    let rows = registry
        .sites()
        .iter()
        .map(|profile| {
            let delta = calibration_delta(profile, log_entries);
            let score = score_site(profile, snapshot, delta);
            ForecastRow {
                site: profile.name.clone(),
                bucket: score_bucket(score),
                score,
                calibration_delta: delta,
                tide: snapshot.tide_stage.to_string(),
                current: snapshot.current.clone(),
                swell: snapshot.swell_label(),
                wind: snapshot.wind_label(),
            }
        })
        .collect();

    Ok(rows)
}

/// The row with the maximum score; ties break to the earliest position in
/// the input order. Empty input has no pick.
pub fn select_best(rows: &[ForecastRow]) -> Option<&ForecastRow> {
    let mut best: Option<&ForecastRow> = None;
    for row in rows {
        match best {
            Some(current) if row.score <= current.score => {}
            _ => best = Some(row),
        }
    }
    best
}
