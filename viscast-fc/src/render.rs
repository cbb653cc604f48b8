//! Text rendering of the forecast surface
//!
//! The only artifacts the presentation layer consumes: the ordered site
//! table, the designated best pick, the scoring-rule summary, the per-site
//! calibration adjustments, and a notice for any snapshot fields that fell
//! back to defaults.

use crate::forecast::select_best;
use crate::scoring::rule_summary;
use crate::sites::SiteRegistry;
use viscast_common::models::{EnvironmentalSnapshot, ForecastRow};

const HEADERS: [&str; 7] = ["Spot", "Visibility", "Tide", "Current", "Swell", "Wind", "Score"];

/// Aligned forecast table in registry order
pub fn forecast_table(rows: &[ForecastRow]) -> String {
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.site.clone(),
                r.bucket.to_string(),
                r.tide.clone(),
                r.current.clone(),
                r.swell.clone(),
                r.wind.clone(),
                r.score.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |cols: &[String]| -> String {
        let padded: Vec<String> = cols
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");

    let mut out = String::new();
    out.push_str(&format_row(&header));
    out.push('\n');
    out.push_str(&separator);
    for row in &cells {
        out.push('\n');
        out.push_str(&format_row(row));
    }
    out
}

/// Best pick block with the snapshot detail lines
pub fn best_pick_block(row: &ForecastRow, snapshot: &EnvironmentalSnapshot) -> String {
    format!(
        "Best dive pick today: {} \u{2014} {} \u{2014} {}/5\n\
         - Swell: {}\n\
         - Wind: {}\n\
         - Tide: {} ({})\n\
         - Tide rate: {:.2} ft over the window\n\
         - Rain: {:.2} in\n\
         - SST: {:.1} F\n\
         - Chlorophyll: {:.2} mg/m3",
        row.site,
        row.bucket,
        row.score,
        row.swell,
        row.wind,
        row.tide,
        row.current,
        snapshot.tide_rate_ft,
        snapshot.rain_total_in,
        snapshot.sea_surface_temp_f,
        snapshot.chlorophyll_mg_m3,
    )
}

/// Per-site calibration adjustment lines
pub fn calibration_lines(registry: &SiteRegistry, rows: &[ForecastRow]) -> String {
    let mut out = String::from("Adaptive adjustments from dive logs:");
    for row in rows {
        let base = registry
            .lookup(&row.site)
            .map(|p| p.base_score)
            .unwrap_or(0);
        out.push('\n');
        if row.calibration_delta == 0 {
            out.push_str(&format!("  {}: base {}, no adjustment", row.site, base));
        } else {
            out.push_str(&format!(
                "  {}: base {}, adjusted to {} ({:+} from logs)",
                row.site,
                base,
                i32::from(base) + row.calibration_delta,
                row.calibration_delta,
            ));
        }
    }
    out
}

/// Notice naming every snapshot field that fell back to its default, or
/// None when the snapshot is fully live.
pub fn defaulted_notice(snapshot: &EnvironmentalSnapshot) -> Option<String> {
    if snapshot.defaulted.is_empty() {
        return None;
    }
    let mut out = String::from("Defaulted inputs (source unavailable):");
    for d in &snapshot.defaulted {
        out.push('\n');
        out.push_str(&format!("  {}: {}", d.field, d.cause));
    }
    Some(out)
}

/// Accuracy report as an aligned text table
pub fn accuracy_table(report: &[crate::accuracy::SiteAccuracy]) -> String {
    if report.is_empty() {
        return "No paired predictions and observations yet.".to_string();
    }
    let mut out = String::from("Site                  Predicted  Observed  Runs  Dives");
    for site in report {
        out.push('\n');
        out.push_str(&format!(
            "{:<20}  {:>9.1}  {:>8.1}  {:>4}  {:>5}",
            site.site, site.predicted_mean, site.actual_mean, site.predictions, site.observations,
        ));
    }
    out
}

/// The complete forecast surface as one text document.
pub fn render_forecast(
    registry: &SiteRegistry,
    snapshot: &EnvironmentalSnapshot,
    rows: &[ForecastRow],
) -> String {
    let mut out = forecast_table(rows);

    if let Some(best) = select_best(rows) {
        out.push_str("\n\n");
        out.push_str(&best_pick_block(best, snapshot));
    }

    out.push_str("\n\n");
    out.push_str(rule_summary());
    out.push_str("\n\n");
    out.push_str(&calibration_lines(registry, rows));

    if let Some(notice) = defaulted_notice(snapshot) {
        out.push_str("\n\n");
        out.push_str(&notice);
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use viscast_common::models::{SiteProfile, VisibilityBucket};

    fn registry() -> SiteRegistry {
        SiteRegistry::new(vec![
            SiteProfile {
                name: "Cove".to_string(),
                base_score: 3,
                swell_exposure: 0.4,
                runoff_sensitivity: 0.3,
                kelp_index: 0.2,
                camera_url: None,
            },
            SiteProfile {
                name: "Shores".to_string(),
                base_score: 2,
                swell_exposure: 0.6,
                runoff_sensitivity: 0.5,
                kelp_index: 0.0,
                camera_url: None,
            },
        ])
        .unwrap()
    }

    fn row(site: &str, score: u8, delta: i32) -> ForecastRow {
        ForecastRow {
            site: site.to_string(),
            bucket: VisibilityBucket::from_ordinal(score).unwrap(),
            score,
            calibration_delta: delta,
            tide: "Rising".to_string(),
            current: "W (up)".to_string(),
            swell: "2.5 ft @ 13s W".to_string(),
            wind: "6 kt NW".to_string(),
        }
    }

    #[test]
    fn test_table_has_header_and_all_rows() {
        let table = forecast_table(&[row("Cove", 4, 0), row("Shores", 2, 0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4); // header, separator, two rows
        assert!(lines[0].starts_with("Spot"));
        assert!(lines[2].starts_with("Cove"));
        assert!(lines[3].starts_with("Shores"));
        assert!(lines[2].contains("8\u{2013}10 ft"));
    }

    #[test]
    fn test_best_pick_block_content() {
        let snapshot = EnvironmentalSnapshot::defaults("test");
        let block = best_pick_block(&row("Cove", 4, 1), &snapshot);
        assert!(block.contains("Cove"));
        assert!(block.contains("4/5"));
        assert!(block.contains("Tide rate: 0.00 ft"));
        assert!(block.contains("SST: 62.0 F"));
    }

    #[test]
    fn test_calibration_lines() {
        let lines = calibration_lines(&registry(), &[row("Cove", 4, 1), row("Shores", 2, 0)]);
        assert!(lines.contains("Cove: base 3, adjusted to 4 (+1 from logs)"));
        assert!(lines.contains("Shores: base 2, no adjustment"));
    }

    #[test]
    fn test_defaulted_notice_absent_when_live() {
        let mut snapshot = EnvironmentalSnapshot::defaults("test");
        snapshot.defaulted.clear();
        assert!(defaulted_notice(&snapshot).is_none());
    }

    #[test]
    fn test_defaulted_notice_names_fields_and_causes() {
        let snapshot = EnvironmentalSnapshot::defaults("offline mode");
        let notice = defaulted_notice(&snapshot).unwrap();
        assert!(notice.contains("tide rate: offline mode"));
        assert!(notice.contains("chlorophyll: offline mode"));
    }

    #[test]
    fn test_full_render_includes_every_section() {
        let registry = registry();
        let snapshot = EnvironmentalSnapshot::defaults("offline mode");
        let rows = vec![row("Cove", 4, 0), row("Shores", 2, 0)];
        let out = render_forecast(&registry, &snapshot, &rows);
        assert!(out.contains("Spot"));
        assert!(out.contains("Best dive pick today"));
        assert!(out.contains("Forecast scoring breakdown"));
        assert!(out.contains("Adaptive adjustments"));
        assert!(out.contains("Defaulted inputs"));
    }
}
