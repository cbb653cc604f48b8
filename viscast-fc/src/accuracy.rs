//! Forecast accuracy tracking
//!
//! Diagnostic only: pairs the scores this tool predicted with what the
//! dive log subsequently recorded, per site. Predictions persist in their
//! own append-only CSV; nothing here feeds back into calibration, which
//! stays purely log-driven.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use viscast_common::models::{DiveLogEntry, ForecastRow};
use viscast_common::{Error, Result};

/// One persisted prediction row
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub date: String,
    pub site: String,
    /// Predicted score, 1-5
    pub score: u8,
}

/// Paired means for one site
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAccuracy {
    pub site: String,
    pub predicted_mean: f64,
    pub actual_mean: f64,
    pub predictions: usize,
    pub observations: usize,
}

/// Append-only CSV prediction log, one row per site per forecast run
#[derive(Debug, Clone)]
pub struct PredictionLog {
    path: PathBuf,
}

const COLUMNS: [&str; 3] = ["date", "site", "score"];

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist one forecast run's scores.
    pub fn record_run(&self, date: &str, rows: &[ForecastRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(COLUMNS)
                .map_err(|e| Error::LogStore(e.to_string()))?;
        }
        for row in rows {
            writer
                .write_record([date, row.site.as_str(), &row.score.to_string()])
                .map_err(|e| Error::LogStore(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read all persisted predictions in file order. A missing file is an
    /// empty history; rows with an unparseable score are skipped.
    pub fn read_all(&self) -> Result<Vec<PredictionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| Error::LogStore(e.to_string()))?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable prediction row");
                    continue;
                }
            };
            let score: u8 = match record.get(2).unwrap_or("").trim().parse() {
                Ok(s) => s,
                Err(_) => {
                    tracing::warn!(row = ?record, "Skipping prediction row with bad score");
                    continue;
                }
            };
            records.push(PredictionRecord {
                date: record.get(0).unwrap_or("").to_string(),
                site: record.get(1).unwrap_or("").to_string(),
                score,
            });
        }
        Ok(records)
    }
}

/// Pair predicted and observed means per site.
///
/// Only sites with at least one prediction and at least one usable logged
/// observation appear, in order of first appearance in the prediction
/// history. Either side empty yields an empty report, never an error.
pub fn accuracy_report(
    predictions: &[PredictionRecord],
    log_entries: &[DiveLogEntry],
) -> Vec<SiteAccuracy> {
    let mut report = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for prediction in predictions {
        if seen.contains(&prediction.site.as_str()) {
            continue;
        }
        seen.push(&prediction.site);

        let predicted: Vec<f64> = predictions
            .iter()
            .filter(|p| p.site == prediction.site)
            .map(|p| f64::from(p.score))
            .collect();
        let observed: Vec<f64> = log_entries
            .iter()
            .filter(|e| e.site == prediction.site)
            .filter_map(|e| e.bucket())
            .map(|b| f64::from(b.ordinal()))
            .collect();

        if observed.is_empty() {
            continue;
        }

        report.push(SiteAccuracy {
            site: prediction.site.clone(),
            predicted_mean: mean(&predicted),
            actual_mean: mean(&observed),
            predictions: predicted.len(),
            observations: observed.len(),
        });
    }

    report
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use viscast_common::models::VisibilityBucket;

    fn prediction(date: &str, site: &str, score: u8) -> PredictionRecord {
        PredictionRecord {
            date: date.to_string(),
            site: site.to_string(),
            score,
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

    fn row(site: &str, score: u8) -> ForecastRow {
        ForecastRow {
            site: site.to_string(),
            bucket: VisibilityBucket::from_ordinal(score).unwrap(),
            score,
            calibration_delta: 0,
            tide: "Rising".to_string(),
            current: "W (up)".to_string(),
            swell: "2.5 ft @ 13s W".to_string(),
            wind: "6 kt NW".to_string(),
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_report() {
        assert!(accuracy_report(&[], &[]).is_empty());
        assert!(accuracy_report(&[prediction("2025-06-14", "A", 3)], &[]).is_empty());
        assert!(accuracy_report(&[], &[entry("A", "<4 ft")]).is_empty());
    }

    #[test]
    fn test_paired_means() {
        let predictions = vec![
            prediction("2025-06-13", "Cove", 4),
            prediction("2025-06-14", "Cove", 2),
        ];
        let entries = vec![
            entry("Cove", "6\u{2013}8 ft"),  // 3
            entry("Cove", "8\u{2013}10 ft"), // 4
        ];
        let report = accuracy_report(&predictions, &entries);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].site, "Cove");
        assert!((report[0].predicted_mean - 3.0).abs() < 1e-9);
        assert!((report[0].actual_mean - 3.5).abs() < 1e-9);
        assert_eq!(report[0].predictions, 2);
        assert_eq!(report[0].observations, 2);
    }

    #[test]
    fn test_sites_without_observations_are_skipped() {
        let predictions = vec![
            prediction("2025-06-14", "Cove", 4),
            prediction("2025-06-14", "Shores", 3),
        ];
        let entries = vec![entry("Shores", "4\u{2013}6 ft")];
        let report = accuracy_report(&predictions, &entries);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].site, "Shores");
    }

    #[test]
    fn test_unparseable_observations_do_not_count() {
        let predictions = vec![prediction("2025-06-14", "Cove", 4)];
        let entries = vec![entry("Cove", "murky")];
        assert!(accuracy_report(&predictions, &entries).is_empty());
    }

    #[test]
    fn test_record_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("predictions.csv"));

        log.record_run("2025-06-14", &[row("Cove", 4), row("Shores", 3)])
            .unwrap();
        log.record_run("2025-06-15", &[row("Cove", 2)]).unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], prediction("2025-06-14", "Cove", 4));
        assert_eq!(records[2], prediction("2025-06-15", "Cove", 2));
    }

    #[test]
    fn test_missing_prediction_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let log = PredictionLog::new(dir.path().join("predictions.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_bad_score_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        std::fs::write(
            &path,
            "date,site,score\n2025-06-14,Cove,four\n2025-06-14,Shores,3\n",
        )
        .unwrap();

        let records = PredictionLog::new(&path).read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].site, "Shores");
    }
}
