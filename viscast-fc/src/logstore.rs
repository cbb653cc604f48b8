//! Append-only dive log store
//!
//! One CSV file, one writer (the logging action), any number of advisory
//! readers. A log file is never mutated or rejected for bad rows: reads
//! reconcile ragged rows instead of failing, and rows with unusable values
//! stay in storage even though calibration ignores them. Every read re-opens
//! the file and assumes nothing about its row count, so a row appended
//! mid-read is simply picked up by the next read.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use viscast_common::models::DiveLogEntry;
use viscast_common::{Error, Result};

/// Canonical column layout of the dive log
pub const EXPECTED_COLUMNS: [&str; 6] = ["date", "time", "site", "visibility", "notes", "catch"];

/// Append-only CSV dive log
#[derive(Debug, Clone)]
pub struct DiveLogStore {
    path: PathBuf,
}

impl DiveLogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, creating the file with a header when missing.
    ///
    /// Only the six canonical columns are written; the visibility string is
    /// trimmed on the way in so the stored form matches the bucket mapping.
    pub fn append(&self, entry: &DiveLogEntry) -> Result<()> {
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
                .write_record(EXPECTED_COLUMNS)
                .map_err(|e| Error::LogStore(e.to_string()))?;
        }
        writer
            .write_record([
                entry.date.as_str(),
                entry.time.as_str(),
                entry.site.as_str(),
                entry.visibility.trim(),
                entry.notes.as_str(),
                entry.catch.as_str(),
            ])
            .map_err(|e| Error::LogStore(e.to_string()))?;
        writer.flush()?;

        tracing::info!(site = %entry.site, visibility = %entry.visibility.trim(), "Dive logged");
        Ok(())
    }

    /// Read every row in file order, reconciling columns positionally:
    /// missing columns become empty strings, extra columns are preserved
    /// under synthetic `extra_N` names. A missing file is an empty log.
    pub fn read_all(&self) -> Result<Vec<DiveLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| Error::LogStore(e.to_string()))?;

        let mut entries = Vec::new();
        for record in reader.records() {
            match record {
                Ok(record) => entries.push(reconcile(&record)),
                // A mangled row never takes the rest of the file with it
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable dive log row"),
            }
        }
        Ok(entries)
    }
}

/// Map one raw record onto the canonical layout.
fn reconcile(record: &csv::StringRecord) -> DiveLogEntry {
    let field = |i: usize| record.get(i).unwrap_or("").to_string();
    let extras = record
        .iter()
        .enumerate()
        .skip(EXPECTED_COLUMNS.len())
        .map(|(i, value)| {
            (
                format!("extra_{}", i - EXPECTED_COLUMNS.len() + 1),
                value.to_string(),
            )
        })
        .collect();

    DiveLogEntry {
        date: field(0),
        time: field(1),
        site: field(2),
        visibility: field(3).trim().to_string(),
        notes: field(4),
        catch: field(5),
        extras,
    }
}
