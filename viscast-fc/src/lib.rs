//! viscast-fc - Visibility Forecast Service
//!
//! Estimates underwater visibility at a fixed set of named shore-dive sites
//! by combining static per-site physical profiles, one snapshot of live
//! environmental readings per run, and a self-calibrating adjustment derived
//! from the user's dive log.
//!
//! Data flows one direction per run:
//! registry + snapshot + log history -> calibration -> scoring -> ranked rows.
//! The dive log is the only thing that grows between runs, append-only.

pub mod accuracy;
pub mod calibrate;
pub mod forecast;
pub mod logstore;
pub mod providers;
pub mod render;
pub mod scoring;
pub mod sites;
