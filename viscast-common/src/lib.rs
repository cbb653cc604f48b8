//! # viscast Common Library
//!
//! Shared code for the viscast workspace including:
//! - Data models (site profiles, visibility buckets, snapshots, log entries)
//! - Common error type
//! - Configuration loading and data folder resolution
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::VisibilityBucket;
