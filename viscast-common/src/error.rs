//! Common error types for viscast

use thiserror::Error;

/// Common result type for viscast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the viscast crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Site profile field outside its documented range
    #[error("Invalid site profile for {site}: {field} = {value}")]
    InvalidProfile {
        site: String,
        field: &'static str,
        value: String,
    },

    /// No sites configured; a forecast cannot be produced
    #[error("Site registry is empty: no forecast can be produced")]
    EmptyRegistry,

    /// Dive log or prediction log storage error
    #[error("Log store error: {0}")]
    LogStore(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
