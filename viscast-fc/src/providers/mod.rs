//! Environmental data providers
//!
//! Four independent clients (marine, tide, precipitation, chlorophyll), each
//! owning its own HTTP call, parsing, and failure boundary. A failure in one
//! source never delays or invalidates the others: every fetch resolves to a
//! [`Fetched`] value, and the snapshot builder substitutes documented
//! defaults for anything unavailable.

pub mod chlorophyll;
pub mod marine;
pub mod precip;
pub mod snapshot;
pub mod tide;

use std::time::Duration;
use thiserror::Error;

pub use snapshot::SnapshotBuilder;

/// User agent sent with every outbound request
pub const USER_AGENT: &str = "viscast/0.1.0 (https://github.com/viscast/viscast)";

/// Provider errors shared by all four clients
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Remote API returned an error response
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Failed to parse the API response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Fetch exceeded its per-source time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Response was well-formed but held no usable reading
    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Typed result of one fetch-or-default decision.
///
/// Replaces the blanket catch-and-ignore failure pattern: a default is a
/// recorded outcome with a cause, not a silently swallowed error.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    /// Live value from the source
    Live(T),
    /// Source unavailable; the documented default applies
    Defaulted { cause: String },
}

impl<T> Fetched<T> {
    /// Collapse a fetch result, logging the fallback cause at warn level.
    pub fn from_result(source: &str, result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Fetched::Live(value),
            Err(e) => {
                tracing::warn!(source, error = %e, "Data source unavailable; using defaults");
                Fetched::Defaulted {
                    cause: e.to_string(),
                }
            }
        }
    }
}

/// Build the shared HTTP client used by all providers.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_from_ok() {
        let fetched = Fetched::from_result("marine", Ok(42));
        assert!(matches!(fetched, Fetched::Live(42)));
    }

    #[test]
    fn test_fetched_from_err_carries_cause() {
        let fetched: Fetched<i32> =
            Fetched::from_result("tide", Err(ProviderError::Api(503, "down".to_string())));
        match fetched {
            Fetched::Defaulted { cause } => assert!(cause.contains("503")),
            Fetched::Live(_) => panic!("expected defaulted"),
        }
    }
}
