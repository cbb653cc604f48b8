//! Configuration loading and data folder resolution

use crate::models::SiteProfile;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data folder
pub const DATA_DIR_ENV: &str = "VISCAST_DATA_DIR";

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// TOML configuration file schema.
///
/// Every field is optional; a missing file or missing field falls back to
/// compiled defaults with a warning, never a startup failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding the dive log and prediction log
    pub data_dir: Option<PathBuf>,
    /// Dive log file path (default: <data_dir>/dive_log.csv)
    pub log_file: Option<PathBuf>,
    /// Prediction log file path (default: <data_dir>/predictions.csv)
    pub prediction_file: Option<PathBuf>,
    /// Per-source fetch timeout in seconds
    pub fetch_timeout_secs: Option<u64>,
    /// NOAA CO-OPS tide station id
    pub tide_station: Option<String>,
    /// Forecast latitude (marine and chlorophyll sources)
    pub latitude: Option<f64>,
    /// Forecast longitude
    pub longitude: Option<f64>,
    /// NWS forecast office id
    pub nws_office: Option<String>,
    /// NWS gridpoint x coordinate
    pub nws_grid_x: Option<u32>,
    /// NWS gridpoint y coordinate
    pub nws_grid_y: Option<u32>,
    /// Site profile table overriding the built-in one
    #[serde(default)]
    pub sites: Option<Vec<SiteProfile>>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Per-source fetch timeout, defaulting to 10 seconds
    pub fn fetch_timeout_secs(&self) -> u64 {
        self.fetch_timeout_secs.unwrap_or(10)
    }

    /// Tide station, defaulting to La Jolla (Scripps Pier)
    pub fn tide_station(&self) -> &str {
        self.tide_station.as_deref().unwrap_or("9410230")
    }

    /// Forecast latitude, defaulting to the La Jolla kelp beds
    pub fn latitude(&self) -> f64 {
        self.latitude.unwrap_or(32.85)
    }

    /// Forecast longitude
    pub fn longitude(&self) -> f64 {
        self.longitude.unwrap_or(-117.27)
    }

    /// NWS office, defaulting to San Diego
    pub fn nws_office(&self) -> &str {
        self.nws_office.as_deref().unwrap_or("SGX")
    }

    pub fn nws_grid_x(&self) -> u32 {
        self.nws_grid_x.unwrap_or(54)
    }

    pub fn nws_grid_y(&self) -> u32 {
        self.nws_grid_y.unwrap_or(20)
    }
}

/// Load the TOML config from an explicit path, or the platform config
/// location when none is given.
///
/// A missing or unreadable file yields defaults with a warning; a present
/// but malformed file is a configuration error (silent misconfiguration is
/// worse than startup failure).
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                warn!("No config directory available; using compiled defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found; using compiled defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read config {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config {} failed: {}", path.display(), e)))
}

/// Platform config file location: `<config_dir>/viscast/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("viscast").join("config.toml"))
}

/// Resolve the data folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (VISCAST_DATA_DIR)
/// 3. TOML config file
/// 4. Platform default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.data_dir {
        return path.clone();
    }

    default_data_dir()
}

/// Platform default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("viscast"))
        .unwrap_or_else(|| PathBuf::from("./viscast_data"))
}

/// Create the data folder if missing
pub fn ensure_data_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Dive log file location for a resolved data folder
pub fn dive_log_path(data_dir: &Path, config: &TomlConfig) -> PathBuf {
    config
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("dive_log.csv"))
}

/// Prediction log file location for a resolved data folder
pub fn prediction_path(data_dir: &Path, config: &TomlConfig) -> PathBuf {
    config
        .prediction_file
        .clone()
        .unwrap_or_else(|| data_dir.join("predictions.csv"))
}
