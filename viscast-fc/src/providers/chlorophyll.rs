//! Chlorophyll concentration client
//!
//! Fetches the latest near-surface chlorophyll reading for the forecast
//! point from a CoastWatch ERDDAP griddap dataset. High chlorophyll is the
//! plankton-bloom indicator in the scoring rules.

use super::ProviderError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const ERDDAP_BASE_URL: &str = "https://coastwatch.pfeg.noaa.gov/erddap/griddap";
const DATASET: &str = "erdMWchla8day";

/// ERDDAP griddap JSON response ("table" layout)
#[derive(Debug, Deserialize)]
struct ErddapResponse {
    table: Option<ErddapTable>,
}

#[derive(Debug, Deserialize)]
struct ErddapTable {
    #[serde(rename = "columnNames")]
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Chlorophyll API client
pub struct ChlorophyllClient {
    http_client: reqwest::Client,
}

impl ChlorophyllClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: super::http_client(timeout)?,
        })
    }

    /// Fetch the latest chlorophyll scalar (mg/m3) near a point.
    ///
    /// ERDDAP longitudes for this dataset are 0-360 east; west-hemisphere
    /// inputs are converted. The most recent non-null row wins.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<f64, ProviderError> {
        let lon_east = if lon < 0.0 { lon + 360.0 } else { lon };
        let url = format!(
            "{}/{}.json?chlorophyll%5B(last)%5D%5B(0.0)%5D%5B({:.3})%5D%5B({:.3})%5D",
            ERDDAP_BASE_URL, DATASET, lat, lon_east
        );

        tracing::debug!(url = %url, "Querying chlorophyll");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let parsed: ErddapResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let reading = latest_reading(&parsed)?;
        tracing::info!(chlorophyll = %format!("{:.2}", reading), "Chlorophyll fetched");
        Ok(reading)
    }
}

/// Extract the most recent usable chlorophyll value from the table.
fn latest_reading(response: &ErddapResponse) -> Result<f64, ProviderError> {
    let table = response
        .table
        .as_ref()
        .ok_or_else(|| ProviderError::MissingData("no table in response".to_string()))?;

    let column = table
        .column_names
        .iter()
        .position(|name| name == "chlorophyll")
        .ok_or_else(|| ProviderError::MissingData("no chlorophyll column".to_string()))?;

    table
        .rows
        .iter()
        .rev()
        .filter_map(|row| row.get(column))
        .filter_map(|v| v.as_f64())
        .find(|v| v.is_finite())
        .ok_or_else(|| ProviderError::MissingData("no usable chlorophyll rows".to_string()))
}
