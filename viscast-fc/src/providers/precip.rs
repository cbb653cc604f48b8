//! Precipitation forecast client
//!
//! Fetches forecast periods from the NWS gridpoint API and accumulates a
//! rainfall proxy in inches from their free-text summaries. The proxy is a
//! runoff indicator, not a measurement: the scoring rule only cares whether
//! recent and imminent rain is enough to muddy a runoff-sensitive site.

use super::ProviderError;
use serde::Deserialize;
use std::time::Duration;

const NWS_BASE_URL: &str = "https://api.weather.gov";

/// How many leading forecast periods contribute to the proxy
const PROXY_PERIODS: usize = 4;

/// Per-period proxy contributions in inches
const HEAVY_RAIN_IN: f64 = 0.25;
const RAIN_MENTION_IN: f64 = 0.10;
const SLIGHT_CHANCE_IN: f64 = 0.05;

/// One NWS forecast period with its free-text summaries
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    #[serde(rename = "shortForecast")]
    pub short_forecast: String,
    #[serde(rename = "detailedForecast")]
    pub detailed_forecast: String,
}

#[derive(Debug, Deserialize)]
struct GridpointResponse {
    properties: Option<GridpointProperties>,
}

#[derive(Debug, Deserialize)]
struct GridpointProperties {
    periods: Option<Vec<ForecastPeriod>>,
}

/// NWS gridpoint forecast client
pub struct PrecipClient {
    http_client: reqwest::Client,
}

impl PrecipClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: super::http_client(timeout)?,
        })
    }

    /// Fetch the forecast periods for an NWS gridpoint.
    pub async fn fetch(
        &self,
        office: &str,
        grid_x: u32,
        grid_y: u32,
    ) -> Result<Vec<ForecastPeriod>, ProviderError> {
        let url = format!(
            "{}/gridpoints/{}/{},{}/forecast",
            NWS_BASE_URL, office, grid_x, grid_y
        );

        tracing::debug!(office, grid_x, grid_y, url = %url, "Querying precipitation forecast");

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(status.as_u16(), error_text));
        }

        let parsed: GridpointResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let periods = parsed
            .properties
            .and_then(|p| p.periods)
            .ok_or_else(|| ProviderError::MissingData("no forecast periods".to_string()))?;

        tracing::info!(periods = periods.len(), "Precipitation forecast fetched");
        Ok(periods)
    }
}

/// Accumulate the rainfall proxy from the first few forecast periods.
///
/// Each period contributes at most once, by its strongest wording:
/// heavy rain 0.25 in, a plain rain mention 0.10 in, slight-chance wording
/// 0.05 in. Periods without precipitation wording contribute nothing.
pub fn rain_proxy_in(periods: &[ForecastPeriod]) -> f64 {
    periods
        .iter()
        .take(PROXY_PERIODS)
        .map(period_proxy_in)
        .sum()
}

fn period_proxy_in(period: &ForecastPeriod) -> f64 {
    let text = format!("{} {}", period.short_forecast, period.detailed_forecast).to_lowercase();
    let mentions_rain =
        text.contains("rain") || text.contains("showers") || text.contains("drizzle");
    if !mentions_rain {
        return 0.0;
    }
    if text.contains("heavy") {
        HEAVY_RAIN_IN
    } else if text.contains("slight chance") || text.contains("isolated") {
        SLIGHT_CHANCE_IN
    } else {
        RAIN_MENTION_IN
    }
}
