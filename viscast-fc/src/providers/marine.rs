//! Marine conditions client
//!
//! Fetches swell, wind, and sea surface temperature from the Open-Meteo
//! marine and forecast endpoints (keyless public APIs). Readings come back
//! metric and are converted to the feet/knots/Fahrenheit units the scoring
//! rules are written in.

use super::ProviderError;
use serde::Deserialize;
use std::time::Duration;

const MARINE_BASE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";
const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const METERS_TO_FEET: f64 = 3.280_84;

/// Live marine readings for one forecast run
#[derive(Debug, Clone)]
pub struct MarineConditions {
    pub swell_height_ft: f64,
    pub swell_period_s: f64,
    /// Compass point the swell arrives from
    pub swell_direction: String,
    pub wind_speed_kt: f64,
    pub wind_direction: String,
    pub sea_surface_temp_f: f64,
}

/// Open-Meteo marine response (current block only)
#[derive(Debug, Deserialize)]
struct MarineResponse {
    current: Option<MarineCurrent>,
}

#[derive(Debug, Deserialize)]
struct MarineCurrent {
    wave_height: Option<f64>,
    wave_period: Option<f64>,
    wave_direction: Option<f64>,
    sea_surface_temperature: Option<f64>,
}

/// Open-Meteo forecast response (current block only)
#[derive(Debug, Deserialize)]
struct WindResponse {
    current: Option<WindCurrent>,
}

#[derive(Debug, Deserialize)]
struct WindCurrent {
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
}

/// Convert a bearing in degrees to a 16-point compass label.
pub fn compass_point(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5) + 0.5).floor() as usize % 16;
    POINTS[index]
}

/// Marine conditions API client
pub struct MarineClient {
    http_client: reqwest::Client,
}

impl MarineClient {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            http_client: super::http_client(timeout)?,
        })
    }

    /// Fetch swell, SST, and wind for the forecast point.
    ///
    /// Both underlying requests belong to the same failure boundary: if
    /// either is unusable the whole marine source is reported unavailable
    /// and every marine field falls back together.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<MarineConditions, ProviderError> {
        let marine_url = format!(
            "{}?latitude={:.4}&longitude={:.4}&current=wave_height,wave_period,wave_direction,sea_surface_temperature",
            MARINE_BASE_URL, lat, lon
        );
        let wind_url = format!(
            "{}?latitude={:.4}&longitude={:.4}&current=wind_speed_10m,wind_direction_10m&wind_speed_unit=kn",
            FORECAST_BASE_URL, lat, lon
        );

        tracing::debug!(url = %marine_url, "Querying marine conditions");
        let marine: MarineResponse = get_json(&self.http_client, &marine_url).await?;
        tracing::debug!(url = %wind_url, "Querying wind conditions");
        let wind: WindResponse = get_json(&self.http_client, &wind_url).await?;

        let marine = marine
            .current
            .ok_or_else(|| ProviderError::MissingData("no current marine block".to_string()))?;
        let wind = wind
            .current
            .ok_or_else(|| ProviderError::MissingData("no current wind block".to_string()))?;

        let swell_height_m = marine
            .wave_height
            .ok_or_else(|| ProviderError::MissingData("no wave height".to_string()))?;
        let swell_period_s = marine
            .wave_period
            .ok_or_else(|| ProviderError::MissingData("no wave period".to_string()))?;
        let swell_direction_deg = marine
            .wave_direction
            .ok_or_else(|| ProviderError::MissingData("no wave direction".to_string()))?;
        let sst_c = marine
            .sea_surface_temperature
            .ok_or_else(|| ProviderError::MissingData("no sea surface temperature".to_string()))?;
        let wind_speed_kt = wind
            .wind_speed_10m
            .ok_or_else(|| ProviderError::MissingData("no wind speed".to_string()))?;
        let wind_direction_deg = wind
            .wind_direction_10m
            .ok_or_else(|| ProviderError::MissingData("no wind direction".to_string()))?;

        let conditions = MarineConditions {
            swell_height_ft: swell_height_m * METERS_TO_FEET,
            swell_period_s,
            swell_direction: compass_point(swell_direction_deg).to_string(),
            wind_speed_kt,
            wind_direction: compass_point(wind_direction_deg).to_string(),
            sea_surface_temp_f: celsius_to_fahrenheit(sst_c),
        };

        tracing::info!(
            swell_ft = %format!("{:.1}", conditions.swell_height_ft),
            wind_kt = %format!("{:.0}", conditions.wind_speed_kt),
            sst_f = %format!("{:.1}", conditions.sea_surface_temp_f),
            "Marine conditions fetched"
        );

        Ok(conditions)
    }
}

async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, ProviderError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}
