//! Snapshot assembly
//!
//! Runs the four environmental fetches concurrently, each under its own
//! timeout, and merges the results with the documented defaults into one
//! fully populated [`EnvironmentalSnapshot`]. Assembly never fails: a dead
//! source only flags its own fields.

use super::chlorophyll::ChlorophyllClient;
use super::marine::{MarineClient, MarineConditions};
use super::precip::{self, PrecipClient};
use super::tide::{self, TideClient, TideMovement};
use super::{Fetched, ProviderError};
use std::time::Duration;
use viscast_common::config::TomlConfig;
use viscast_common::models::{
    snapshot_defaults as defaults, DefaultedField, EnvironmentalSnapshot, SnapshotField,
};

/// Source location parameters shared by the fetches
#[derive(Debug, Clone)]
pub struct SourceParams {
    pub latitude: f64,
    pub longitude: f64,
    pub tide_station: String,
    pub nws_office: String,
    pub nws_grid_x: u32,
    pub nws_grid_y: u32,
}

impl SourceParams {
    pub fn from_config(config: &TomlConfig) -> Self {
        Self {
            latitude: config.latitude(),
            longitude: config.longitude(),
            tide_station: config.tide_station().to_string(),
            nws_office: config.nws_office().to_string(),
            nws_grid_x: config.nws_grid_x(),
            nws_grid_y: config.nws_grid_y(),
        }
    }
}

/// Builds one consistent environmental snapshot per forecast run.
pub struct SnapshotBuilder {
    marine: MarineClient,
    tide: TideClient,
    precip: PrecipClient,
    chlorophyll: ChlorophyllClient,
    params: SourceParams,
    per_source_timeout: Duration,
}

impl SnapshotBuilder {
    pub fn new(params: SourceParams, per_source_timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            marine: MarineClient::new(per_source_timeout)?,
            tide: TideClient::new(per_source_timeout)?,
            precip: PrecipClient::new(per_source_timeout)?,
            chlorophyll: ChlorophyllClient::new(per_source_timeout)?,
            params,
            per_source_timeout,
        })
    }

    pub fn from_config(config: &TomlConfig) -> Result<Self, ProviderError> {
        Self::new(
            SourceParams::from_config(config),
            Duration::from_secs(config.fetch_timeout_secs()),
        )
    }

    /// Fetch all four sources concurrently and assemble the snapshot.
    pub async fn build(&self) -> EnvironmentalSnapshot {
        let (marine, tide, rain, chlorophyll) = tokio::join!(
            self.fetch_marine(),
            self.fetch_tide(),
            self.fetch_rain(),
            self.fetch_chlorophyll(),
        );
        assemble(marine, tide, rain, chlorophyll)
    }

    /// The all-default snapshot, skipping every fetch.
    pub fn offline() -> EnvironmentalSnapshot {
        EnvironmentalSnapshot::defaults("offline mode")
    }

    async fn fetch_marine(&self) -> Fetched<MarineConditions> {
        let result = self
            .bounded(self.marine.fetch(self.params.latitude, self.params.longitude))
            .await;
        Fetched::from_result("marine", result)
    }

    async fn fetch_tide(&self) -> Fetched<TideMovement> {
        let result = self
            .bounded(
                self.tide
                    .fetch(&self.params.tide_station, tide::DEFAULT_WINDOW_HOURS),
            )
            .await
            .and_then(|points| tide::derive_tide(&points));
        Fetched::from_result("tide", result)
    }

    async fn fetch_rain(&self) -> Fetched<f64> {
        let result = self
            .bounded(self.precip.fetch(
                &self.params.nws_office,
                self.params.nws_grid_x,
                self.params.nws_grid_y,
            ))
            .await
            .map(|periods| precip::rain_proxy_in(&periods));
        Fetched::from_result("precipitation", result)
    }

    async fn fetch_chlorophyll(&self) -> Fetched<f64> {
        let result = self
            .bounded(
                self.chlorophyll
                    .fetch(self.params.latitude, self.params.longitude),
            )
            .await;
        Fetched::from_result("chlorophyll", result)
    }

    /// Apply the per-source time budget to a fetch.
    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match tokio::time::timeout(self.per_source_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.per_source_timeout)),
        }
    }
}

/// Merge fetch outcomes with the default table into a complete snapshot.
///
/// Each source owns its snapshot fields: marine covers swell, wind, and SST;
/// tide covers stage and rate; precipitation and chlorophyll one field each.
/// A defaulted source flags exactly its own fields with its cause.
pub fn assemble(
    marine: Fetched<MarineConditions>,
    tide: Fetched<TideMovement>,
    rain: Fetched<f64>,
    chlorophyll: Fetched<f64>,
) -> EnvironmentalSnapshot {
    let mut defaulted = Vec::new();
    let mut flag = |fields: &[SnapshotField], cause: &str| {
        for &field in fields {
            defaulted.push(DefaultedField {
                field,
                cause: cause.to_string(),
            });
        }
    };

    let (swell_height_ft, swell_period_s, swell_direction, wind_speed_kt, wind_direction, sst_f) =
        match marine {
            Fetched::Live(m) => (
                m.swell_height_ft,
                m.swell_period_s,
                m.swell_direction,
                m.wind_speed_kt,
                m.wind_direction,
                m.sea_surface_temp_f,
            ),
            Fetched::Defaulted { cause } => {
                flag(
                    &[
                        SnapshotField::SwellHeight,
                        SnapshotField::SwellPeriod,
                        SnapshotField::SwellDirection,
                        SnapshotField::WindSpeed,
                        SnapshotField::WindDirection,
                        SnapshotField::SeaSurfaceTemp,
                    ],
                    &cause,
                );
                (
                    defaults::SWELL_HEIGHT_FT,
                    defaults::SWELL_PERIOD_S,
                    defaults::SWELL_DIRECTION.to_string(),
                    defaults::WIND_SPEED_KT,
                    defaults::WIND_DIRECTION.to_string(),
                    defaults::SEA_SURFACE_TEMP_F,
                )
            }
        };

    let (tide_stage, tide_rate_ft) = match tide {
        Fetched::Live(t) => (t.stage, t.rate_ft),
        Fetched::Defaulted { cause } => {
            flag(&[SnapshotField::TideStage, SnapshotField::TideRate], &cause);
            (defaults::TIDE_STAGE, defaults::TIDE_RATE_FT)
        }
    };

    let rain_total_in = match rain {
        Fetched::Live(r) => r,
        Fetched::Defaulted { cause } => {
            flag(&[SnapshotField::RainTotal], &cause);
            defaults::RAIN_TOTAL_IN
        }
    };

    let chlorophyll_mg_m3 = match chlorophyll {
        Fetched::Live(c) => c,
        Fetched::Defaulted { cause } => {
            flag(&[SnapshotField::Chlorophyll], &cause);
            defaults::CHLOROPHYLL_MG_M3
        }
    };

    EnvironmentalSnapshot {
        swell_height_ft,
        swell_period_s,
        swell_direction,
        wind_speed_kt,
        wind_direction,
        tide_stage,
        tide_rate_ft,
        current: tide::current_label(tide_stage).to_string(),
        rain_total_in,
        sea_surface_temp_f: sst_f,
        chlorophyll_mg_m3,
        defaulted,
    }
}
