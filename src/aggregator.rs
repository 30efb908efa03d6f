//! Forecast aggregation
//!
//! One cycle: the forecast fetch is mandatory and decides success. Astronomy
//! and marine fetches run afterwards, concurrently, keyed on the canonical
//! coordinates the forecast echoed back. Their failures stay inside their own
//! fields of [`AggregatedWeather`].

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, instrument, warn};

use crate::error::{FetchError, Section};
use crate::models::{Astronomy, Forecast, LocationQuery, MarineForecast, ResolvedLocation};
use crate::provider::WeatherProvider;

/// Everything one cycle produced
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedWeather {
    pub forecast: Forecast,
    pub astronomy: Result<Astronomy, FetchError>,
    pub marine: Result<MarineForecast, FetchError>,
}

impl AggregatedWeather {
    #[must_use]
    pub fn location(&self) -> &ResolvedLocation {
        &self.forecast.location
    }
}

pub struct Aggregator {
    provider: Arc<dyn WeatherProvider>,
    days: u8,
}

impl Aggregator {
    pub fn new(provider: Arc<dyn WeatherProvider>, days: u8) -> Self {
        Self { provider, days }
    }

    /// Run one aggregation cycle for `query`
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn aggregate(&self, query: &LocationQuery) -> Result<AggregatedWeather, FetchError> {
        let start_time = Instant::now();

        let forecast = self
            .provider
            .forecast(query, self.days)
            .await
            .map_err(|e| {
                error!("Forecast request for '{}' failed: {}", query, e);
                FetchError::ForecastUnavailable(e)
            })?;

        let canonical = forecast.location.query();
        let date = forecast
            .location
            .local_date()
            .unwrap_or_else(|| Utc::now().date_naive());

        let (astronomy, marine) = futures::join!(
            self.fetch_astronomy(&canonical, date),
            self.fetch_marine(&canonical)
        );

        info!(
            "Aggregated weather for {} in {:.3}s (astronomy: {}, marine: {})",
            forecast.location.display_name(),
            start_time.elapsed().as_secs_f64(),
            if astronomy.is_ok() { "ok" } else { "unavailable" },
            if marine.is_ok() { "ok" } else { "unavailable" },
        );

        Ok(AggregatedWeather {
            forecast,
            astronomy,
            marine,
        })
    }

    async fn fetch_astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<Astronomy, FetchError> {
        self.provider.astronomy(query, date).await.map_err(|cause| {
            warn!("Astronomy error for '{}': {}", query, cause);
            FetchError::SecondaryUnavailable {
                section: Section::Astronomy,
                cause,
            }
        })
    }

    async fn fetch_marine(&self, query: &LocationQuery) -> Result<MarineForecast, FetchError> {
        self.provider
            .marine(query, self.days)
            .await
            .map_err(|cause| {
                warn!("Marine error for '{}': {}", query, cause);
                FetchError::SecondaryUnavailable {
                    section: Section::Marine,
                    cause,
                }
            })
    }
}
