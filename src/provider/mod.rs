//! Weather provider seam
//!
//! Everything the aggregation workflow needs from the outside world goes
//! through [`WeatherProvider`], so the workflow can be exercised against a
//! fake and the HTTP client can be swapped.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ProviderError;
use crate::models::{Astronomy, Forecast, IpLocation, LocationQuery, MarineForecast, Suggestion};

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Read-only queries against the remote weather service
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Forecast with current conditions, air quality and alerts
    async fn forecast(&self, query: &LocationQuery, days: u8) -> Result<Forecast, ProviderError>;

    /// Autocomplete candidates for partial text
    async fn search(&self, partial: &str) -> Result<Vec<Suggestion>, ProviderError>;

    async fn astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<Astronomy, ProviderError>;

    async fn marine(&self, query: &LocationQuery, days: u8)
    -> Result<MarineForecast, ProviderError>;

    /// Geolocate an IP address; `None` means the caller's own address
    async fn ip_lookup(&self, ip: Option<IpAddr>) -> Result<IpLocation, ProviderError>;
}
