//! Location Resolution Module
//!
//! This module turns what the user did (typed a search, picked a suggestion,
//! shared a device position, or asked for "my location") into the
//! [`LocationQuery`] an aggregation cycle runs against.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::ResolutionError;
use crate::models::{Coordinates, LocationQuery, Suggestion};
use crate::provider::WeatherProvider;

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSignal {
    /// Submitted search text
    Text(String),
    /// Autocomplete candidate the user picked
    Selected(Suggestion),
    /// Position the device already reported
    Coordinates(Coordinates),
    /// "Use my location": device geolocation, then IP lookup
    CurrentLocation,
}

/// Why the device could not report a position
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Geolocation permission denied")]
    Denied,
    #[error("Geolocation not supported")]
    Unsupported,
}

/// Source of the device's own position
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Device without geolocation support
pub struct NoDeviceLocation;

#[async_trait]
impl DeviceLocator for NoDeviceLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Device reporting a fixed, configured position
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl DeviceLocator for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Service for resolving location signals
pub struct LocationResolver {
    provider: Arc<dyn WeatherProvider>,
    device: Arc<dyn DeviceLocator>,
}

impl LocationResolver {
    pub fn new(provider: Arc<dyn WeatherProvider>, device: Arc<dyn DeviceLocator>) -> Self {
        Self { provider, device }
    }

    /// Resolve a location signal into the query for one aggregation cycle
    pub async fn resolve(&self, signal: LocationSignal) -> Result<LocationQuery, ResolutionError> {
        self.resolve_for_client(signal, None).await
    }

    /// Like [`resolve`](Self::resolve), but an IP fallback looks up `client_ip`
    /// instead of the address the provider sees the request coming from.
    pub async fn resolve_for_client(
        &self,
        signal: LocationSignal,
        client_ip: Option<IpAddr>,
    ) -> Result<LocationQuery, ResolutionError> {
        debug!("Resolving location signal: {:?}", signal);

        let query = match signal {
            LocationSignal::Text(text) => Self::resolve_text(&text)?,
            LocationSignal::Selected(suggestion) => {
                debug!("Using selected suggestion '{}'", suggestion.label());
                LocationQuery::Coordinates(suggestion.coordinates())
            }
            LocationSignal::Coordinates(coordinates) => LocationQuery::Coordinates(coordinates),
            LocationSignal::CurrentLocation => self.resolve_current_location(client_ip).await?,
        };

        debug!("Resolved location query: {}", query);
        Ok(query)
    }

    /// Free text, unless it spells out valid coordinates
    fn resolve_text(text: &str) -> Result<LocationQuery, ResolutionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ResolutionError::EmptyQuery);
        }

        Ok(parse_coordinates(text).map_or_else(
            || LocationQuery::FreeText(text.to_string()),
            LocationQuery::Coordinates,
        ))
    }

    /// Device first, IP second, each tried once
    async fn resolve_current_location(
        &self,
        client_ip: Option<IpAddr>,
    ) -> Result<LocationQuery, ResolutionError> {
        match self.device.locate().await {
            Ok(coordinates) => {
                info!(
                    "Using device location {}",
                    coordinates.format_coordinates()
                );
                return Ok(LocationQuery::Coordinates(coordinates));
            }
            Err(e) => debug!("Device location unavailable ({}), trying IP lookup", e),
        }

        match self.provider.ip_lookup(client_ip).await {
            Ok(ip_location) => {
                info!(
                    "Using IP-derived location {} ({})",
                    ip_location.city,
                    ip_location.coordinates().format_coordinates()
                );
                Ok(LocationQuery::Coordinates(ip_location.coordinates()))
            }
            Err(e) => {
                warn!("IP location lookup failed: {}", e);
                Err(ResolutionError::Unavailable)
            }
        }
    }
}

/// Parse coordinates from strings like "46.8182,8.2275" or "46.8182 8.2275"
pub fn parse_coordinates(input: &str) -> Option<Coordinates> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let [lat, lon] = parts.as_slice() else {
        return None;
    };

    let lat = lat.parse::<f64>().ok()?;
    let lon = lon.parse::<f64>().ok()?;
    Coordinates::new(lat, lon).ok()
}
