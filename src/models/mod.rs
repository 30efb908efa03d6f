//! Data models for the WeatherPro application
//!
//! This module contains the core domain models organized by concern:
//! - Location: coordinates, queries and the provider's canonical location
//! - Forecast: current conditions, daily and hourly forecasts, alerts
//! - Astronomy: sun and moon times for a single day
//! - Marine: per-day marine summaries and tides

pub mod astronomy;
pub mod forecast;
pub mod local_time;
pub mod location;
pub mod marine;

// Re-export all public types for convenient access
pub use astronomy::Astronomy;
pub use forecast::{
    AirQuality, Condition, CurrentConditions, DailySummary, Forecast, ForecastDay,
    HourlyForecast, WeatherAlert,
};
pub use location::{Coordinates, IpLocation, LocationQuery, ResolvedLocation, Suggestion};
pub use marine::{MarineDay, MarineForecast, Tide};
