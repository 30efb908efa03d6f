//! `WeatherPro` - location resolution and weather aggregation for a dashboard
//!
//! Turns a user action (search, suggestion pick, device position or "my
//! location") into one canonical location, fetches the forecast for it, and
//! adds astronomy and marine data keyed on the coordinates the forecast echoed.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod location_resolver;
pub mod models;
pub mod provider;
pub mod suggest;
pub mod telemetry;
pub mod view;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export core types for public API
pub use aggregator::{AggregatedWeather, Aggregator};
pub use config::WeatherProConfig;
pub use dashboard::{CycleState, Dashboard, ErrorSurface, Trigger};
pub use error::{FetchError, ProviderError, ResolutionError, WeatherProError};
pub use location_resolver::{LocationResolver, LocationSignal};
pub use models::{Coordinates, Forecast, LocationQuery, ResolvedLocation, Suggestion};
pub use provider::{WeatherApiClient, WeatherProvider};
pub use suggest::{SuggestionBox, SuggestionOutcome};
pub use view::DashboardView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherProError>;
