//! Dashboard orchestration
//!
//! Owns the only mutable display state: the outcome of the latest completed
//! cycle. Cycles are driven through `&mut self`, so a dashboard never runs two
//! at once and whichever completes last is what it shows.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::aggregator::{AggregatedWeather, Aggregator};
use crate::location_resolver::{LocationResolver, LocationSignal};
use crate::models::{Coordinates, Suggestion};
use crate::view::DashboardView;
use crate::{Result, WeatherProError};

/// User action that starts a cycle
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Search submitted (button or enter)
    Search(String),
    SuggestionSelected(Suggestion),
    /// Device reported a position
    Coordinates(Coordinates),
    /// "Use my location" button
    CurrentLocation,
    /// First load; behaves like `CurrentLocation`
    Startup,
}

impl From<Trigger> for LocationSignal {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Search(text) => LocationSignal::Text(text),
            Trigger::SuggestionSelected(suggestion) => LocationSignal::Selected(suggestion),
            Trigger::Coordinates(coordinates) => LocationSignal::Coordinates(coordinates),
            Trigger::CurrentLocation | Trigger::Startup => LocationSignal::CurrentLocation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleState {
    Idle,
    Loading,
    Success(Box<AggregatedWeather>),
    /// Holds the message that was shown to the user
    Failed(String),
}

/// Channel for the single human-readable failure message of a cycle
pub trait ErrorSurface: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Surface that only logs
pub struct LogErrorSurface;

impl ErrorSurface for LogErrorSurface {
    fn show_error(&self, message: &str) {
        error!("{}", message);
    }
}

pub struct Dashboard {
    resolver: LocationResolver,
    aggregator: Aggregator,
    errors: Arc<dyn ErrorSurface>,
    state: CycleState,
}

impl Dashboard {
    pub fn new(
        resolver: LocationResolver,
        aggregator: Aggregator,
        errors: Arc<dyn ErrorSurface>,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            errors,
            state: CycleState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Data from the latest successful cycle, if that is what is shown
    #[must_use]
    pub fn weather(&self) -> Option<&AggregatedWeather> {
        match &self.state {
            CycleState::Success(weather) => Some(weather),
            _ => None,
        }
    }

    #[must_use]
    pub fn view(&self) -> Option<DashboardView> {
        self.weather().map(DashboardView::from)
    }

    /// Run one full cycle. A blank search is ignored.
    pub async fn trigger(&mut self, trigger: Trigger) -> &CycleState {
        let signal = LocationSignal::from(trigger);
        if matches!(&signal, LocationSignal::Text(text) if text.trim().is_empty()) {
            debug!("Ignoring blank search");
            return &self.state;
        }

        self.state = CycleState::Loading;
        self.state = match self.run_cycle(signal).await {
            Ok(weather) => {
                info!("Showing weather for {}", weather.location().display_name());
                CycleState::Success(Box::new(weather))
            }
            Err(e) => {
                error!("Weather cycle failed: {}", e);
                let message = e.user_message();
                self.errors.show_error(&message);
                CycleState::Failed(message)
            }
        };
        &self.state
    }

    /// User dismissed the error
    pub fn acknowledge(&mut self) {
        if matches!(self.state, CycleState::Failed(_)) {
            self.state = CycleState::Idle;
        }
    }

    async fn run_cycle(&self, signal: LocationSignal) -> Result<AggregatedWeather> {
        let query = self.resolver.resolve(signal).await?;
        self.aggregator
            .aggregate(&query)
            .await
            .map_err(WeatherProError::from)
    }
}
