//! Error types and handling for `WeatherPro`

use std::fmt;

use thiserror::Error;

/// Transport-level failure talking to the weather provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body could not be decoded into the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// No location could be determined from the user's signal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// Device geolocation and IP lookup both failed
    #[error("Unable to determine current location")]
    Unavailable,

    /// Blank search text
    #[error("Location cannot be empty")]
    EmptyQuery,
}

/// The optional parts of an aggregation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Astronomy,
    Marine,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Astronomy => f.write_str("Astronomy"),
            Section::Marine => f.write_str("Marine"),
        }
    }
}

/// Failure of one step of an aggregation cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The mandatory forecast step failed; the cycle produces nothing
    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(#[source] ProviderError),

    /// An optional step failed; the rest of the cycle is unaffected
    #[error("{section} data unavailable: {cause}")]
    SecondaryUnavailable {
        section: Section,
        #[source]
        cause: ProviderError,
    },
}

/// Main error type for the `WeatherPro` application
#[derive(Error, Debug)]
pub enum WeatherProError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Location could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Aggregation cycle failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherProError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherProError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            WeatherProError::Resolution(ResolutionError::Unavailable) => {
                "Unable to get your location. Please search manually.".to_string()
            }
            WeatherProError::Resolution(ResolutionError::EmptyQuery) => {
                "Please enter a location to search for.".to_string()
            }
            WeatherProError::Fetch(_) => {
                "Failed to load weather data. Please try again.".to_string()
            }
            WeatherProError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherProError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherProError::General { message } => message.clone(),
        }
    }
}
