//! Configuration management for `WeatherPro`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WeatherProError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Coordinates;

/// Root configuration structure for the `WeatherPro` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherProConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Forecast window settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Autocomplete settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Fixed device position
    #[serde(default)]
    pub location: LocationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub web: WebConfig,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// WeatherAPI.com key, attached to every request
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Forecast window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days requested from the forecast and marine endpoints
    #[serde(default = "default_forecast_days")]
    pub days: u8,
}

/// Autocomplete settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Shorter input clears the suggestion list without a request
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    /// Quiet period after the last keystroke before a request fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Position reported as the device location. Without one, "current
/// location" falls straight through to IP lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_bind")]
    pub bind: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_provider_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_provider_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("WeatherPro/{}", env!("CARGO_PKG_VERSION"))
}

fn default_forecast_days() -> u8 {
    3
}

fn default_min_query_chars() -> usize {
    2
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_web_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_provider_base_url(),
            timeout_seconds: default_provider_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days: default_forecast_days(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_web_bind(),
            port: default_web_port(),
        }
    }
}

impl LocationConfig {
    /// Configured device position, if both halves are set
    pub fn device_coordinates(&self) -> Result<Option<Coordinates>, WeatherProError> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude).map(Some),
            (None, None) => Ok(None),
            _ => Err(WeatherProError::config(
                "location.latitude and location.longitude must be set together",
            )),
        }
    }
}

impl WeatherProConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHERPRO_PROVIDER__API_KEY -> provider.api_key
        builder = builder.add_source(
            Environment::with_prefix("WEATHERPRO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherProConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherpro").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_provider_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_provider_timeout();
        }
        if self.provider.user_agent.is_empty() {
            self.provider.user_agent = default_user_agent();
        }
        if self.forecast.days == 0 {
            self.forecast.days = default_forecast_days();
        }
        if self.search.min_query_chars == 0 {
            self.search.min_query_chars = default_min_query_chars();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.web.bind.is_empty() {
            self.web.bind = default_web_bind();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.location.device_coordinates()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let Some(api_key) = &self.provider.api_key else {
            return Err(WeatherProError::config(
                "Missing WeatherAPI key. Set provider.api_key in config.toml or WEATHERPRO_PROVIDER__API_KEY.",
            )
            .into());
        };

        if api_key.is_empty() {
            return Err(WeatherProError::config("Weather API key cannot be empty.").into());
        }

        if api_key.len() < 8 {
            return Err(WeatherProError::config(
                "Weather API key appears to be invalid (too short). Please check your API key.",
            )
            .into());
        }

        if api_key.len() > 100 {
            return Err(WeatherProError::config(
                "Weather API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(
                WeatherProError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(1..=14).contains(&self.forecast.days) {
            return Err(
                WeatherProError::config("Forecast days must be between 1 and 14").into(),
            );
        }

        if self.search.debounce_ms > 5000 {
            return Err(
                WeatherProError::config("Search debounce cannot exceed 5000 ms").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherProError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherProError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(WeatherProError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
