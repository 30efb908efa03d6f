//! Weather API client for WeatherAPI.com integration
//!
//! This module provides the HTTP client for the five read-only WeatherAPI v1
//! endpoints the dashboard uses (forecast, search, astronomy, marine, ip).
//! Every request carries the static API key; non-success statuses are mapped
//! to [`ProviderError::Status`] using the provider's error envelope when one is
//! returned. Failed calls are not retried.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::WeatherProvider;
use crate::config::ProviderConfig;
use crate::error::{ProviderError, WeatherProError};
use crate::models::{Astronomy, Forecast, IpLocation, LocationQuery, MarineForecast, Suggestion};

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Weather API client for WeatherAPI.com
pub struct WeatherApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &ProviderConfig) -> Result<Self, WeatherProError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                WeatherProError::config(
                    "Missing WeatherAPI key. Set provider.api_key or WEATHERPRO_PROVIDER__API_KEY.",
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| WeatherProError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client: ClientBuilder::new(client).build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a request URL; the key goes first and empty parameters are dropped
    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/{}?key={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in params {
            if value.is_empty() {
                continue;
            }
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Issue a GET and decode the JSON body. Never logs the full URL (it holds the key).
    #[instrument(skip(self, params))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = self.url(endpoint, params);
        let start_time = Instant::now();

        debug!("Requesting {} with {:?}", endpoint, params);

        let response = self.client.get(&url).send().await.map_err(|e| {
            let message = match e {
                reqwest_middleware::Error::Reqwest(err) => err.without_url().to_string(),
                other => other.to_string(),
            };
            warn!("Network error calling {}: {}", endpoint, message);
            ProviderError::Network(message)
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<wire::ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            warn!("{} failed with HTTP {}: {}", endpoint, status.as_u16(), message);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", endpoint, e);
            ProviderError::InvalidResponse(format!("{endpoint}: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "{} answered in {:.3}s",
            endpoint,
            total_duration.as_secs_f64()
        );
        if total_duration > SLOW_RESPONSE {
            warn!(
                "Slow API response from {}: {:.3}s",
                endpoint,
                total_duration.as_secs_f64()
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn forecast(&self, query: &LocationQuery, days: u8) -> Result<Forecast, ProviderError> {
        info!("Getting {}-day forecast for '{}'", days, query);
        let response: wire::ForecastResponse = self
            .get_json(
                "forecast.json",
                &[
                    ("q", query.to_param()),
                    ("days", days.to_string()),
                    ("aqi", "yes".to_string()),
                    ("alerts", "yes".to_string()),
                ],
            )
            .await?;

        let forecast = Forecast::from(response);
        debug!(
            "Forecast resolved '{}' to {} ({})",
            query,
            forecast.location.display_name(),
            forecast.location.coordinates().format_coordinates()
        );
        Ok(forecast)
    }

    async fn search(&self, partial: &str) -> Result<Vec<Suggestion>, ProviderError> {
        debug!("Searching locations matching '{}'", partial);
        let results: Vec<Suggestion> = self
            .get_json("search.json", &[("q", partial.to_string())])
            .await?;

        if results.is_empty() {
            debug!("No results found for '{}'", partial);
        }
        Ok(results)
    }

    async fn astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<Astronomy, ProviderError> {
        debug!("Getting astronomy for '{}' on {}", query, date);
        let response: wire::AstronomyResponse = self
            .get_json(
                "astronomy.json",
                &[
                    ("q", query.to_param()),
                    ("dt", date.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;

        response.astronomy.astro.into_astronomy(date)
    }

    async fn marine(
        &self,
        query: &LocationQuery,
        days: u8,
    ) -> Result<MarineForecast, ProviderError> {
        debug!("Getting {}-day marine forecast for '{}'", days, query);
        let response: wire::MarineResponse = self
            .get_json(
                "marine.json",
                &[
                    ("q", query.to_param()),
                    ("days", days.to_string()),
                    ("tides", "yes".to_string()),
                ],
            )
            .await?;

        Ok(MarineForecast::from(response))
    }

    async fn ip_lookup(&self, ip: Option<IpAddr>) -> Result<IpLocation, ProviderError> {
        let target = ip.map_or_else(|| "auto:ip".to_string(), |ip| ip.to_string());
        debug!("Looking up location for {}", target);
        self.get_json("ip.json", &[("q", target)]).await
    }
}

/// WeatherAPI response envelopes and conversion into the domain models
mod wire {
    use chrono::NaiveDate;
    use serde::Deserialize;

    use crate::error::ProviderError;
    use crate::models::{
        Astronomy, CurrentConditions, Forecast, ForecastDay, MarineDay, MarineForecast,
        ResolvedLocation, Tide, WeatherAlert,
    };

    /// `{"error": {"code": 1006, "message": "No matching location found."}}`
    #[derive(Debug, Deserialize)]
    pub struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub message: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub location: ResolvedLocation,
        pub current: CurrentConditions,
        pub forecast: ForecastDays<ForecastDay>,
        #[serde(default)]
        pub alerts: Option<Alerts>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastDays<T> {
        #[serde(default = "Vec::new")]
        pub forecastday: Vec<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Alerts {
        #[serde(default)]
        pub alert: Vec<WeatherAlert>,
    }

    impl From<ForecastResponse> for Forecast {
        fn from(response: ForecastResponse) -> Self {
            Self {
                location: response.location,
                current: response.current,
                days: response.forecast.forecastday,
                alerts: response.alerts.map(|alerts| alerts.alert).unwrap_or_default(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct AstronomyResponse {
        pub astronomy: AstronomyBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct AstronomyBody {
        pub astro: Astro,
    }

    #[derive(Debug, Deserialize)]
    pub struct Astro {
        pub sunrise: String,
        pub sunset: String,
        pub moonrise: String,
        pub moonset: String,
        pub moon_phase: String,
        pub moon_illumination: NumberOrText,
    }

    /// The provider has sent `moon_illumination` both as `79` and as `"79"`
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum NumberOrText {
        Number(f64),
        Text(String),
    }

    impl NumberOrText {
        fn value(&self) -> Option<f64> {
            match self {
                NumberOrText::Number(value) => Some(*value),
                NumberOrText::Text(text) => text.trim().trim_end_matches('%').parse().ok(),
            }
        }

        fn percent(&self) -> Option<u8> {
            // clamped to 0..=100, so the cast cannot truncate
            self.value()
                .map(|value| value.round().clamp(0.0, 100.0) as u8)
        }
    }

    impl Astro {
        pub fn into_astronomy(self, date: NaiveDate) -> Result<Astronomy, ProviderError> {
            let moon_illumination = self.moon_illumination.percent().ok_or_else(|| {
                ProviderError::InvalidResponse(format!(
                    "astronomy.json: unreadable moon_illumination {:?}",
                    self.moon_illumination
                ))
            })?;

            Ok(Astronomy {
                date,
                sunrise: self.sunrise,
                sunset: self.sunset,
                moonrise: self.moonrise,
                moonset: self.moonset,
                moon_phase: self.moon_phase,
                moon_illumination,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineResponse {
        pub forecast: ForecastDays<MarineForecastDay>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineForecastDay {
        pub date: NaiveDate,
        pub day: MarineDaySummary,
    }

    #[derive(Debug, Deserialize)]
    pub struct MarineDaySummary {
        pub maxtemp_c: f64,
        pub mintemp_c: f64,
        pub maxwind_kph: f64,
        #[serde(default)]
        pub avgvis_km: f64,
        #[serde(default)]
        pub tides: Vec<TideGroup>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TideGroup {
        #[serde(default)]
        pub tide: Vec<TideEntry>,
    }

    /// Tide heights arrive as strings ("0.3")
    #[derive(Debug, Deserialize)]
    pub struct TideEntry {
        pub tide_time: String,
        pub tide_height_mt: NumberOrText,
        #[serde(default)]
        pub tide_type: String,
    }

    impl TideEntry {
        fn into_tide(self) -> Option<Tide> {
            Some(Tide {
                tide_height_mt: self.tide_height_mt.value()?,
                tide_time: self.tide_time,
                tide_type: self.tide_type,
            })
        }
    }

    impl From<MarineResponse> for MarineForecast {
        fn from(response: MarineResponse) -> Self {
            let days = response
                .forecast
                .forecastday
                .into_iter()
                .map(|forecast_day| MarineDay {
                    date: forecast_day.date,
                    maxtemp_c: forecast_day.day.maxtemp_c,
                    mintemp_c: forecast_day.day.mintemp_c,
                    maxwind_kph: forecast_day.day.maxwind_kph,
                    avgvis_km: forecast_day.day.avgvis_km,
                    tides: forecast_day
                        .day
                        .tides
                        .into_iter()
                        .flat_map(|group| group.tide)
                        .filter_map(TideEntry::into_tide)
                        .collect(),
                })
                .collect();
            Self { days }
        }
    }
}
