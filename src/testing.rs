//! Fixtures and a scripted provider for unit tests

use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ProviderError;
use crate::models::{
    AirQuality, Astronomy, Condition, CurrentConditions, DailySummary, Forecast, ForecastDay,
    HourlyForecast, IpLocation, LocationQuery, MarineDay, MarineForecast, ResolvedLocation,
    Suggestion, Tide,
};
use crate::provider::WeatherProvider;

fn condition(text: &str) -> Condition {
    Condition {
        text: text.to_string(),
        icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
        code: 1003,
    }
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
}

/// Three forecast days of 24 hours each; local time 2024-05-03 14:30
pub fn sample_forecast(name: &str, country: &str, latitude: f64, longitude: f64) -> Forecast {
    let days = (0..3)
        .map(|offset| {
            let date = start_date() + chrono::Days::new(offset);
            ForecastDay {
                date,
                day: DailySummary {
                    maxtemp_c: 21.4 + offset as f64,
                    mintemp_c: 11.6,
                    avgtemp_c: 16.0,
                    maxwind_kph: 14.8,
                    totalprecip_mm: 0.4,
                    avgvis_km: 10.0,
                    avghumidity: 64.0,
                    daily_chance_of_rain: 35.0,
                    daily_chance_of_snow: 0.0,
                    uv: 5.0,
                    condition: condition("Partly cloudy"),
                },
                hours: (0..24)
                    .map(|hour| HourlyForecast {
                        time: date.and_hms_opt(hour, 0, 0).unwrap(),
                        temp_c: 10.0 + f64::from(hour) / 2.0,
                        condition: condition("Partly cloudy"),
                        wind_kph: 9.0,
                        humidity: 60.0,
                        chance_of_rain: 10.0,
                    })
                    .collect(),
            }
        })
        .collect();

    Forecast {
        location: ResolvedLocation {
            name: name.to_string(),
            region: String::new(),
            country: country.to_string(),
            latitude,
            longitude,
            tz_id: Some("Europe/Paris".to_string()),
            local_time: NaiveDateTime::parse_from_str("2024-05-03 14:30", "%Y-%m-%d %H:%M").ok(),
        },
        current: CurrentConditions {
            last_updated: NaiveDateTime::parse_from_str("2024-05-03 14:15", "%Y-%m-%d %H:%M").ok(),
            temp_c: 18.6,
            feelslike_c: 17.4,
            condition: condition("Partly cloudy"),
            humidity: 55.0,
            wind_kph: 13.0,
            wind_dir: "WSW".to_string(),
            pressure_mb: 1016.0,
            precip_mm: 0.0,
            vis_km: 10.0,
            uv: 4.0,
            cloud: 50.0,
            gust_kph: 17.3,
            air_quality: Some(AirQuality {
                co: Some(230.3),
                no2: Some(13.9),
                o3: Some(72.2),
                so2: Some(2.1),
                pm2_5: Some(6.25),
                pm10: Some(9.0),
                us_epa_index: Some(1),
                gb_defra_index: Some(1),
            }),
        },
        days,
        alerts: Vec::new(),
    }
}

pub fn sample_astronomy() -> Astronomy {
    Astronomy {
        date: start_date(),
        sunrise: "06:31 AM".to_string(),
        sunset: "09:07 PM".to_string(),
        moonrise: "03:12 AM".to_string(),
        moonset: "04:41 PM".to_string(),
        moon_phase: "Waning Crescent".to_string(),
        moon_illumination: 24,
    }
}

pub fn sample_marine() -> MarineForecast {
    MarineForecast {
        days: (0..3)
            .map(|offset| MarineDay {
                date: start_date() + chrono::Days::new(offset),
                maxtemp_c: 19.2,
                mintemp_c: 14.1,
                maxwind_kph: 18.7,
                avgvis_km: 10.0,
                tides: vec![Tide {
                    tide_time: "04:12".to_string(),
                    tide_height_mt: 0.3,
                    tide_type: "HIGH".to_string(),
                }],
            })
            .collect(),
    }
}

pub fn suggestion(name: &str, latitude: f64, longitude: f64) -> Suggestion {
    Suggestion {
        id: None,
        name: name.to_string(),
        region: String::new(),
        country: "France".to_string(),
        latitude,
        longitude,
    }
}

/// Provider returning canned results and recording every call
pub struct FakeProvider {
    pub forecast: Result<Forecast, ProviderError>,
    pub suggestions: Result<Vec<Suggestion>, ProviderError>,
    pub astronomy: Result<Astronomy, ProviderError>,
    pub marine: Result<MarineForecast, ProviderError>,
    pub ip: Result<IpLocation, ProviderError>,
    pub search_delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    /// Everything succeeds; the forecast resolves to Paris (48.85, 2.35),
    /// IP lookup to Berlin (52.52, 13.4)
    pub fn paris() -> Self {
        Self {
            forecast: Ok(sample_forecast("Paris", "France", 48.85, 2.35)),
            suggestions: Ok(vec![suggestion("Paris", 48.87, 2.33)]),
            astronomy: Ok(sample_astronomy()),
            marine: Ok(sample_marine()),
            ip: Ok(IpLocation {
                ip: "203.0.113.7".to_string(),
                city: "Berlin".to_string(),
                region: "Berlin".to_string(),
                country: "Germany".to_string(),
                latitude: 52.52,
                longitude: 13.4,
            }),
            search_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn forecast(&self, query: &LocationQuery, days: u8) -> Result<Forecast, ProviderError> {
        self.record(format!("forecast:{query}:{days}"));
        self.forecast.clone()
    }

    async fn search(&self, partial: &str) -> Result<Vec<Suggestion>, ProviderError> {
        self.record(format!("search:{partial}"));
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }
        self.suggestions.clone()
    }

    async fn astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<Astronomy, ProviderError> {
        self.record(format!("astronomy:{query}:{date}"));
        self.astronomy.clone()
    }

    async fn marine(
        &self,
        query: &LocationQuery,
        days: u8,
    ) -> Result<MarineForecast, ProviderError> {
        self.record(format!("marine:{query}:{days}"));
        self.marine.clone()
    }

    async fn ip_lookup(&self, ip: Option<IpAddr>) -> Result<IpLocation, ProviderError> {
        self.record(format!(
            "ip:{}",
            ip.map_or_else(|| "auto".to_string(), |ip| ip.to_string())
        ));
        self.ip.clone()
    }
}
