//! Forecast models: current conditions, daily summaries, hourly entries, alerts
//!
//! Field names follow the provider's JSON so the structs deserialize directly;
//! the envelopes around them are unwrapped in the provider client.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::ResolvedLocation;

/// Short description plus icon of a weather condition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative icon URL (`//cdn...`)
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub code: u32,
}

impl Condition {
    /// Absolute icon URL
    #[must_use]
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

/// Pollutant concentrations (μg/m³) and index bands
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    /// US EPA band, 1 (good) to 6 (hazardous)
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<u8>,
    /// UK DEFRA band, 1 to 10
    #[serde(rename = "gb-defra-index")]
    pub gb_defra_index: Option<u8>,
}

/// Current observed conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    #[serde(default, with = "super::local_time::option")]
    pub last_updated: Option<NaiveDateTime>,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    pub pressure_mb: f64,
    #[serde(default)]
    pub precip_mm: f64,
    pub vis_km: f64,
    pub uv: f64,
    pub cloud: f64,
    #[serde(default)]
    pub gust_kph: f64,
    #[serde(default)]
    pub air_quality: Option<AirQuality>,
}

/// One hour of a forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyForecast {
    #[serde(with = "super::local_time")]
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub chance_of_rain: f64,
}

/// Aggregates for a whole forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    pub maxwind_kph: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub avgvis_km: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: f64,
    #[serde(default)]
    pub daily_chance_of_snow: f64,
    #[serde(default)]
    pub uv: f64,
    pub condition: Condition,
}

/// A single day of the multi-day forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DailySummary,
    #[serde(default, rename = "hour")]
    pub hours: Vec<HourlyForecast>,
}

/// Government weather alert
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherAlert {
    pub headline: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub areas: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    #[serde(default)]
    pub instruction: String,
}

/// Everything the mandatory forecast step returns
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Forecast {
    pub location: ResolvedLocation,
    pub current: CurrentConditions,
    pub days: Vec<ForecastDay>,
    pub alerts: Vec<WeatherAlert>,
}

impl Forecast {
    /// Up to `count` hourly entries starting at the location's current hour,
    /// continuing into the following days
    #[must_use]
    pub fn upcoming_hours(&self, count: usize) -> Vec<&HourlyForecast> {
        let start_hour = self
            .location
            .local_time
            .map_or(0, |time| time.hour() as usize);

        let mut days = self.days.iter();
        let Some(first) = days.next() else {
            return Vec::new();
        };

        first
            .hours
            .iter()
            .skip(start_hour)
            .chain(days.flat_map(|day| day.hours.iter()))
            .take(count)
            .collect()
    }
}
