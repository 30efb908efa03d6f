//! Display mapping
//!
//! Pure conversion from an [`AggregatedWeather`] to the strings and numbers a
//! dashboard shows. Nothing here performs I/O.

use serde::Serialize;

use crate::aggregator::AggregatedWeather;
use crate::models::{
    AirQuality, Astronomy, CurrentConditions, ForecastDay, HourlyForecast, MarineDay,
    MarineForecast, Suggestion, WeatherAlert,
};

pub const MARINE_UNAVAILABLE: &str = "Marine weather data not available for this location.";
pub const ASTRONOMY_UNAVAILABLE: &str = "Astronomy data not available for this location.";

const HOURLY_ENTRIES: usize = 24;
const MISSING: &str = "--";

/// A section that may not have loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SectionView<T> {
    Available(T),
    Unavailable { message: String },
}

impl<T> SectionView<T> {
    fn unavailable(message: &str) -> Self {
        SectionView::Unavailable {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub coordinates: String,
    pub local_time: Option<String>,
    pub current: CurrentView,
    pub air_quality: Option<AirQualityView>,
    pub hourly: Vec<HourView>,
    pub daily: Vec<DayView>,
    pub alerts: Vec<AlertView>,
    pub astronomy: SectionView<AstronomyView>,
    pub marine: SectionView<Vec<MarineDayView>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub temperature: String,
    pub feels_like: String,
    pub condition: String,
    pub icon_url: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: String,
    pub uv: String,
    pub cloud: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityView {
    pub index: Option<u8>,
    pub category: String,
    pub pm2_5: String,
    pub pm10: String,
    pub o3: String,
    pub no2: String,
    pub so2: String,
    pub co: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourView {
    pub label: String,
    pub temperature: String,
    pub icon_url: String,
    pub chance_of_rain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: String,
    pub weekday: String,
    pub max: String,
    pub min: String,
    pub condition: String,
    pub icon_url: String,
    pub chance_of_rain: String,
    pub humidity: String,
    pub max_wind: String,
    pub uv: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    pub headline: String,
    pub severity: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstronomyView {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TideView {
    pub time: String,
    pub height: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarineDayView {
    pub date: String,
    pub max: String,
    pub min: String,
    pub max_wind: String,
    pub visibility: String,
    pub tides: Vec<TideView>,
}

/// One autocomplete entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionView {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Suggestion> for SuggestionView {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            label: suggestion.label(),
            latitude: suggestion.latitude,
            longitude: suggestion.longitude,
        }
    }
}

/// US EPA category name for a band index
#[must_use]
pub fn epa_category(index: u8) -> &'static str {
    match index {
        1 => "Good",
        2 => "Moderate",
        3 => "Unhealthy for Sensitive Groups",
        4 => "Unhealthy",
        5 => "Very Unhealthy",
        6 => "Hazardous",
        _ => "Unknown",
    }
}

fn degrees(celsius: f64) -> String {
    format!("{}°C", celsius.round())
}

fn percent(value: f64) -> String {
    format!("{}%", value.round())
}

fn pollutant(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.1}"))
}

impl From<&CurrentConditions> for CurrentView {
    fn from(current: &CurrentConditions) -> Self {
        Self {
            temperature: degrees(current.temp_c),
            feels_like: degrees(current.feelslike_c),
            condition: current.condition.text.clone(),
            icon_url: current.condition.icon_url(),
            humidity: percent(current.humidity),
            wind: format!("{} km/h {}", current.wind_kph.round(), current.wind_dir)
                .trim_end()
                .to_string(),
            pressure: format!("{} mb", current.pressure_mb.round()),
            visibility: format!("{} km", current.vis_km),
            uv: current.uv.to_string(),
            cloud: percent(current.cloud),
        }
    }
}

impl From<&AirQuality> for AirQualityView {
    fn from(aq: &AirQuality) -> Self {
        Self {
            index: aq.us_epa_index,
            category: aq
                .us_epa_index
                .map_or(MISSING, epa_category)
                .to_string(),
            pm2_5: pollutant(aq.pm2_5),
            pm10: pollutant(aq.pm10),
            o3: pollutant(aq.o3),
            no2: pollutant(aq.no2),
            so2: pollutant(aq.so2),
            co: pollutant(aq.co),
        }
    }
}

impl From<&HourlyForecast> for HourView {
    fn from(hour: &HourlyForecast) -> Self {
        Self {
            label: hour.time.format("%-I %p").to_string(),
            temperature: degrees(hour.temp_c),
            icon_url: hour.condition.icon_url(),
            chance_of_rain: percent(hour.chance_of_rain),
        }
    }
}

impl From<&ForecastDay> for DayView {
    fn from(day: &ForecastDay) -> Self {
        Self {
            date: day.date.format("%b %-d").to_string(),
            weekday: day.date.format("%A").to_string(),
            max: degrees(day.day.maxtemp_c),
            min: degrees(day.day.mintemp_c),
            condition: day.day.condition.text.clone(),
            icon_url: day.day.condition.icon_url(),
            chance_of_rain: percent(day.day.daily_chance_of_rain),
            humidity: percent(day.day.avghumidity),
            max_wind: format!("{} km/h", day.day.maxwind_kph.round()),
            uv: day.day.uv.to_string(),
        }
    }
}

impl From<&WeatherAlert> for AlertView {
    fn from(alert: &WeatherAlert) -> Self {
        Self {
            headline: alert.headline.clone(),
            severity: alert.severity.clone(),
            description: alert.description.clone(),
        }
    }
}

impl From<&Astronomy> for AstronomyView {
    fn from(astro: &Astronomy) -> Self {
        Self {
            sunrise: astro.sunrise.clone(),
            sunset: astro.sunset.clone(),
            moonrise: astro.moonrise.clone(),
            moonset: astro.moonset.clone(),
            moon_phase: astro.moon_phase.clone(),
            moon_illumination: format!("{}%", astro.moon_illumination),
        }
    }
}

impl From<&MarineDay> for MarineDayView {
    fn from(day: &MarineDay) -> Self {
        Self {
            date: day.date.format("%b %-d").to_string(),
            max: degrees(day.maxtemp_c),
            min: degrees(day.mintemp_c),
            max_wind: format!("{} km/h", day.maxwind_kph.round()),
            visibility: format!("{} km", day.avgvis_km),
            tides: day
                .tides
                .iter()
                .map(|tide| TideView {
                    time: tide.tide_time.clone(),
                    height: format!("{:.2} m", tide.tide_height_mt),
                    kind: tide.tide_type.clone(),
                })
                .collect(),
        }
    }
}

fn marine_section(marine: &MarineForecast) -> SectionView<Vec<MarineDayView>> {
    if marine.is_empty() {
        SectionView::unavailable(MARINE_UNAVAILABLE)
    } else {
        SectionView::Available(marine.days.iter().map(MarineDayView::from).collect())
    }
}

impl From<&AggregatedWeather> for DashboardView {
    fn from(weather: &AggregatedWeather) -> Self {
        let forecast = &weather.forecast;
        let location = &forecast.location;

        Self {
            title: location.display_name(),
            coordinates: location.coordinates().format_coordinates(),
            local_time: location
                .local_time
                .map(|time| time.format("%A, %B %-d, %Y %I:%M %p").to_string()),
            current: CurrentView::from(&forecast.current),
            air_quality: forecast.current.air_quality.as_ref().map(AirQualityView::from),
            hourly: forecast
                .upcoming_hours(HOURLY_ENTRIES)
                .into_iter()
                .map(HourView::from)
                .collect(),
            daily: forecast.days.iter().map(DayView::from).collect(),
            alerts: forecast.alerts.iter().map(AlertView::from).collect(),
            astronomy: match &weather.astronomy {
                Ok(astro) => SectionView::Available(AstronomyView::from(astro)),
                Err(_) => SectionView::unavailable(ASTRONOMY_UNAVAILABLE),
            },
            marine: match &weather.marine {
                Ok(marine) => marine_section(marine),
                Err(_) => SectionView::unavailable(MARINE_UNAVAILABLE),
            },
        }
    }
}
