//! Provider fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use weatherpro::config::ProviderConfig;
use weatherpro::{WeatherApiClient, WeatherProvider};
use wiremock::MockServer;

pub const API_KEY: &str = "test_key_1234";

pub fn client(server: &MockServer) -> Arc<dyn WeatherProvider> {
    let config = ProviderConfig {
        api_key: Some(API_KEY.to_string()),
        base_url: server.uri(),
        ..ProviderConfig::default()
    };
    Arc::new(WeatherApiClient::new(&config).unwrap())
}

fn condition() -> Value {
    json!({
        "text": "Partly cloudy",
        "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
        "code": 1003
    })
}

fn forecast_day(date: &str) -> Value {
    let hours: Vec<Value> = (0..24)
        .map(|hour| {
            json!({
                "time": format!("{date} {hour:02}:00"),
                "temp_c": 12.0 + f64::from(hour) / 3.0,
                "condition": condition(),
                "wind_kph": 9.4,
                "humidity": 61,
                "chance_of_rain": 10
            })
        })
        .collect();

    json!({
        "date": date,
        "day": {
            "maxtemp_c": 21.4,
            "mintemp_c": 11.6,
            "avgtemp_c": 16.2,
            "maxwind_kph": 14.8,
            "totalprecip_mm": 0.4,
            "avgvis_km": 10.0,
            "avghumidity": 64,
            "daily_chance_of_rain": 35,
            "daily_chance_of_snow": 0,
            "uv": 5.0,
            "condition": condition()
        },
        "hour": hours
    })
}

/// forecast.json for Paris as the provider canonicalizes it
pub fn paris_forecast() -> Value {
    json!({
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "lat": 48.85,
            "lon": 2.35,
            "tz_id": "Europe/Paris",
            "localtime_epoch": 1714739400,
            "localtime": "2024-05-03 14:30"
        },
        "current": {
            "last_updated": "2024-05-03 14:15",
            "temp_c": 18.6,
            "feelslike_c": 17.4,
            "is_day": 1,
            "condition": condition(),
            "humidity": 55,
            "wind_kph": 13.0,
            "wind_dir": "WSW",
            "pressure_mb": 1016.0,
            "precip_mm": 0.0,
            "vis_km": 10.0,
            "uv": 4.0,
            "cloud": 50,
            "gust_kph": 17.3,
            "air_quality": {
                "co": 230.3,
                "no2": 13.9,
                "o3": 72.2,
                "so2": 2.1,
                "pm2_5": 6.3,
                "pm10": 9.0,
                "us-epa-index": 1,
                "gb-defra-index": 1
            }
        },
        "forecast": {
            "forecastday": [
                forecast_day("2024-05-03"),
                forecast_day("2024-05-04"),
                forecast_day("2024-05-05")
            ]
        },
        "alerts": { "alert": [] }
    })
}

pub fn paris_astronomy() -> Value {
    json!({
        "location": { "name": "Paris", "lat": 48.85, "lon": 2.35 },
        "astronomy": {
            "astro": {
                "sunrise": "06:31 AM",
                "sunset": "09:07 PM",
                "moonrise": "03:12 AM",
                "moonset": "04:41 PM",
                "moon_phase": "Waning Crescent",
                "moon_illumination": "24",
                "is_moon_up": 0,
                "is_sun_up": 1
            }
        }
    })
}

pub fn paris_marine() -> Value {
    json!({
        "location": { "name": "Paris", "lat": 48.85, "lon": 2.35 },
        "forecast": {
            "forecastday": [{
                "date": "2024-05-03",
                "day": {
                    "maxtemp_c": 19.2,
                    "mintemp_c": 14.1,
                    "maxwind_kph": 18.7,
                    "avgvis_km": 10.0,
                    "tides": [{
                        "tide": [
                            { "tide_time": "2024-05-03 04:12", "tide_height_mt": "0.30", "tide_type": "HIGH" },
                            { "tide_time": "2024-05-03 10:31", "tide_height_mt": "-0.10", "tide_type": "LOW" }
                        ]
                    }]
                }
            }]
        }
    })
}

pub fn search_results() -> Value {
    json!([
        { "id": 803267, "name": "Paris", "region": "Ile-de-France", "country": "France", "lat": 48.87, "lon": 2.33, "url": "paris-ile-de-france-france" },
        { "id": 2618724, "name": "Paris", "region": "Texas", "country": "United States of America", "lat": 33.66, "lon": -95.56, "url": "paris-texas-united-states-of-america" }
    ])
}

pub fn ip_berlin() -> Value {
    json!({
        "ip": "203.0.113.7",
        "type": "ipv4",
        "city": "Berlin",
        "region": "Berlin",
        "country_name": "Germany",
        "lat": 52.52,
        "lon": 13.4,
        "tz_id": "Europe/Berlin"
    })
}

/// `{"error": {...}}` body the provider sends with 4xx statuses
pub fn provider_error(code: u32, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
