//! Location models: coordinates, queries and the provider's canonical location

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::WeatherProError;

/// Geographic position in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherProError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherProError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherProError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format as a human-readable coordinate string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    /// Renders the `lat,lon` form the provider accepts as a `q` parameter
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// What a single aggregation cycle asks the provider for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// City name, postal code, or anything else the provider can resolve
    FreeText(String),
    /// Exact position
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Value for the provider's `q` parameter
    #[must_use]
    pub fn to_param(&self) -> String {
        match self {
            LocationQuery::FreeText(text) => text.clone(),
            LocationQuery::Coordinates(coordinates) => coordinates.to_string(),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl From<Coordinates> for LocationQuery {
    fn from(coordinates: Coordinates) -> Self {
        LocationQuery::Coordinates(coordinates)
    }
}

/// Canonical location echoed back by the forecast endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(default)]
    pub tz_id: Option<String>,
    /// Wall-clock time at the location when the forecast was produced
    #[serde(default, rename = "localtime", with = "super::local_time::option")]
    pub local_time: Option<NaiveDateTime>,
}

impl ResolvedLocation {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Query keyed on the canonical coordinates rather than the user's text
    #[must_use]
    pub fn query(&self) -> LocationQuery {
        LocationQuery::Coordinates(self.coordinates())
    }

    /// "Name, Country", or just the name when the country is missing
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    /// Calendar date at the location
    #[must_use]
    pub fn local_date(&self) -> Option<NaiveDate> {
        self.local_time.map(|time| time.date())
    }
}

/// Autocomplete candidate from the search endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Suggestion {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Suggestion {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// "Name, Region, Country", skipping empty parts
    #[must_use]
    pub fn label(&self) -> String {
        [&self.name, &self.region, &self.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of an IP geolocation lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IpLocation {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, rename = "country_name")]
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl IpLocation {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
