//! Marine forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Single high or low tide
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tide {
    pub tide_time: String,
    #[serde(default)]
    pub tide_height_mt: f64,
    #[serde(default)]
    pub tide_type: String,
}

/// Marine summary for one day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarineDay {
    pub date: NaiveDate,
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub maxwind_kph: f64,
    pub avgvis_km: f64,
    pub tides: Vec<Tide>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MarineForecast {
    pub days: Vec<MarineDay>,
}

impl MarineForecast {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
