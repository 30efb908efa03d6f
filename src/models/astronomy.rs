//! Sun and moon times for a single day

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Astronomy data for one date at one location.
///
/// Times are kept as the provider's local-time strings ("06:12 AM"); moon
/// events can be absent for a day ("No moonrise").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Astronomy {
    pub date: NaiveDate,
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    /// Percentage, 0-100
    pub moon_illumination: u8,
}
