//! Forecast payload returned to clients

use serde::{Deserialize, Serialize};

/// Forecast for one city, one entry per provider time slot
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Forecast {
    pub city: String,
    /// Entries in provider order (chronological)
    pub forecast: Vec<ForecastEntry>,
}

/// One 3-hour forecast slot
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Provider timestamp text, e.g. `2024-05-01 12:00:00`
    pub dt_txt: String,
    /// Temperature in Celsius
    pub temp: f64,
    pub description: String,
    pub icon: String,
}
