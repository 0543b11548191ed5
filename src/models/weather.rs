//! Current weather payload returned to clients

use serde::{Deserialize, Serialize};

/// Reduced current-weather result
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentWeather {
    /// City name as reported by the provider
    pub city_name: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Localized description of the first weather condition
    pub description: String,
    /// Provider icon code of the first weather condition
    pub icon: String,
}
