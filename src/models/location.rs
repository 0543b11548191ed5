//! Location query model: a city name or a coordinate pair

use serde::Deserialize;
use std::fmt;

use crate::{GatewayError, Result};

/// Message returned when the coordinates body is incomplete
pub const NO_COORDS: &str = "No coords";

/// What the gateway asks the provider about
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    /// City name, passed to the provider verbatim
    City(String),
    /// Latitude and longitude in decimal degrees
    Coordinates { lat: f64, lon: f64 },
}

/// Body of `POST /api/weather/coords`
///
/// Both fields are optional on the wire so a missing one can be reported
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatesRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl WeatherQuery {
    /// Build a city query, rejecting blank names
    pub fn city(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(GatewayError::validation("City is required"));
        }
        Ok(Self::City(name.to_string()))
    }

    /// Upstream query parameters identifying the location
    #[must_use]
    pub fn location_params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::City(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }

    /// Detail message used when the provider does not know the location
    #[must_use]
    pub fn not_found_message(&self) -> &'static str {
        match self {
            WeatherQuery::City(_) => "City not found",
            WeatherQuery::Coordinates { .. } => "Not found",
        }
    }
}

impl TryFrom<CoordinatesRequest> for WeatherQuery {
    type Error = GatewayError;

    fn try_from(request: CoordinatesRequest) -> Result<Self> {
        match (request.lat, request.lon) {
            (Some(lat), Some(lon)) => Ok(WeatherQuery::Coordinates { lat, lon }),
            _ => Err(GatewayError::validation(NO_COORDS)),
        }
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::City(name) => write!(f, "{name}"),
            WeatherQuery::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}
