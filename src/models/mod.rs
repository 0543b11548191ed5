//! Data models for the weather gateway
//!
//! This module contains the client-facing models organized by concern:
//! - Location: the city-or-coordinates query sent upstream
//! - Weather: the reduced current-weather payload
//! - Forecast: the reduced 5-day forecast payload

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{Forecast, ForecastEntry};
pub use location::{CoordinatesRequest, WeatherQuery};
pub use weather::CurrentWeather;
