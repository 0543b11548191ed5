//! Weather gateway
//!
//! A small HTTP service that forwards city or coordinate lookups to
//! OpenWeatherMap and returns a reduced JSON payload to browser clients.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use models::{CurrentWeather, Forecast, ForecastEntry, WeatherQuery};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GatewayError>;
