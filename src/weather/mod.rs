//! Weather provider abstraction
//!
//! The HTTP layer only talks to [`WeatherProvider`]; the OpenWeatherMap
//! client is the production implementation.

use async_trait::async_trait;

use crate::Result;
use crate::models::{CurrentWeather, Forecast, WeatherQuery};

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a city or coordinate pair
    async fn current_weather(&self, query: &WeatherQuery) -> Result<CurrentWeather>;

    /// 5-day / 3-hour forecast, one entry per provider slot in provider order
    async fn forecast(&self, query: &WeatherQuery) -> Result<Forecast>;
}
