//! OpenWeatherMap client
//!
//! Issues one GET per call against the current weather or 5-day forecast
//! endpoint, maps the HTTP status to a [`GatewayError`] and reduces the body
//! to the client-facing models. The API key never appears in logs.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::models::{CurrentWeather, Forecast, ForecastEntry, WeatherQuery};
use crate::{GatewayError, Result};

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

/// Fixed query parameters sent with every request
const UNITS: &str = "metric";
const LANG: &str = "ru";

const GENERIC_UPSTREAM_MESSAGE: &str = "Error fetching weather data";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a client from the (already validated) weather configuration
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("weather-gateway/", env!("CARGO_PKG_VERSION")));

        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }

        let client = builder
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| GatewayError::config("API key is not configured"))
    }

    /// GET `endpoint` for `query` and decode a 200 body into `T`
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, query: &WeatherQuery) -> Result<T> {
        // checked before anything touches the network
        let api_key = self.api_key()?;

        let url = format!("{}/{}", self.base_url, endpoint);
        let mut params = query.location_params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", UNITS.to_string()));
        params.push(("lang", LANG.to_string()));

        let start_time = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the API key
                let e = e.without_url();
                warn!("Request to {} failed: {}", url, e);
                GatewayError::unavailable(e.to_string())
            })?;

        let status = response.status();
        debug!(
            "Upstream answered {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::not_found(query.not_found_message()));
        }

        let body = response.bytes().await.map_err(|e| {
            GatewayError::unavailable(format!("Failed to read upstream body: {}", e.without_url()))
        })?;

        // a 2xx other than 200 carries no usable payload and must not reach
        // the client as a success
        if status.is_success() && status != StatusCode::OK {
            return Err(GatewayError::invalid_response(format!(
                "Unexpected {status} from {endpoint} endpoint"
            )));
        }

        if status != StatusCode::OK {
            let message = serde_json::from_slice::<ProviderError>(&body)
                .ok()
                .and_then(|error| error.message)
                .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string());
            return Err(GatewayError::upstream(status.as_u16(), message));
        }

        serde_json::from_slice(&body).map_err(|e| {
            GatewayError::invalid_response(format!("Failed to parse {endpoint} response: {e}"))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip_all, fields(query = %query))]
    async fn current_weather(&self, query: &WeatherQuery) -> Result<CurrentWeather> {
        let response: CurrentResponse = self.fetch(CURRENT_ENDPOINT, query).await?;
        let weather = CurrentWeather::try_from(response)?;

        info!(
            "Current weather for {}: {:.1}°C, {}",
            weather.city_name, weather.temperature, weather.description
        );
        Ok(weather)
    }

    #[instrument(skip_all, fields(query = %query))]
    async fn forecast(&self, query: &WeatherQuery) -> Result<Forecast> {
        let response: ForecastResponse = self.fetch(FORECAST_ENDPOINT, query).await?;

        let city = response
            .city
            .map(|city| city.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| query.to_string());

        let forecast = response
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect::<Result<Vec<_>>>()?;

        info!("Forecast for {} with {} slots", city, forecast.len());
        Ok(Forecast { city, forecast })
    }
}

// Provider schema, limited to the fields the gateway reads

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    main: Main,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct City {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt_txt: String,
    main: Main,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    city: Option<City>,
    list: Vec<ForecastItem>,
}

fn first_condition(conditions: Vec<Condition>) -> Result<Condition> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::invalid_response("weather condition list is empty"))
}

impl TryFrom<CurrentResponse> for CurrentWeather {
    type Error = GatewayError;

    fn try_from(response: CurrentResponse) -> Result<Self> {
        let condition = first_condition(response.weather)?;
        Ok(CurrentWeather {
            city_name: response.name,
            temperature: response.main.temp,
            description: condition.description,
            icon: condition.icon,
        })
    }
}

impl TryFrom<ForecastItem> for ForecastEntry {
    type Error = GatewayError;

    fn try_from(item: ForecastItem) -> Result<Self> {
        let condition = first_condition(item.weather)?;
        Ok(ForecastEntry {
            dt_txt: item.dt_txt,
            temp: item.main.temp,
            description: condition.description,
            icon: condition.icon,
        })
    }
}
