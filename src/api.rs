use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tracing::debug;

use crate::{
    GatewayError, Result, VERSION,
    models::{CoordinatesRequest, CurrentWeather, Forecast, WeatherQuery, location::NO_COORDS},
    weather::WeatherProvider,
};

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Routes mounted under `/api`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/coords", post(get_weather_by_coords))
        .route("/weather/{city}", get(get_weather_by_city))
        .route("/forecast/{city}", get(get_forecast_by_city))
        .with_state(state)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

async fn get_weather_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CurrentWeather>> {
    let query = WeatherQuery::city(&city)?;
    let weather = state.provider.current_weather(&query).await?;
    Ok(Json(weather))
}

async fn get_forecast_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<Forecast>> {
    let query = WeatherQuery::city(&city)?;
    let forecast = state.provider.forecast(&query).await?;
    Ok(Json(forecast))
}

async fn get_weather_by_coords(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CoordinatesRequest>, JsonRejection>,
) -> Result<Json<CurrentWeather>> {
    // malformed bodies and non-numeric values are reported like missing ones
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected coordinates body: {}", rejection.body_text());
        GatewayError::validation(NO_COORDS)
    })?;

    let query = WeatherQuery::try_from(request)?;
    let weather = state.provider.current_weather(&query).await?;
    Ok(Json(weather))
}
