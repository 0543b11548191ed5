//! Error types and HTTP mapping for the weather gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Required configuration (the provider API key) is missing
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Client input failed validation
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The provider does not know the requested location
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The provider answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The provider answered 200 but the body did not match the expected schema
    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },

    /// The provider could not be reached at all
    #[error("Upstream unavailable: {message}")]
    Unavailable { message: String },
}

/// JSON body returned for every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl GatewayError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error carrying the provider's status code
    pub fn upstream<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new invalid-response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a new unavailable error
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// HTTP status the client receives for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message placed in the `detail` field of the response body
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Config { message }
            | GatewayError::Validation { message }
            | GatewayError::NotFound { message }
            | GatewayError::Upstream { message, .. } => message.clone(),
            GatewayError::InvalidResponse { .. } => {
                "Unexpected response from weather provider".to_string()
            }
            GatewayError::Unavailable { .. } => "Weather service unavailable".to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            GatewayError::Config { .. } => tracing::error!("{}", self),
            GatewayError::Upstream { .. }
            | GatewayError::InvalidResponse { .. }
            | GatewayError::Unavailable { .. } => tracing::warn!("{}", self),
            GatewayError::Validation { .. } | GatewayError::NotFound { .. } => {
                tracing::debug!("{}", self)
            }
        }

        let body = ErrorBody {
            detail: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}
