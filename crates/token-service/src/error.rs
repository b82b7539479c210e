//! Error types for the token service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Result type for token service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the service or issuing credentials
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is missing or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// Signing or encoding a token failed
    #[error("Token generation failed: {message}")]
    TokenGeneration {
        /// Underlying signing failure
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a token generation error
    pub fn token_generation(message: impl Into<String>) -> Self {
        Self::TokenGeneration {
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config { .. } | Error::TokenGeneration { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::error!("Request failed: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
