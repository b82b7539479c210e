//! # ClearCall Token Service
//!
//! Minimal HTTP service that issues short-lived room access tokens for
//! ClearCall clients. Each `GET /token` request mints a fresh participant
//! identity and a signed grant for the configured room.
//!
//! The service deliberately carries no user database or login flow; clients
//! are anonymous and every credential expires after the configured TTL.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod token;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use token::{IssuedToken, RoomGrantClaims, TokenIssuer};

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Response body for `GET /token`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed room access token
    pub token: String,
    /// Identity minted for this credential
    pub participant_name: String,
    /// Room the token grants access to
    pub room_name: String,
}

/// Build the service router
///
/// Routes:
/// - `GET /token` issues a credential for a new anonymous participant
pub fn create_router(config: &ServiceConfig) -> Result<Router> {
    let issuer = Arc::new(TokenIssuer::new(config)?);

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .map_err(|_| Error::config(format!("Invalid CORS origin: {}", config.cors_origin)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    Ok(Router::new()
        .route("/token", get(issue_token))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(issuer))
}

/// Handle `GET /token`
async fn issue_token(State(issuer): State<Arc<TokenIssuer>>) -> Result<Json<TokenResponse>> {
    let issued = issuer.issue()?;
    tracing::info!(participant = %issued.participant_name, "Credential issued");
    Ok(Json(TokenResponse {
        token: issued.token,
        participant_name: issued.participant_name,
        room_name: issued.room_name,
    }))
}
