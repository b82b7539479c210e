//! Configuration for the token service

use serde::Deserialize;

use crate::{Error, Result};

/// Main service configuration
///
/// Every field can be overridden through a `CLEARCALL_*` environment
/// variable; defaults target a local development setup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// TCP port the HTTP listener binds to
    pub port: u16,
    /// Origin allowed by the CORS layer
    pub cors_origin: String,
    /// API key embedded in issued tokens as the issuer
    pub api_key: String,
    /// HMAC secret used to sign tokens
    pub api_secret: String,
    /// Room every issued credential grants access to
    pub room_name: String,
    /// Lifetime of issued tokens in seconds
    pub token_ttl_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// Recognized variables: `CLEARCALL_PORT`, `CLEARCALL_CORS_ORIGIN`,
    /// `CLEARCALL_API_KEY`, `CLEARCALL_API_SECRET`, `CLEARCALL_ROOM_NAME`,
    /// `CLEARCALL_TOKEN_TTL_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("CLEARCALL_PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::config(format!("Invalid CLEARCALL_PORT: {}", port)))?;
        }
        if let Ok(origin) = std::env::var("CLEARCALL_CORS_ORIGIN") {
            config.cors_origin = origin;
        }
        if let Ok(key) = std::env::var("CLEARCALL_API_KEY") {
            config.api_key = key;
        }
        if let Ok(secret) = std::env::var("CLEARCALL_API_SECRET") {
            config.api_secret = secret;
        }
        if let Ok(room) = std::env::var("CLEARCALL_ROOM_NAME") {
            config.room_name = room;
        }
        if let Ok(ttl) = std::env::var("CLEARCALL_TOKEN_TTL_SECONDS") {
            config.token_ttl_seconds = ttl.parse().map_err(|_| {
                Error::config(format!("Invalid CLEARCALL_TOKEN_TTL_SECONDS: {}", ttl))
            })?;
        }

        if config.api_secret.is_empty() {
            return Err(Error::config("CLEARCALL_API_SECRET must not be empty"));
        }

        Ok(config)
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            api_key: "devkey".to_string(),
            api_secret: "devsecret-change-me".to_string(),
            room_name: "noise-filtered-room".to_string(),
            token_ttl_seconds: 600, // 10 minutes
        }
    }
}
