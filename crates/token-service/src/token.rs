//! Room credential issuance

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, ServiceConfig};

/// Claims carried by a room access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomGrantClaims {
    // Standard claims
    pub iss: String, // API key
    pub sub: String, // Participant identity
    pub jti: String, // Token ID
    pub iat: u64,    // Issued at
    pub exp: u64,    // Expiration

    // Room grant
    pub room: String,
    pub can_publish: bool,
    pub can_subscribe: bool,
}

/// Issues signed room access tokens
pub struct TokenIssuer {
    api_key: String,
    room_name: String,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
}

/// A freshly issued credential
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub participant_name: String,
    pub room_name: String,
}

impl TokenIssuer {
    /// Create an issuer from the service configuration (HS256)
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        if config.api_secret.is_empty() {
            return Err(Error::config("API secret must not be empty"));
        }
        Ok(Self {
            api_key: config.api_key.clone(),
            room_name: config.room_name.clone(),
            ttl_seconds: config.token_ttl_seconds,
            encoding_key: EncodingKey::from_secret(config.api_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.api_secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
        })
    }

    /// Issue a token for a newly generated participant identity
    ///
    /// The grant allows publishing and subscribing in the configured room
    /// and expires after the configured TTL.
    pub fn issue(&self) -> Result<IssuedToken> {
        let identity = generate_identity();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.ttl_seconds as i64);

        let claims = RoomGrantClaims {
            iss: self.api_key.clone(),
            sub: identity.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp() as u64,
            exp: exp.timestamp() as u64,
            room: self.room_name.clone(),
            can_publish: true,
            can_subscribe: true,
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| Error::token_generation(e.to_string()))?;

        tracing::debug!(identity = %identity, room = %self.room_name, "Issued room token");

        Ok(IssuedToken {
            token,
            participant_name: identity,
            room_name: self.room_name.clone(),
        })
    }

    /// Decode and verify a token this issuer produced
    pub fn validate(&self, token: &str) -> Result<RoomGrantClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.api_key]);
        decode::<RoomGrantClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::token_generation(format!("Invalid token: {}", e)))
    }
}

/// Generate a participant identity of the form `user-{millis}-{n}`
fn generate_identity() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let n: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("user-{}-{}", millis, n)
}
