//! Credential client
//!
//! Requests a short-lived join credential from the external issuing
//! service. A fresh credential is fetched on every connect attempt and
//! consumed by the connect sequence. No retry is performed here; the
//! session controller decides whether to retry on the outer connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// A short-lived signed grant authorizing a participant to join one room
///
/// Immutable once issued; the validity window is embedded in the signed
/// token and enforced by the transport provider.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The signed join token
    pub token: String,
    /// Participant identity assigned by the issuing service
    pub participant_name: String,
    /// Target room identifier
    pub room_name: String,
    /// When this credential was received
    pub issued_at: DateTime<Utc>,
}

/// Source of join credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch a fresh credential.
    ///
    /// Fails with [`ClientError::CredentialUnavailable`] when the network
    /// call fails or the response is malformed.
    async fn fetch_credential(&self) -> ClientResult<Credential>;
}

/// Wire shape of the credential endpoint's response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    token: String,
    participant_name: String,
    room_name: String,
}

impl CredentialResponse {
    fn into_credential(self) -> ClientResult<Credential> {
        if self.token.is_empty() || self.participant_name.is_empty() || self.room_name.is_empty() {
            return Err(ClientError::credential(
                "credential response has empty token, participant, or room field",
            ));
        }
        Ok(Credential {
            token: self.token,
            participant_name: self.participant_name,
            room_name: self.room_name,
            issued_at: Utc::now(),
        })
    }
}

/// HTTP credential client against the token service
///
/// # Examples
///
/// ```rust,no_run
/// use clearcall_client_core::credential::{CredentialProvider, HttpCredentialClient};
///
/// # tokio_test::block_on(async {
/// let client = HttpCredentialClient::new("http://localhost:3001");
/// let credential = client.fetch_credential().await.unwrap();
/// println!("joining {} as {}", credential.room_name, credential.participant_name);
/// # });
/// ```
pub struct HttpCredentialClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCredentialClient {
    /// Create a client for the credential endpoint at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn token_url(&self) -> String {
        format!("{}/token", self.base_url)
    }
}

#[async_trait]
impl CredentialProvider for HttpCredentialClient {
    async fn fetch_credential(&self) -> ClientResult<Credential> {
        let url = self.token_url();
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::credential(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ClientError::credential(format!(
                "credential endpoint returned {}",
                response.status()
            )));
        }

        let body: CredentialResponse = response
            .json()
            .await
            .map_err(|e| ClientError::credential(format!("malformed credential response: {}", e)))?;

        let credential = body.into_credential()?;
        tracing::debug!(
            "fetched credential for {} in room {}",
            credential.participant_name,
            credential.room_name
        );
        Ok(credential)
    }
}
