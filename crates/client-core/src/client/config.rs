//! Configuration for the call client
//!
//! All values are externally supplied (environment-style); the client
//! performs no configuration-file loading of its own.

use crate::filter::SuppressionLevel;

/// Call client configuration
///
/// # Examples
///
/// ```rust
/// use clearcall_client_core::client::config::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_transport_url("wss://rooms.example.com")
///     .with_credential_base_url("http://localhost:3001")
///     .with_suppression_level(80);
///
/// assert_eq!(config.transport_url, "wss://rooms.example.com");
/// assert_eq!(config.initial_suppression_level.value(), 80);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the transport provider
    pub transport_url: String,
    /// Base URL of the credential-issuing service
    pub credential_base_url: String,
    /// Suppression intensity applied at the first connect
    pub initial_suppression_level: SuppressionLevel,
}

impl ClientConfig {
    /// Create a configuration with local-development defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport provider URL
    pub fn with_transport_url(mut self, url: impl Into<String>) -> Self {
        self.transport_url = url.into();
        self
    }

    /// Set the credential endpoint base URL
    pub fn with_credential_base_url(mut self, url: impl Into<String>) -> Self {
        self.credential_base_url = url.into();
        self
    }

    /// Set the initial suppression intensity (clamped into `[0, 100]`)
    pub fn with_suppression_level(mut self, level: i32) -> Self {
        self.initial_suppression_level = SuppressionLevel::new(level);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport_url: "ws://localhost:7880".to_string(),
            credential_base_url: "http://localhost:3001".to_string(),
            initial_suppression_level: SuppressionLevel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_suppression_level() {
        let config = ClientConfig::new().with_suppression_level(500);
        assert_eq!(config.initial_suppression_level.value(), 100);
    }

    #[test]
    fn defaults_target_local_development() {
        let config = ClientConfig::default();
        assert_eq!(config.credential_base_url, "http://localhost:3001");
        assert_eq!(config.initial_suppression_level.value(), 50);
    }
}
