//! # clearcall client core
//!
//! Client-side session lifecycle manager for noise-suppressed multi-party
//! audio calls. The controller coordinates:
//!
//! - **Credential fetch**: a short-lived join credential from the token
//!   service, fetched fresh on every connect attempt
//! - **Local audio pipeline**: microphone capture with platform DSP
//!   disabled, wrapped in a publishable track with the noise-suppression
//!   filter installed before publication
//! - **Session connection**: transport connect, track publication, and
//!   remote-track subscription over the transport provider boundary
//! - **Remote playback**: one hidden audio output per session, re-pointed
//!   at the newest remote stream
//! - **Participant registry**: a read-only roster recomputed from the
//!   transport's live peer set on every roster-changing event
//!
//! The transport provider, microphone device, noise filter, audio output,
//! and credential endpoint are external collaborators behind trait
//! boundaries; this crate implements no signaling, codec, or suppression
//! algorithm of its own.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clearcall_client_core::{CallClient, ClientConfig};
//! # use clearcall_client_core::transport::RoomTransport;
//! # use clearcall_client_core::audio::capture::AudioCaptureDevice;
//! # use clearcall_client_core::filter::NoiseFilterFactory;
//! # use clearcall_client_core::playback::AudioOutputFactory;
//!
//! # async fn example(
//! #     transport: Arc<dyn RoomTransport>,
//! #     capture: Arc<dyn AudioCaptureDevice>,
//! #     filters: Arc<dyn NoiseFilterFactory>,
//! #     outputs: Arc<dyn AudioOutputFactory>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let client = CallClient::with_http_credentials(
//!     ClientConfig::new()
//!         .with_transport_url("wss://rooms.example.com")
//!         .with_credential_base_url("http://localhost:3001"),
//!     transport,
//!     capture,
//!     filters,
//!     outputs,
//! );
//!
//! client.connect().await?;
//! client.set_suppression_level(80).await;
//! client.toggle_microphone().await?;
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Known limitation
//!
//! The playback sink drives a single output: with several remote peers
//! publishing audio, the last subscribed stream wins. Multi-peer mixing is
//! intentionally not attempted.

#![warn(missing_docs)]

pub mod audio;
pub mod client;
pub mod credential;
pub mod error;
pub mod events;
pub mod filter;
pub mod participants;
pub mod playback;
pub mod session;
pub mod transport;

// Re-export main types
pub use client::config::ClientConfig;
pub use client::CallClient;
pub use credential::{Credential, CredentialProvider, HttpCredentialClient};
pub use error::{ClientError, ClientResult, TeardownReport};
pub use events::{ClientEvent, ClientStatus};
pub use filter::SuppressionLevel;
pub use participants::RemoteParticipant;
pub use session::{Session, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
