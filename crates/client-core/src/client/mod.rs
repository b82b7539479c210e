//! Session controller
//!
//! [`CallClient`] is the orchestrator: it sequences credential fetch,
//! session establishment, local publication, remote playback, and roster
//! maintenance, and guarantees clean teardown on every exit path. All
//! session state is owned by one controller instance; concurrent sessions
//! require separate instances, each independently lifecycled.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clearcall_client_core::client::{CallClient, config::ClientConfig};
//! # use clearcall_client_core::credential::CredentialProvider;
//! # use clearcall_client_core::transport::RoomTransport;
//! # use clearcall_client_core::audio::capture::AudioCaptureDevice;
//! # use clearcall_client_core::filter::NoiseFilterFactory;
//! # use clearcall_client_core::playback::AudioOutputFactory;
//!
//! # async fn example(
//! #     credentials: Arc<dyn CredentialProvider>,
//! #     transport: Arc<dyn RoomTransport>,
//! #     capture: Arc<dyn AudioCaptureDevice>,
//! #     filters: Arc<dyn NoiseFilterFactory>,
//! #     outputs: Arc<dyn AudioOutputFactory>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let client = CallClient::new(
//!     ClientConfig::new().with_transport_url("wss://rooms.example.com"),
//!     credentials,
//!     transport,
//!     capture,
//!     filters,
//!     outputs,
//! );
//!
//! client.connect().await?;
//! println!("status: {}", client.status().await);
//! client.set_suppression_level(80).await;
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod config;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::audio::capture::AudioCaptureDevice;
use crate::audio::pipeline::LocalAudioPipeline;
use crate::credential::{CredentialProvider, HttpCredentialClient};
use crate::error::{ClientError, ClientResult};
use crate::events::{ClientEvent, ClientStatus};
use crate::filter::{NoiseFilterFactory, SuppressionLevel};
use crate::participants::{self, RemoteParticipant};
use crate::playback::AudioOutputFactory;
use crate::session::{Session, SessionConnector};
use crate::transport::{RoomTransport, TransportEvent, TransportEvents};

use config::ClientConfig;

/// Capacity of the client event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The session controller
///
/// Exposes connect / disconnect / toggle-microphone / adjust-suppression
/// operations plus a read-only status and participant feed. `connect()` is
/// non-reentrant by virtue of the session-exists guard rather than a lock;
/// `disconnect()` never fails and always leaves the controller reusable
/// for a subsequent `connect()`.
pub struct CallClient {
    config: ClientConfig,
    credentials: Arc<dyn CredentialProvider>,
    connector: Arc<SessionConnector>,
    session: Arc<RwLock<Option<Session>>>,
    participants: Arc<RwLock<Vec<RemoteParticipant>>>,
    local_identity: Arc<RwLock<Option<String>>>,
    mic_enabled: Arc<RwLock<bool>>,
    suppression_level: Arc<RwLock<SuppressionLevel>>,
    status: Arc<RwLock<ClientStatus>>,
    event_tx: broadcast::Sender<ClientEvent>,
    event_pump: Mutex<Option<JoinHandle<()>>>,
}

impl CallClient {
    /// Create a controller over explicit boundary implementations
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn RoomTransport>,
        capture: Arc<dyn AudioCaptureDevice>,
        filters: Arc<dyn NoiseFilterFactory>,
        outputs: Arc<dyn AudioOutputFactory>,
    ) -> Self {
        let pipeline = LocalAudioPipeline::new(capture, filters);
        let connector = Arc::new(SessionConnector::new(transport, pipeline, outputs));
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let initial_level = config.initial_suppression_level;
        Self {
            config,
            credentials,
            connector,
            session: Arc::new(RwLock::new(None)),
            participants: Arc::new(RwLock::new(Vec::new())),
            local_identity: Arc::new(RwLock::new(None)),
            mic_enabled: Arc::new(RwLock::new(true)),
            suppression_level: Arc::new(RwLock::new(initial_level)),
            status: Arc::new(RwLock::new(ClientStatus::Idle)),
            event_tx,
            event_pump: Mutex::new(None),
        }
    }

    /// Create a controller that fetches credentials over HTTP from the
    /// configured credential endpoint
    pub fn with_http_credentials(
        config: ClientConfig,
        transport: Arc<dyn RoomTransport>,
        capture: Arc<dyn AudioCaptureDevice>,
        filters: Arc<dyn NoiseFilterFactory>,
        outputs: Arc<dyn AudioOutputFactory>,
    ) -> Self {
        let credentials = Arc::new(HttpCredentialClient::new(config.credential_base_url.clone()));
        Self::new(config, credentials, transport, capture, filters, outputs)
    }

    /// Subscribe to status, roster, and microphone events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.event_tx.subscribe()
    }

    /// Current caller-visible status
    pub async fn status(&self) -> ClientStatus {
        self.status.read().await.clone()
    }

    /// Current roster, local participant excluded
    pub async fn participants(&self) -> Vec<RemoteParticipant> {
        self.participants.read().await.clone()
    }

    /// Server-assigned identity of the local participant, while connected
    pub async fn local_identity(&self) -> Option<String> {
        self.local_identity.read().await.clone()
    }

    /// Whether the published track currently carries live audio
    pub async fn is_microphone_enabled(&self) -> bool {
        *self.mic_enabled.read().await
    }

    /// The current suppression intensity
    pub async fn suppression_level(&self) -> SuppressionLevel {
        *self.suppression_level.read().await
    }

    /// Establish a session.
    ///
    /// A no-op when a session already exists: no credential fetch, no
    /// transport call, existing state unchanged. On failure the status
    /// carries the error message and the controller remains in its
    /// pre-connect state, ready for another attempt.
    pub async fn connect(&self) -> ClientResult<()> {
        if self.session.read().await.is_some() {
            tracing::debug!("connect ignored: session already exists");
            return Ok(());
        }

        self.set_status(ClientStatus::Connecting).await;

        let credential = match self.credentials.fetch_credential().await {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("credential fetch failed: {}", e);
                self.set_status(ClientStatus::Error(format!("room error: {}", e))).await;
                return Err(e);
            }
        };

        let level = *self.suppression_level.read().await;
        let (session, events) = match self
            .connector
            .connect(&self.config.transport_url, &credential, level)
            .await
        {
            Ok(connected) => connected,
            Err(e) => {
                tracing::warn!("connect failed: {}", e);
                self.set_status(ClientStatus::Error(format!("room error: {}", e))).await;
                return Err(e);
            }
        };

        let identity = session.local_identity().to_string();
        let initial_peers = session
            .connection()
            .map(|c| c.remote_peers())
            .unwrap_or_default();
        let roster = participants::project(&initial_peers, &identity);

        *self.local_identity.write().await = Some(identity);
        *self.participants.write().await = roster.clone();
        *self.session.write().await = Some(session);
        *self.event_pump.lock().await = Some(self.spawn_event_pump(events));

        let _ = self.event_tx.send(ClientEvent::ParticipantsChanged { participants: roster });
        self.set_status(ClientStatus::Connected).await;
        Ok(())
    }

    /// Tear the session down.
    ///
    /// Runs regardless of current state, including a failed or half-built
    /// connect. Cleanup errors are logged and swallowed; afterwards the
    /// roster is empty, the microphone flag is back to `true`, the status
    /// is `idle`, and no owned resource remains reachable. The suppression
    /// level is deliberately retained across reconnects.
    pub async fn disconnect(&self) {
        if let Some(pump) = self.event_pump.lock().await.take() {
            pump.abort();
        }

        let taken = self.session.write().await.take();
        if let Some(mut session) = taken {
            let report = self.connector.disconnect(&mut session).await;
            if !report.is_clean() {
                tracing::warn!(
                    "disconnect completed with {} failed release step(s): {}",
                    report.failures().len(),
                    report
                );
            }
        }

        self.participants.write().await.clear();
        *self.local_identity.write().await = None;
        *self.mic_enabled.write().await = true;
        let _ = self.event_tx.send(ClientEvent::ParticipantsChanged {
            participants: Vec::new(),
        });
        self.set_status(ClientStatus::Idle).await;
    }

    /// Flip the microphone flag.
    ///
    /// Delegates to the transport; the locally tracked flag flips only
    /// after the transport call succeeds. Returns the new state.
    pub async fn toggle_microphone(&self) -> ClientResult<bool> {
        let target = !*self.mic_enabled.read().await;
        {
            let guard = self.session.read().await;
            let session = guard
                .as_ref()
                .ok_or_else(|| ClientError::invalid_state("no active session"))?;
            self.connector.set_microphone_enabled(session, target).await?;
        }
        *self.mic_enabled.write().await = target;
        tracing::info!("microphone {}", if target { "enabled" } else { "disabled" });
        let _ = self.event_tx.send(ClientEvent::MicrophoneStateChanged { enabled: target });
        Ok(target)
    }

    /// Adjust the suppression intensity.
    ///
    /// The value is clamped into `[0, 100]`, recorded for the next
    /// connect, and forwarded to the live filter only when a session is
    /// connected. Returns the value actually applied.
    pub async fn set_suppression_level(&self, level: i32) -> SuppressionLevel {
        let applied = SuppressionLevel::new(level);
        *self.suppression_level.write().await = applied;

        let mut guard = self.session.write().await;
        if let Some(session) = guard.as_mut() {
            if session.is_connected() {
                if let Some(track) = session.track_mut() {
                    self.connector
                        .pipeline()
                        .set_suppression_intensity(track, level);
                    tracing::debug!("suppression level set to {}", applied);
                }
            }
        }
        applied
    }

    async fn set_status(&self, status: ClientStatus) {
        *self.status.write().await = status.clone();
        let _ = self.event_tx.send(ClientEvent::StatusChanged { status });
    }

    /// Pump transport events in arrival order: roster-changing events
    /// trigger a full re-projection from the latest peer set, and newly
    /// subscribed remote tracks are bound to the session's playback sink.
    fn spawn_event_pump(&self, mut events: TransportEvents) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let participants = Arc::clone(&self.participants);
        let local_identity = Arc::clone(&self.local_identity);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    TransportEvent::ParticipantConnected { identity } => {
                        tracing::info!("participant connected: {}", identity);
                        refresh_roster(&session, &participants, &local_identity, &event_tx).await;
                    }
                    TransportEvent::ParticipantDisconnected { identity } => {
                        tracing::info!("participant disconnected: {}", identity);
                        refresh_roster(&session, &participants, &local_identity, &event_tx).await;
                    }
                    TransportEvent::ParticipantMetadataChanged { identity } => {
                        tracing::debug!("participant metadata changed: {}", identity);
                        refresh_roster(&session, &participants, &local_identity, &event_tx).await;
                    }
                    TransportEvent::TrackSubscribed { identity, stream } => {
                        tracing::info!("audio track subscribed from {}", identity);
                        let mut guard = session.write().await;
                        if let Some(session) = guard.as_mut() {
                            if let Some(sink) = session.sink_mut() {
                                if let Err(e) = sink.bind(&identity, &stream).await {
                                    tracing::warn!("failed to bind remote stream: {}", e);
                                }
                            }
                        }
                    }
                    TransportEvent::TrackUnsubscribed { identity } => {
                        tracing::debug!("audio track unsubscribed from {}", identity);
                    }
                }
            }
        })
    }
}

/// Recompute the roster from the transport's latest full peer set and
/// publish it. Ordering-insensitive by construction: the projection always
/// derives from the current snapshot, not from individual deltas.
async fn refresh_roster(
    session: &Arc<RwLock<Option<Session>>>,
    participants: &Arc<RwLock<Vec<RemoteParticipant>>>,
    local_identity: &Arc<RwLock<Option<String>>>,
    event_tx: &broadcast::Sender<ClientEvent>,
) {
    let peers = {
        let guard = session.read().await;
        match guard.as_ref().and_then(|s| s.connection()) {
            Some(connection) => connection.remote_peers(),
            None => return,
        }
    };
    let identity = local_identity.read().await.clone().unwrap_or_default();
    let roster = participants::project(&peers, &identity);
    *participants.write().await = roster.clone();
    let _ = event_tx.send(ClientEvent::ParticipantsChanged { participants: roster });
}
