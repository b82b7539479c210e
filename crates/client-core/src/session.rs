//! Session connection state machine
//!
//! Drives `Idle → Connecting → Connected → Disconnecting → Terminated`,
//! with `Failed` reachable from `Connecting`. The connect failure path and
//! the disconnect path share one idempotent release routine, so a
//! disconnect issued against a half-built session still reaches
//! `Terminated` with every acquired resource released.

use std::fmt;
use std::sync::Arc;

use crate::audio::pipeline::{LocalAudioPipeline, LocalTrackHandle};
use crate::credential::Credential;
use crate::error::{ClientError, ClientResult, TeardownReport};
use crate::filter::SuppressionLevel;
use crate::playback::{AudioOutputFactory, PlaybackSink};
use crate::transport::{RoomConnection, RoomTransport, TransportEvents};

/// Session life-cycle state
///
/// A `Session` value handed to callers starts life in `Connected`: the
/// pre-session phases `Idle` and `Connecting` are never attached to a
/// `Session` and are surfaced to applications through
/// [`ClientStatus`](crate::events::ClientStatus) instead. They appear
/// here so the enum names the complete life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection
    Idle,
    /// Connect sequence running
    Connecting,
    /// Connection established, track published
    Connected,
    /// Teardown running
    Disconnecting,
    /// Teardown finished; all owned resources released. Terminal.
    Terminated,
    /// Connect sequence failed; reachable only from `Connecting`
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Disconnecting => write!(f, "disconnecting"),
            SessionState::Terminated => write!(f, "terminated"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

/// One active call
///
/// Exclusively owns the transport connection, the local track, and the
/// playback sink. At most one `Session` is live per controller instance;
/// once it reaches `Terminated` no further mutation of its resources is
/// possible because they have all been taken and released.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    connection: Option<Box<dyn RoomConnection>>,
    local_identity: String,
    room_name: String,
    track: Option<LocalTrackHandle>,
    sink: Option<PlaybackSink>,
}

impl Session {
    /// Current life-cycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Server-assigned identity of the local participant
    pub fn local_identity(&self) -> &str {
        &self.local_identity
    }

    /// Name of the joined room
    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    /// Whether the session is established
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// The live transport connection, if any
    pub fn connection(&self) -> Option<&dyn RoomConnection> {
        self.connection.as_deref()
    }

    /// Mutable access to the local track, if not yet released
    pub fn track_mut(&mut self) -> Option<&mut LocalTrackHandle> {
        self.track.as_mut()
    }

    /// Mutable access to the playback sink, if not yet destroyed
    pub fn sink_mut(&mut self) -> Option<&mut PlaybackSink> {
        self.sink.as_mut()
    }
}

/// Opens and tears down sessions over the external boundaries
pub struct SessionConnector {
    transport: Arc<dyn RoomTransport>,
    pipeline: LocalAudioPipeline,
    outputs: Arc<dyn AudioOutputFactory>,
}

impl SessionConnector {
    /// Create a connector over the transport, pipeline, and output boundaries
    pub fn new(
        transport: Arc<dyn RoomTransport>,
        pipeline: LocalAudioPipeline,
        outputs: Arc<dyn AudioOutputFactory>,
    ) -> Self {
        Self {
            transport,
            pipeline,
            outputs,
        }
    }

    /// The local audio pipeline
    pub fn pipeline(&self) -> &LocalAudioPipeline {
        &self.pipeline
    }

    /// Open a session: connect the transport, enable the local capture
    /// device, run the acquire/build/install/publish sequence, and create
    /// the playback sink.
    ///
    /// Event subscription is wired during transport connect, before
    /// publication, so no remote event is silently dropped. Filter
    /// installation strictly precedes publication. On any failure every
    /// resource acquired so far is released before the error is surfaced;
    /// no partial session is ever returned.
    pub async fn connect(
        &self,
        url: &str,
        credential: &Credential,
        level: SuppressionLevel,
    ) -> ClientResult<(Session, TransportEvents)> {
        tracing::info!("connecting to {} as {}", url, credential.participant_name);
        let (connection, events) = self.transport.connect(url, &credential.token).await?;

        if let Err(e) = connection.set_microphone_enabled(true).await {
            self.abort_connect(Some(connection), None, None).await;
            return Err(e);
        }

        let source = match self.pipeline.acquire_microphone().await {
            Ok(source) => source,
            Err(e) => {
                self.abort_connect(Some(connection), None, None).await;
                return Err(e);
            }
        };
        let mut track = self.pipeline.build_publishable_track(source, level);

        if let Err(e) = self.pipeline.install_filter(&mut track).await {
            self.abort_connect(Some(connection), Some(track), None).await;
            return Err(e);
        }

        if let Err(e) = connection.publish_track(&track).await {
            self.abort_connect(Some(connection), Some(track), None).await;
            return Err(e);
        }

        let sink = match self.outputs.create().await {
            Ok(output) => PlaybackSink::new(output),
            Err(e) => {
                self.abort_connect(Some(connection), Some(track), None).await;
                return Err(e);
            }
        };

        let local_identity = connection.local_identity();
        let room_name = connection.room_name();
        tracing::info!("connected to room {} as {}", room_name, local_identity);

        let session = Session {
            state: SessionState::Connected,
            connection: Some(connection),
            local_identity,
            room_name,
            track: Some(track),
            sink: Some(sink),
        };
        Ok((session, events))
    }

    /// Tear a session down: release the local pipeline, destroy the sink,
    /// and close the transport connection, in that order.
    ///
    /// Best-effort: a failing release does not prevent the remaining
    /// releases from running. The session always ends in `Terminated`.
    pub async fn disconnect(&self, session: &mut Session) -> TeardownReport {
        session.state = SessionState::Disconnecting;
        let report = self.release_session(session).await;
        session.state = SessionState::Terminated;
        if report.is_clean() {
            tracing::info!("session terminated");
        } else {
            tracing::warn!("session terminated with failed release steps: {}", report);
        }
        report
    }

    /// Toggle whether the published track carries live audio.
    ///
    /// Only valid while the session is `Connected`. A transport rejection
    /// surfaces as [`ClientError::MicToggleFailure`].
    pub async fn set_microphone_enabled(&self, session: &Session, enabled: bool) -> ClientResult<()> {
        if session.state != SessionState::Connected {
            return Err(ClientError::invalid_state(format!(
                "cannot toggle microphone in state {}",
                session.state
            )));
        }
        let connection = session
            .connection
            .as_deref()
            .ok_or_else(|| ClientError::invalid_state("session has no transport connection"))?;
        connection
            .set_microphone_enabled(enabled)
            .await
            .map_err(|e| ClientError::mic_toggle(e.to_string()))
    }

    /// Release everything a failed connect acquired, via the same routine
    /// the disconnect path uses
    async fn abort_connect(
        &self,
        connection: Option<Box<dyn RoomConnection>>,
        track: Option<LocalTrackHandle>,
        sink: Option<PlaybackSink>,
    ) {
        let mut partial = Session {
            state: SessionState::Failed,
            connection,
            local_identity: String::new(),
            room_name: String::new(),
            track,
            sink,
        };
        let report = self.release_session(&mut partial).await;
        partial.state = SessionState::Terminated;
        if !report.is_clean() {
            tracing::warn!("connect aborted with failed release steps: {}", report);
        }
    }

    /// Shared idempotent release routine. Each resource is taken out of
    /// the session before release, so a second invocation finds nothing
    /// left to do.
    async fn release_session(&self, session: &mut Session) -> TeardownReport {
        let mut report = TeardownReport::new();
        if let Some(mut track) = session.track.take() {
            report.merge(self.pipeline.release(&mut track).await);
        }
        if let Some(mut sink) = session.sink.take() {
            if let Err(e) = sink.destroy().await {
                report.record("destroy playback sink", e);
            }
        }
        if let Some(connection) = session.connection.take() {
            if let Err(e) = connection.close().await {
                report.record("close transport connection", e);
            }
        }
        report
    }
}
