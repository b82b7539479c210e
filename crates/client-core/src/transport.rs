//! Transport provider boundary
//!
//! The session transport is a managed real-time communication backend that
//! performs connection negotiation, media relay, and participant presence
//! propagation. The client treats it as an opaque service behind the
//! [`RoomTransport`] and [`RoomConnection`] traits and consumes its
//! life-cycle notifications as discrete [`TransportEvent`] messages,
//! processed in arrival order per session.
//!
//! [`RoomTransport::connect`] hands back the event receiver together with
//! the connection, so event subscription is always wired up before the
//! local track is published and no early remote event can be dropped.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::audio::pipeline::LocalTrackHandle;
use crate::error::ClientResult;

/// A remote peer as reported by the transport's live peer set
#[derive(Debug, Clone, PartialEq)]
pub struct RemotePeer {
    /// Stable server-assigned identity, unique within the session
    pub identity: String,
    /// Whether the peer is currently speaking
    pub is_speaking: bool,
    /// Current audio level in `[0.0, 1.0]`
    pub audio_level: f32,
}

/// Opaque handle to a remote media stream delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAudioStream {
    /// Transport-assigned stream identifier
    pub id: String,
}

impl RemoteAudioStream {
    /// Create a stream handle with the given identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Life-cycle notification delivered by the transport
///
/// Events arrive asynchronously and must be handled in arrival order for
/// a given session.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A remote participant joined the session
    ParticipantConnected {
        /// Identity of the joining participant
        identity: String,
    },
    /// A remote participant left the session
    ParticipantDisconnected {
        /// Identity of the departed participant
        identity: String,
    },
    /// Roster metadata (speaking flag, audio level, ...) changed
    ParticipantMetadataChanged {
        /// Identity of the affected participant
        identity: String,
    },
    /// A remote audio track became available for playback
    TrackSubscribed {
        /// Identity of the publishing participant
        identity: String,
        /// The stream to play
        stream: RemoteAudioStream,
    },
    /// A remote audio track went away
    TrackUnsubscribed {
        /// Identity of the publishing participant
        identity: String,
    },
}

/// Receiver half of a session's transport event stream
pub type TransportEvents = mpsc::UnboundedReceiver<TransportEvent>;

/// Entry point into the transport provider
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Open a connection to the given transport URL using a join token.
    ///
    /// Returns the live connection together with the receiver for its
    /// life-cycle events. The receiver is created as part of connection
    /// establishment, before any track is published.
    async fn connect(
        &self,
        url: &str,
        token: &str,
    ) -> ClientResult<(Box<dyn RoomConnection>, TransportEvents)>;
}

/// An open transport connection for one session
#[async_trait]
pub trait RoomConnection: Send + Sync + fmt::Debug {
    /// Server-assigned identity of the local participant
    fn local_identity(&self) -> String;

    /// Name of the joined room
    fn room_name(&self) -> String;

    /// Publish the prepared local track to the session
    async fn publish_track(&self, track: &LocalTrackHandle) -> ClientResult<()>;

    /// Toggle whether the published track carries live audio.
    ///
    /// Does not tear down the track itself.
    async fn set_microphone_enabled(&self, enabled: bool) -> ClientResult<()>;

    /// Snapshot of the transport's current remote peer set
    fn remote_peers(&self) -> Vec<RemotePeer>;

    /// Close the connection
    async fn close(&self) -> ClientResult<()>;
}
