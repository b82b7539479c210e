//! Client-facing status and events
//!
//! The controller publishes its caller-visible status and roster through a
//! broadcast channel so multiple consumers (UI, logging, tests) can
//! observe it independently.

use std::fmt;

use crate::participants::RemoteParticipant;

/// Caller-visible controller status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientStatus {
    /// No session; ready to connect
    Idle,
    /// Connect sequence in progress
    Connecting,
    /// Session established
    Connected,
    /// The last connect attempt failed with this message
    Error(String),
}

impl ClientStatus {
    /// Whether a session is established
    pub fn is_connected(&self) -> bool {
        matches!(self, ClientStatus::Connected)
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientStatus::Idle => write!(f, "idle"),
            ClientStatus::Connecting => write!(f, "connecting"),
            ClientStatus::Connected => write!(f, "connected"),
            ClientStatus::Error(message) => write!(f, "{}", message),
        }
    }
}

/// Event published to application subscribers
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Controller status changed
    StatusChanged {
        /// The new status
        status: ClientStatus,
    },
    /// The participant roster was recomputed
    ParticipantsChanged {
        /// The new roster, local participant excluded
        participants: Vec<RemoteParticipant>,
    },
    /// The microphone flag flipped after a successful transport call
    MicrophoneStateChanged {
        /// Whether the microphone is now live
        enabled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_matches_wire_strings() {
        assert_eq!(ClientStatus::Idle.to_string(), "idle");
        assert_eq!(ClientStatus::Connecting.to_string(), "connecting");
        assert_eq!(ClientStatus::Connected.to_string(), "connected");
        assert_eq!(
            ClientStatus::Error("room error: denied".to_string()).to_string(),
            "room error: denied"
        );
    }

    #[test]
    fn only_connected_reports_connected() {
        assert!(ClientStatus::Connected.is_connected());
        assert!(!ClientStatus::Idle.is_connected());
        assert!(!ClientStatus::Error("x".to_string()).is_connected());
    }
}
