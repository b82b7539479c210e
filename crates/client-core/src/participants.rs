//! Participant registry
//!
//! A derived, read-only view of the transport-reported roster. The
//! projection is a pure function over the transport's latest full peer
//! set: it is recomputed from scratch on every roster-changing event
//! rather than incrementally diffed, since peer counts are small and
//! roster changes are infrequent relative to audio processing rates.

use serde::Serialize;

use crate::transport::RemotePeer;

/// A remote participant as presented to the application
///
/// Ephemeral: exists only while the transport reports the corresponding
/// peer present. The local participant never appears in the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteParticipant {
    /// Stable server-assigned identity
    pub identity: String,
    /// Whether the participant is currently speaking
    pub is_speaking: bool,
    /// Current audio level in `[0.0, 1.0]`
    pub audio_level: f32,
}

/// Project the transport's peer set into the application-facing roster.
///
/// Excludes the local participant, clamps audio levels into `[0.0, 1.0]`,
/// and orders by identity so the result is deterministic.
pub fn project(peers: &[RemotePeer], local_identity: &str) -> Vec<RemoteParticipant> {
    let mut roster: Vec<RemoteParticipant> = peers
        .iter()
        .filter(|peer| peer.identity != local_identity)
        .map(|peer| RemoteParticipant {
            identity: peer.identity.clone(),
            is_speaking: peer.is_speaking,
            audio_level: peer.audio_level.clamp(0.0, 1.0),
        })
        .collect();
    roster.sort_by(|a, b| a.identity.cmp(&b.identity));
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(identity: &str, is_speaking: bool, audio_level: f32) -> RemotePeer {
        RemotePeer {
            identity: identity.to_string(),
            is_speaking,
            audio_level,
        }
    }

    #[test]
    fn projects_peers_in_identity_order() {
        let peers = vec![peer("B", false, 0.0), peer("A", true, 0.8)];
        let roster = project(&peers, "me");
        assert_eq!(
            roster,
            vec![
                RemoteParticipant {
                    identity: "A".to_string(),
                    is_speaking: true,
                    audio_level: 0.8,
                },
                RemoteParticipant {
                    identity: "B".to_string(),
                    is_speaking: false,
                    audio_level: 0.0,
                },
            ]
        );
    }

    #[test]
    fn excludes_the_local_participant() {
        let peers = vec![peer("me", true, 0.9), peer("A", false, 0.1)];
        let roster = project(&peers, "me");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].identity, "A");
    }

    #[test]
    fn clamps_audio_levels() {
        let peers = vec![peer("A", false, 1.7), peer("B", false, -0.2)];
        let roster = project(&peers, "me");
        assert_eq!(roster[0].audio_level, 1.0);
        assert_eq!(roster[1].audio_level, 0.0);
    }

    #[test]
    fn empty_peer_set_yields_empty_roster() {
        assert!(project(&[], "me").is_empty());
    }
}
