//! Remote playback sink
//!
//! One hidden, autoplay-enabled audio output exists per active session and
//! is re-pointed at whichever remote stream the transport most recently
//! delivered.

use std::fmt;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::transport::RemoteAudioStream;

/// A hidden audio output element
#[async_trait]
pub trait AudioOutput: Send + Sync + fmt::Debug {
    /// Start playing the given remote stream, replacing whatever was
    /// playing before
    async fn play(&self, stream: &RemoteAudioStream) -> ClientResult<()>;

    /// Remove the output
    async fn close(&self) -> ClientResult<()>;
}

/// Allocates hidden audio outputs
#[async_trait]
pub trait AudioOutputFactory: Send + Sync {
    /// Allocate a new hidden, autoplay-enabled output
    async fn create(&self) -> ClientResult<Box<dyn AudioOutput>>;
}

/// The session's single playback sink
///
/// Re-bound (never recreated) to the newest remote audio stream. With
/// multiple remote peers the last bound stream wins: this sink does not
/// attempt multi-peer mixing. Single-output by design; see the crate
/// documentation for the limitation.
#[derive(Debug)]
pub struct PlaybackSink {
    output: Option<Box<dyn AudioOutput>>,
    bound_identity: Option<String>,
}

impl PlaybackSink {
    /// Wrap a freshly allocated output
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output: Some(output),
            bound_identity: None,
        }
    }

    /// Point the output at a newly subscribed remote stream
    pub async fn bind(&mut self, identity: &str, stream: &RemoteAudioStream) -> ClientResult<()> {
        if let Some(output) = self.output.as_deref() {
            output.play(stream).await?;
            self.bound_identity = Some(identity.to_string());
            tracing::debug!("playback sink bound to stream {} from {}", stream.id, identity);
        }
        Ok(())
    }

    /// Identity whose stream is currently playing, if any
    pub fn bound_identity(&self) -> Option<&str> {
        self.bound_identity.as_deref()
    }

    /// Remove the output. Idempotent.
    pub async fn destroy(&mut self) -> ClientResult<()> {
        self.bound_identity = None;
        match self.output.take() {
            Some(output) => output.close().await,
            None => Ok(()),
        }
    }

    /// Whether the sink has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.output.is_none()
    }
}
