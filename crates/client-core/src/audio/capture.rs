//! Audio capture device abstraction
//!
//! Platform-specific capture (browser media devices, CPAL, test doubles)
//! lives behind these traits. Opening the microphone fails with
//! [`ClientError::DeviceUnavailable`] when permission is denied or no
//! device exists.
//!
//! [`ClientError::DeviceUnavailable`]: crate::error::ClientError::DeviceUnavailable

use std::fmt;

use async_trait::async_trait;

use crate::audio::CaptureConstraints;
use crate::error::ClientResult;

/// An opened microphone capture stream
#[async_trait]
pub trait MicrophoneSource: Send + Sync + fmt::Debug {
    /// Device-assigned identifier of the capture stream
    fn id(&self) -> &str;

    /// Stop capturing.
    ///
    /// Callers guarantee at-most-once invocation per source; idempotence
    /// of the overall release path is handled by the owning track.
    async fn stop(&self) -> ClientResult<()>;
}

/// A device capable of opening microphone capture streams
#[async_trait]
pub trait AudioCaptureDevice: Send + Sync {
    /// Request a capture stream honoring the given constraints
    async fn open(&self, constraints: &CaptureConstraints) -> ClientResult<Box<dyn MicrophoneSource>>;
}
