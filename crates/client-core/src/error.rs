//! Error types for the clearcall client library
//!
//! Every failure inside the connect sequence maps to exactly one of the
//! variants below and is surfaced to the application after the partial
//! session has been torn down. Cleanup failures are never surfaced as
//! errors; they are collected into a [`TeardownReport`] and logged.

use std::fmt;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the call client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential endpoint could not be reached or returned a
    /// malformed response. No transport connection is attempted.
    #[error("Credential unavailable: {reason}")]
    CredentialUnavailable { reason: String },

    /// Microphone permission was denied or no capture device exists.
    #[error("Audio device unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    /// The transport connection could not be opened.
    #[error("Transport connect failure: {reason}")]
    TransportConnectFailure { reason: String },

    /// The transport rejected publication of the local track.
    #[error("Track publication failed: {reason}")]
    PublishFailure { reason: String },

    /// The transport rejected a microphone mute/unmute request.
    /// The locally tracked microphone flag is left unchanged.
    #[error("Microphone toggle failed: {reason}")]
    MicToggleFailure { reason: String },

    /// Operation is not valid in the current session state
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ClientError {
    /// Create a credential-unavailable error
    pub fn credential(reason: impl Into<String>) -> Self {
        Self::CredentialUnavailable { reason: reason.into() }
    }

    /// Create a device-unavailable error
    pub fn device(reason: impl Into<String>) -> Self {
        Self::DeviceUnavailable { reason: reason.into() }
    }

    /// Create a transport-connect error
    pub fn transport_connect(reason: impl Into<String>) -> Self {
        Self::TransportConnectFailure { reason: reason.into() }
    }

    /// Create a publish-failure error
    pub fn publish(reason: impl Into<String>) -> Self {
        Self::PublishFailure { reason: reason.into() }
    }

    /// Create a mic-toggle error
    pub fn mic_toggle(reason: impl Into<String>) -> Self {
        Self::MicToggleFailure { reason: reason.into() }
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// A single teardown step that did not complete
#[derive(Debug)]
pub struct TeardownFailure {
    /// Name of the release step that failed
    pub step: &'static str,
    /// The error the step produced
    pub error: ClientError,
}

/// Outcome of a best-effort resource release
///
/// Teardown attempts every release step regardless of earlier failures and
/// reports the ones that failed. It never short-circuits and is never
/// converted into an `Err` on the disconnect path: from the caller's
/// perspective disconnect always succeeds.
#[derive(Debug, Default)]
pub struct TeardownReport {
    failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self { failures: Vec::new() }
    }

    /// Record a failed release step
    pub fn record(&mut self, step: &'static str, error: ClientError) {
        self.failures.push(TeardownFailure { step, error });
    }

    /// Fold another report's failures into this one
    pub fn merge(&mut self, other: TeardownReport) {
        self.failures.extend(other.failures);
    }

    /// True when every release step completed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The release steps that failed
    pub fn failures(&self) -> &[TeardownFailure] {
        &self.failures
    }
}

impl fmt::Display for TeardownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "clean");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.step, failure.error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_starts_clean() {
        let report = TeardownReport::new();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "clean");
    }

    #[test]
    fn report_collects_failures_in_order() {
        let mut report = TeardownReport::new();
        report.record("stop capture", ClientError::device("gone"));
        report.record("close transport connection", ClientError::internal("socket"));
        assert!(!report.is_clean());
        assert_eq!(report.failures().len(), 2);
        assert_eq!(report.failures()[0].step, "stop capture");
        assert!(report.to_string().contains("close transport connection"));
    }

    #[test]
    fn merge_appends_failures() {
        let mut a = TeardownReport::new();
        a.record("stop capture", ClientError::device("gone"));
        let mut b = TeardownReport::new();
        b.record("destroy filter", ClientError::internal("worklet"));
        a.merge(b);
        assert_eq!(a.failures().len(), 2);
    }
}
