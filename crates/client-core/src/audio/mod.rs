//! Local audio capture and pipeline
//!
//! The pipeline acquires a raw microphone stream, wraps it in a
//! publishable track, attaches the noise-suppression filter, and exposes a
//! live suppression-intensity control. The capture device itself sits
//! behind the [`capture::AudioCaptureDevice`] boundary trait.

pub mod capture;
pub mod pipeline;

/// Default capture sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Default channel count (mono)
pub const DEFAULT_CHANNELS: u16 = 1;

/// Constraints applied when opening the microphone
///
/// The platform's own echo-cancellation, noise-suppression, and auto-gain
/// are disabled by default: the dedicated filter takes over that
/// responsibility, and double-processing degrades quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// Platform echo cancellation
    pub echo_cancellation: bool,
    /// Platform noise suppression
    pub noise_suppression: bool,
    /// Platform automatic gain control
    pub auto_gain_control: bool,
    /// Number of capture channels
    pub channel_count: u16,
    /// Capture sample rate in Hz
    pub sample_rate: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
            channel_count: DEFAULT_CHANNELS,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}
