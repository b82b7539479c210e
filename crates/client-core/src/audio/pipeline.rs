//! Local audio pipeline
//!
//! Sequencing matters here: the filter must be installed before the track
//! is published, otherwise unfiltered audio may be sent during the race
//! window. Release is idempotent and best-effort so that the connect
//! failure path and the disconnect path can share it.

use std::sync::Arc;

use crate::audio::capture::{AudioCaptureDevice, MicrophoneSource};
use crate::audio::CaptureConstraints;
use crate::error::{ClientResult, TeardownReport};
use crate::filter::{FilterOptions, NoiseFilter, NoiseFilterFactory, SuppressionLevel};

/// The local publishable audio track
///
/// Owns the captured media source, the installed filter, and the current
/// suppression intensity. At most one handle exists per live session; the
/// handle is destroyed when the session disconnects.
#[derive(Debug)]
pub struct LocalTrackHandle {
    source: Option<Box<dyn MicrophoneSource>>,
    filter: Option<Box<dyn NoiseFilter>>,
    level: SuppressionLevel,
}

impl LocalTrackHandle {
    fn new(source: Box<dyn MicrophoneSource>, level: SuppressionLevel) -> Self {
        Self {
            source: Some(source),
            filter: None,
            level,
        }
    }

    /// Identifier of the underlying capture stream, if not yet released
    pub fn source_id(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.id())
    }

    /// Whether a noise filter has been installed
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// The currently applied suppression intensity
    pub fn suppression_level(&self) -> SuppressionLevel {
        self.level
    }

    /// Whether the track has been released
    pub fn is_released(&self) -> bool {
        self.source.is_none() && self.filter.is_none()
    }
}

/// Builds and manages the local capture-filter-publish chain
///
/// Generic over the capture device and filter factory boundaries so the
/// pipeline itself carries no platform dependencies.
pub struct LocalAudioPipeline {
    capture: Arc<dyn AudioCaptureDevice>,
    filters: Arc<dyn NoiseFilterFactory>,
    constraints: CaptureConstraints,
}

impl LocalAudioPipeline {
    /// Create a pipeline over the given device and filter boundaries,
    /// using the default capture constraints (mono, platform DSP off)
    pub fn new(capture: Arc<dyn AudioCaptureDevice>, filters: Arc<dyn NoiseFilterFactory>) -> Self {
        Self {
            capture,
            filters,
            constraints: CaptureConstraints::default(),
        }
    }

    /// Override the capture constraints
    pub fn with_constraints(mut self, constraints: CaptureConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Request a raw microphone stream
    pub async fn acquire_microphone(&self) -> ClientResult<Box<dyn MicrophoneSource>> {
        let source = self.capture.open(&self.constraints).await?;
        tracing::debug!("acquired microphone capture stream {}", source.id());
        Ok(source)
    }

    /// Wrap a raw source in a publishable track
    pub fn build_publishable_track(
        &self,
        source: Box<dyn MicrophoneSource>,
        level: SuppressionLevel,
    ) -> LocalTrackHandle {
        LocalTrackHandle::new(source, level)
    }

    /// Attach the noise-suppression transform to the track.
    ///
    /// Must complete before the track is published. The track's current
    /// suppression intensity is forwarded to the freshly created filter.
    pub async fn install_filter(&self, track: &mut LocalTrackHandle) -> ClientResult<()> {
        let options = FilterOptions {
            initial_level: Some(track.level),
        };
        let filter = self.filters.create(options).await?;
        filter.set_suppression_level(track.level);
        track.filter = Some(filter);
        tracing::debug!("noise filter installed at intensity {}", track.level);
        Ok(())
    }

    /// Forward a new suppression intensity to the installed filter.
    ///
    /// Out-of-range values are clamped into `[0, 100]`. Returns the value
    /// actually applied. A track without an installed filter just records
    /// the level for later installation.
    pub fn set_suppression_intensity(&self, track: &mut LocalTrackHandle, raw: i32) -> SuppressionLevel {
        let level = SuppressionLevel::new(raw);
        track.level = level;
        if let Some(filter) = track.filter.as_deref() {
            filter.set_suppression_level(level);
        }
        level
    }

    /// Stop capture and detach the filter.
    ///
    /// Idempotent and best-effort: every step is attempted regardless of
    /// earlier failures, and calling this on an already-released handle is
    /// a no-op.
    pub async fn release(&self, track: &mut LocalTrackHandle) -> TeardownReport {
        let mut report = TeardownReport::new();
        if let Some(source) = track.source.take() {
            if let Err(e) = source.stop().await {
                report.record("stop microphone capture", e);
            }
        }
        if let Some(filter) = track.filter.take() {
            if let Err(e) = filter.destroy().await {
                report.record("destroy noise filter", e);
            }
        }
        report
    }
}
