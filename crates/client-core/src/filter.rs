//! Noise-suppression filter boundary
//!
//! The actual suppression algorithm is an external collaborator. The client
//! only installs the filter into the local track's processing chain and
//! forwards a suppression-intensity parameter to it; a new value takes
//! effect on the next processed audio frame.

use std::fmt;

use async_trait::async_trait;

use crate::error::ClientResult;

/// Suppression intensity in the range `[0, 100]`
///
/// Construction clamps out-of-range input, so a level observed by the
/// filter is always in range regardless of what the caller supplied.
///
/// # Examples
///
/// ```rust
/// use clearcall_client_core::filter::SuppressionLevel;
///
/// assert_eq!(SuppressionLevel::new(250).value(), 100);
/// assert_eq!(SuppressionLevel::new(-10).value(), 0);
/// assert_eq!(SuppressionLevel::new(42).value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SuppressionLevel(u8);

impl SuppressionLevel {
    /// Minimum intensity (no suppression)
    pub const MIN: SuppressionLevel = SuppressionLevel(0);
    /// Maximum intensity
    pub const MAX: SuppressionLevel = SuppressionLevel(100);

    /// Create a level from a raw value, clamping into `[0, 100]`
    pub fn new(raw: i32) -> Self {
        Self(raw.clamp(0, 100) as u8)
    }

    /// The clamped intensity value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for SuppressionLevel {
    fn default() -> Self {
        Self(50)
    }
}

impl fmt::Display for SuppressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options passed to the filter at construction time
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Intensity to apply as soon as the filter is running
    pub initial_level: Option<SuppressionLevel>,
}

/// An installed noise-suppression transform
#[async_trait]
pub trait NoiseFilter: Send + Sync + fmt::Debug {
    /// Forward a new suppression intensity to the filter.
    ///
    /// Callable at any time after installation; takes effect on the next
    /// processed audio frame.
    fn set_suppression_level(&self, level: SuppressionLevel);

    /// Detach and destroy the filter, freeing its processing resources
    async fn destroy(&self) -> ClientResult<()>;
}

/// Constructs noise filters for installation into a local track
#[async_trait]
pub trait NoiseFilterFactory: Send + Sync {
    /// Create a new filter instance
    async fn create(&self, options: FilterOptions) -> ClientResult<Box<dyn NoiseFilter>>;
}
