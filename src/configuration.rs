//! Analysis configuration.
//!
//! [`AnalysisOptions`] is a builder that threads the observer, cancellation
//! token, packet policy, and track selection through the analysis entry
//! points without widening every function signature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use framepace::{AnalysisOptions, CancellationToken, LogObserver, PacketPolicy};
//!
//! let token = CancellationToken::new();
//! let options = AnalysisOptions::new()
//!     .with_observer(Arc::new(LogObserver))
//!     .with_cancellation(token.clone())
//!     .with_packet_policy(PacketPolicy::SkipIncomplete)
//!     .with_video_track(1);
//! assert_eq!(options.packet_policy(), PacketPolicy::SkipIncomplete);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::observer::{CancellationToken, NoOpObserver, TimingObserver};

/// What to do with a packet that lacks one of its timing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketPolicy {
    /// Fail the whole analysis with
    /// [`FramePaceError::MalformedInput`](crate::FramePaceError::MalformedInput).
    #[default]
    Strict,
    /// Drop the packet, log a warning, and keep going.
    SkipIncomplete,
}

/// Configuration for analysis operations.
///
/// A default-constructed value analyses the best video stream strictly, with
/// no observer and no cancellation.
#[derive(Clone)]
pub struct AnalysisOptions {
    /// Stage observer. Defaults to a no-op.
    pub(crate) observer: Arc<dyn TimingObserver>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// Handling of incomplete packets.
    pub(crate) packet_policy: PacketPolicy,
    /// Zero-based video track. `None` selects FFmpeg's best video stream.
    pub(crate) video_track: Option<usize>,
    /// Emit [`AnalysisEvent::PacketsRead`](crate::AnalysisEvent::PacketsRead)
    /// every N packets while probing.
    pub(crate) batch_size: u64,
}

impl Debug for AnalysisOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnalysisOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("packet_policy", &self.packet_policy)
            .field("video_track", &self.video_track)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOptions {
    /// Create options with default settings.
    ///
    /// Defaults: no observer, no cancellation, [`PacketPolicy::Strict`],
    /// best video stream, progress every 500 packets.
    pub fn new() -> Self {
        Self {
            observer: Arc::new(NoOpObserver),
            cancellation: None,
            packet_policy: PacketPolicy::Strict,
            video_track: None,
            batch_size: 500,
        }
    }

    /// Attach a stage observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn TimingObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Attach a cancellation token checked by the probe before each packet.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Choose how packets with missing fields are handled.
    #[must_use]
    pub fn with_packet_policy(mut self, policy: PacketPolicy) -> Self {
        self.packet_policy = policy;
        self
    }

    /// Analyse the given zero-based video track instead of the best one.
    #[must_use]
    pub fn with_video_track(mut self, track_index: usize) -> Self {
        self.video_track = Some(track_index);
        self
    }

    /// Set how often packet-read progress is reported. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The configured packet policy.
    pub fn packet_policy(&self) -> PacketPolicy {
        self.packet_policy
    }

    /// The configured video track, if any.
    pub fn video_track(&self) -> Option<usize> {
        self.video_track
    }

    /// The attached observer (a no-op if none was set).
    pub fn observer(&self) -> &dyn TimingObserver {
        self.observer.as_ref()
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
