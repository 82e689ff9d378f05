//! Analysis observation, instrumentation, and cancellation.
//!
//! This module provides [`TimingObserver`] for watching an analysis as it
//! moves through its stages, [`LogObserver`] which forwards those stages to
//! the [`log`] facade, [`instrument`] for timing a whole call, and
//! [`CancellationToken`] for aborting a long probe.
//!
//! Observers see the pipeline but never influence it: a report built with an
//! observer attached is identical to one built without.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framepace::{AnalysisEvent, AnalysisOptions, FramePaceError, TimingObserver};
//!
//! struct PrintStages;
//!
//! impl TimingObserver for PrintStages {
//!     fn on_event(&self, event: &AnalysisEvent) {
//!         println!("{event:?}");
//!     }
//! }
//!
//! let options = AnalysisOptions::new().with_observer(Arc::new(PrintStages));
//! let report = framepace::analyze_file("input.mp4", &options)?;
//! # Ok::<(), FramePaceError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// How many leading values of a series are carried in
/// [`AnalysisEvent::SeriesConverted`].
pub const PREVIEW_LEN: usize = 5;

/// The series a stage event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    /// Per-packet reported durations.
    FrameDuration,
    /// Decode timestamps.
    DecodeTimestamp,
    /// Presentation timestamps.
    PresentationTimestamp,
}

/// A stage reached by the probe or the timing engine.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AnalysisEvent {
    /// The probe has read this many packets of the selected stream so far.
    PacketsRead {
        /// Packets read so far.
        count: u64,
    },
    /// The nominal frame rate was parsed.
    FrameRateParsed {
        /// Frames per second.
        frames_per_second: f64,
    },
    /// A series was converted to milliseconds.
    SeriesConverted {
        /// Which series.
        series: SeriesKind,
        /// Its full length.
        len: usize,
        /// Up to [`PREVIEW_LEN`] leading values, in milliseconds.
        preview: Vec<f64>,
    },
    /// The average frame duration was computed.
    AverageComputed {
        /// Mean frame duration in milliseconds.
        average_frame_duration_ms: f64,
    },
    /// An interval series was computed.
    IntervalsComputed {
        /// Which timestamp series the intervals were taken from.
        series: SeriesKind,
        /// Number of intervals.
        len: usize,
    },
    /// The report was assembled.
    ReportBuilt {
        /// Number of frames in the report.
        frame_count: usize,
    },
    /// An instrumented call returned.
    Finished {
        /// Name of the operation.
        operation: &'static str,
        /// Wall-clock time it took.
        elapsed: Duration,
    },
}

/// Trait for receiving analysis events.
///
/// Implementations must be [`Send`] and [`Sync`] because independent files
/// may be analysed on worker threads.
pub trait TimingObserver: Send + Sync {
    /// Called once for each stage reached.
    fn on_event(&self, event: &AnalysisEvent);
}

/// Discards all events. This is the default when no observer is configured.
pub(crate) struct NoOpObserver;

impl TimingObserver for NoOpObserver {
    fn on_event(&self, _event: &AnalysisEvent) {}
}

/// Forwards every event to the [`log`] facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl TimingObserver for LogObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        match event {
            AnalysisEvent::PacketsRead { count } => log::trace!("packets read: {count}"),
            AnalysisEvent::FrameRateParsed { frames_per_second } => {
                log::debug!("nominal fps: {frames_per_second}")
            }
            AnalysisEvent::SeriesConverted {
                series,
                len,
                preview,
            } => log::debug!("{series:?} ms ({len} values): {preview:?}"),
            AnalysisEvent::AverageComputed {
                average_frame_duration_ms,
            } => log::debug!("average frame duration: {average_frame_duration_ms:.3} ms"),
            AnalysisEvent::IntervalsComputed { series, len } => {
                log::debug!("{series:?} intervals: {len}")
            }
            AnalysisEvent::ReportBuilt { frame_count } => {
                log::debug!("report built ({frame_count} frames)")
            }
            AnalysisEvent::Finished { operation, elapsed } => {
                log::debug!("Finished {operation:?} in {:.4} secs", elapsed.as_secs_f64())
            }
        }
    }
}

/// Run `f`, then report how long it took as [`AnalysisEvent::Finished`].
///
/// The event is emitted whether `f` succeeded or not; its return value is
/// passed through untouched.
pub fn instrument<T>(
    observer: &dyn TimingObserver,
    operation: &'static str,
    f: impl FnOnce() -> T,
) -> T {
    let start = Instant::now();
    let result = f();
    observer.on_event(&AnalysisEvent::Finished {
        operation,
        elapsed: start.elapsed(),
    });
    result
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to stop the
/// associated probe. The probe checks the token before reading each packet.
///
/// # Example
///
/// ```
/// use framepace::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.clone().cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports packet-read progress every `batch_size` packets.
pub(crate) struct PacketCounter<'a> {
    observer: &'a dyn TimingObserver,
    batch_size: u64,
    count: u64,
}

impl<'a> PacketCounter<'a> {
    pub(crate) fn new(observer: &'a dyn TimingObserver, batch_size: u64) -> Self {
        Self {
            observer,
            batch_size: batch_size.max(1),
            count: 0,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.count += 1;
        if self.count % self.batch_size == 0 {
            self.report();
        }
    }

    /// Unconditionally emit a final count.
    pub(crate) fn finish(&self) {
        self.report();
    }

    fn report(&self) {
        self.observer
            .on_event(&AnalysisEvent::PacketsRead { count: self.count });
    }
}
