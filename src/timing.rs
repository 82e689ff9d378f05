//! Frame timing engine.
//!
//! Turns an ordered sequence of per-packet timestamps into a
//! [`FrameTimingReport`]: per-frame durations, decode and presentation
//! timestamp intervals, the average frame duration, and the nominal frame
//! rate. Everything here is a pure function of its input.
//!
//! # Example
//!
//! ```
//! use framepace::{RawPacketTimestamps, build_report};
//!
//! let packets = [
//!     RawPacketTimestamps::new(0.0, 0.0, 0.04),
//!     RawPacketTimestamps::new(0.04, 0.08, 0.04),
//!     RawPacketTimestamps::new(0.08, 0.04, 0.04),
//! ];
//! let report = build_report(&packets, "25/1")?;
//!
//! assert_eq!(report.frame_count(), 3);
//! assert_eq!(report.nominal_fps(), 25.0);
//! assert_eq!(report.dts_intervals_ms().len(), 2);
//! // B-frame reordering shows up as a negative PTS interval.
//! assert!(report.pts_intervals_ms()[1] < 0.0);
//! # Ok::<(), framepace::FramePaceError>(())
//! ```

use crate::error::FramePaceError;
use crate::observer::{AnalysisEvent, NoOpObserver, PREVIEW_LEN, SeriesKind, TimingObserver};
use crate::packet::RawPacketTimestamps;
use crate::rate::parse_frame_rate;

const MILLISECONDS_PER_SECOND: f64 = 1000.0;

/// Frame timing metrics derived from one video stream.
///
/// Built once by [`build_report`] and read-only afterwards. Interval series
/// are always exactly one element shorter than the frame-duration series.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct FrameTimingReport {
    frame_count: usize,
    frame_durations_ms: Vec<f64>,
    dts_intervals_ms: Vec<f64>,
    pts_intervals_ms: Vec<f64>,
    average_frame_duration_ms: f64,
    nominal_fps: f64,
}

impl FrameTimingReport {
    /// Number of packets analysed. Always at least 1.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Each packet's reported duration, in milliseconds, in stream order.
    pub fn frame_durations_ms(&self) -> &[f64] {
        &self.frame_durations_ms
    }

    /// Differences between consecutive decode timestamps, in milliseconds.
    pub fn dts_intervals_ms(&self) -> &[f64] {
        &self.dts_intervals_ms
    }

    /// Differences between consecutive presentation timestamps, in
    /// milliseconds. Negative where presentation order differs from decode
    /// order.
    pub fn pts_intervals_ms(&self) -> &[f64] {
        &self.pts_intervals_ms
    }

    /// Arithmetic mean of [`frame_durations_ms`](Self::frame_durations_ms).
    pub fn average_frame_duration_ms(&self) -> f64 {
        self.average_frame_duration_ms
    }

    /// Frame rate declared by the stream header.
    pub fn nominal_fps(&self) -> f64 {
        self.nominal_fps
    }

    /// Smallest and largest frame duration, ignoring NaN.
    ///
    /// `None` only when every duration is NaN.
    pub fn frame_duration_range(&self) -> Option<(f64, f64)> {
        value_range(&self.frame_durations_ms)
    }
}

/// Smallest and largest value of a series, ignoring NaN.
pub(crate) fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// Multiply every value by 1000.
///
/// NaN and infinities pass through unchanged.
pub fn to_milliseconds(values_in_seconds: &[f64]) -> Vec<f64> {
    values_in_seconds
        .iter()
        .map(|seconds| seconds * MILLISECONDS_PER_SECOND)
        .collect()
}

/// Differences between adjacent timestamps (`next - previous`), in input
/// order.
///
/// Inputs of length 0 or 1 yield an empty vector. Results are neither
/// sorted nor clamped, so negative intervals survive.
pub fn compute_intervals(timestamps_ms: &[f64]) -> Vec<f64> {
    timestamps_ms
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect()
}

/// Arithmetic mean of a series.
///
/// # Errors
///
/// Returns [`FramePaceError::EmptySeries`] if `durations_ms` is empty.
pub fn compute_average(durations_ms: &[f64]) -> Result<f64, FramePaceError> {
    if durations_ms.is_empty() {
        return Err(FramePaceError::EmptySeries);
    }
    Ok(durations_ms.iter().sum::<f64>() / durations_ms.len() as f64)
}

/// Build a [`FrameTimingReport`] from packets in stream order and a `"N/D"`
/// nominal frame rate.
///
/// Intervals are taken from the millisecond-converted timestamps, not from
/// the raw seconds values.
///
/// # Errors
///
/// - [`FramePaceError::MalformedRate`] if `nominal_rate` does not parse.
/// - [`FramePaceError::EmptySeries`] if `packets` is empty.
pub fn build_report(
    packets: &[RawPacketTimestamps],
    nominal_rate: &str,
) -> Result<FrameTimingReport, FramePaceError> {
    build_report_observed(packets, nominal_rate, &NoOpObserver)
}

/// Same as [`build_report`], reporting each stage to `observer`.
///
/// The returned report does not depend on the observer.
///
/// # Errors
///
/// See [`build_report`].
pub fn build_report_observed(
    packets: &[RawPacketTimestamps],
    nominal_rate: &str,
    observer: &dyn TimingObserver,
) -> Result<FrameTimingReport, FramePaceError> {
    let nominal_fps = parse_frame_rate(nominal_rate)?;
    observer.on_event(&AnalysisEvent::FrameRateParsed {
        frames_per_second: nominal_fps,
    });

    let frame_durations_ms = convert_series(packets, SeriesKind::FrameDuration, observer, |p| {
        p.duration_seconds
    });
    let dts_ms = convert_series(packets, SeriesKind::DecodeTimestamp, observer, |p| {
        p.decode_timestamp_seconds
    });
    let pts_ms = convert_series(packets, SeriesKind::PresentationTimestamp, observer, |p| {
        p.presentation_timestamp_seconds
    });

    let frame_count = frame_durations_ms.len();

    let average_frame_duration_ms = compute_average(&frame_durations_ms)?;
    observer.on_event(&AnalysisEvent::AverageComputed {
        average_frame_duration_ms,
    });

    let dts_intervals_ms = compute_intervals(&dts_ms);
    observer.on_event(&AnalysisEvent::IntervalsComputed {
        series: SeriesKind::DecodeTimestamp,
        len: dts_intervals_ms.len(),
    });
    let pts_intervals_ms = compute_intervals(&pts_ms);
    observer.on_event(&AnalysisEvent::IntervalsComputed {
        series: SeriesKind::PresentationTimestamp,
        len: pts_intervals_ms.len(),
    });

    observer.on_event(&AnalysisEvent::ReportBuilt { frame_count });

    Ok(FrameTimingReport {
        frame_count,
        frame_durations_ms,
        dts_intervals_ms,
        pts_intervals_ms,
        average_frame_duration_ms,
        nominal_fps,
    })
}

fn convert_series(
    packets: &[RawPacketTimestamps],
    series: SeriesKind,
    observer: &dyn TimingObserver,
    field: impl Fn(&RawPacketTimestamps) -> f64,
) -> Vec<f64> {
    let seconds: Vec<f64> = packets.iter().map(field).collect();
    let milliseconds = to_milliseconds(&seconds);
    observer.on_event(&AnalysisEvent::SeriesConverted {
        series,
        len: milliseconds.len(),
        preview: milliseconds.iter().take(PREVIEW_LEN).copied().collect(),
    });
    milliseconds
}
