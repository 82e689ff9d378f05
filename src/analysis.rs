//! End-to-end analysis: probe, validate packets, build the report.
//!
//! These are the entry points most callers want. [`analyze_file`] runs the
//! whole pipeline on one media file; [`analyze_probe_output`] starts from
//! packets that were captured some other way (for example an `ffprobe`
//! document read by [`probe_output_from_str`](crate::probe_output_from_str));
//! [`analyze_many`] handles a batch without letting one bad file abort the
//! rest.

use std::path::Path;

use crate::configuration::AnalysisOptions;
use crate::error::FramePaceError;
use crate::observer::instrument;
use crate::probe::{FrameTimingProbe, ProbeOutput};
use crate::timing::{FrameTimingReport, build_report_observed};

/// Analyse the frame timing of one media file.
///
/// The whole call is timed and reported to the configured observer as
/// [`AnalysisEvent::Finished`](crate::AnalysisEvent::Finished) with
/// operation `"analyze_file"`.
///
/// # Errors
///
/// Any probe error, a [`FramePaceError::MalformedInput`] from the packet
/// policy, or an engine error. No partial report is ever returned.
///
/// # Example
///
/// ```no_run
/// use framepace::{AnalysisOptions, FramePaceError};
///
/// let report = framepace::analyze_file("input.mp4", &AnalysisOptions::default())?;
/// println!(
///     "{} frames, {:.3} ms average, {} fps nominal",
///     report.frame_count(),
///     report.average_frame_duration_ms(),
///     report.nominal_fps(),
/// );
/// # Ok::<(), FramePaceError>(())
/// ```
pub fn analyze_file<P: AsRef<Path>>(
    path: P,
    options: &AnalysisOptions,
) -> Result<FrameTimingReport, FramePaceError> {
    let path = path.as_ref();
    instrument(options.observer(), "analyze_file", || -> Result<_, FramePaceError> {
        let output = FrameTimingProbe::probe(path, options)?;
        let report = analyze_probe_output(output, options)?;
        log::info!(
            "Analysed {}: {} frames, average {:.3} ms, nominal {} fps",
            path.display(),
            report.frame_count(),
            report.average_frame_duration_ms(),
            report.nominal_fps(),
        );
        Ok(report)
    })
}

/// Build a report from an already-probed stream.
///
/// # Errors
///
/// [`FramePaceError::MalformedInput`] under
/// [`PacketPolicy::Strict`](crate::PacketPolicy::Strict), otherwise the
/// engine errors of [`build_report`](crate::build_report).
pub fn analyze_probe_output(
    output: ProbeOutput,
    options: &AnalysisOptions,
) -> Result<FrameTimingReport, FramePaceError> {
    let average_frame_rate = output.average_frame_rate.clone();
    let packets = output.into_packets(options.packet_policy())?;
    build_report_observed(&packets, &average_frame_rate, options.observer())
}

/// Analyse several files one after another.
///
/// Files that fail produce an `Err` entry rather than aborting the batch;
/// results are in input order.
pub fn analyze_many<P: AsRef<Path>>(
    paths: &[P],
    options: &AnalysisOptions,
) -> Vec<Result<FrameTimingReport, FramePaceError>> {
    paths
        .iter()
        .map(|path| analyze_file(path, options))
        .collect()
}
