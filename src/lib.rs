//! # framepace
//!
//! Inspect frame timing in video files: per-packet durations, decode and
//! presentation timestamp intervals, average frame duration, and the
//! stream's nominal frame rate.
//!
//! `framepace` reads container-level timestamps only. Nothing is decoded, so
//! analysing even a long file is a single cheap pass over its packets,
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ### Analyse a File
//!
//! ```no_run
//! use framepace::AnalysisOptions;
//!
//! let report = framepace::analyze_file("input.mp4", &AnalysisOptions::default()).unwrap();
//! println!("Frames: {}", report.frame_count());
//! println!("Average frame duration: {:.3} ms", report.average_frame_duration_ms());
//! println!("Nominal frame rate: {} fps", report.nominal_fps());
//! ```
//!
//! ### Work From Timestamps Directly
//!
//! ```
//! use framepace::{RawPacketTimestamps, build_report};
//!
//! let packets = [
//!     RawPacketTimestamps::new(0.0, 0.0, 0.0333),
//!     RawPacketTimestamps::new(0.0333, 0.0333, 0.0333),
//!     RawPacketTimestamps::new(0.0667, 0.0667, 0.0333),
//! ];
//! let report = build_report(&packets, "30/1").unwrap();
//! assert_eq!(report.frame_count(), 3);
//! assert_eq!(report.dts_intervals_ms().len(), 2);
//! ```
//!
//! ### Export for Plotting
//!
//! ```no_run
//! use framepace::{AnalysisOptions, JsonSink, RenderSink};
//!
//! let report = framepace::analyze_file("input.mp4", &AnalysisOptions::default()).unwrap();
//! JsonSink::new(std::io::stdout()).render(&report).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Timing engine**: millisecond conversion, DTS/PTS intervals, average
//!   frame duration, nominal fps, with explicit errors for empty series and
//!   malformed rates
//! - **FFmpeg probe**: best or chosen video track, demux order, cooperative
//!   cancellation
//! - **ffprobe ingestion**: analyse `ffprobe -of json` output without FFmpeg
//!   libraries at hand
//! - **Observers**: stage events and call timing without global state
//! - **Render hand-off**: labeled series, annotations, JSON and text sinks
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `analyze_many_parallel()` analyses files on rayon threads |
//! | `full` | Enables all of the above |

pub mod analysis;
pub mod configuration;
pub mod error;
pub mod ffmpeg;
pub mod ffprobe;
pub mod observer;
pub mod packet;
pub mod probe;
pub mod rate;
#[cfg(feature = "rayon")]
mod rayon;
pub mod render;
pub mod timing;

pub use analysis::{analyze_file, analyze_many, analyze_probe_output};
pub use configuration::{AnalysisOptions, PacketPolicy};
pub use error::FramePaceError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use ffprobe::{
    probe_output_from_json, probe_output_from_json_for_track, probe_output_from_str,
    probe_output_from_str_for_track,
};
pub use observer::{
    AnalysisEvent, CancellationToken, LogObserver, SeriesKind, TimingObserver, instrument,
};
pub use packet::{PacketRecord, RawPacketTimestamps};
pub use probe::{FrameTimingProbe, ProbeOutput};
pub use rate::{NominalFrameRate, parse_frame_rate};
#[cfg(feature = "rayon")]
pub use self::rayon::analyze_many_parallel;
pub use render::{
    Annotation, Axis, JsonSink, LabeledSeries, RenderSink, TextSummarySink, annotations,
    plot_series, report_to_json,
};
pub use timing::{
    FrameTimingReport, build_report, build_report_observed, compute_average, compute_intervals,
    to_milliseconds,
};
