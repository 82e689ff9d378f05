//! Error types for the `framepace` crate.
//!
//! This module defines [`FramePaceError`], the unified error type returned by
//! every fallible operation in the crate. Input-validation failures
//! (malformed frame rates, empty packet series, malformed packet fields) are
//! raised where they are detected and never replaced by a default value.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `framepace` operations.
///
/// Every public method that can fail returns `Result<T, FramePaceError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramePaceError {
    /// The nominal frame rate is absent, not an `N/D` rational of integers,
    /// or has a zero denominator.
    #[error("Malformed frame rate {value:?}: {reason}")]
    MalformedRate {
        /// The text that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A statistic was requested over an empty packet series.
    #[error("Empty series: at least one packet is required")]
    EmptySeries,

    /// A required per-packet field is missing or non-numeric.
    #[error("Malformed input{}: field `{field}` {reason}", packet_suffix(.packet_index))]
    MalformedInput {
        /// Zero-based index of the offending packet, when known.
        packet_index: Option<usize>,
        /// Name of the offending field (e.g. `"dts_time"`).
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the probe.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The requested video track index is out of range.
    #[error("Video track {track_index} is out of range (file has {track_count} video tracks)")]
    VideoTrackOutOfRange {
        /// Requested track index.
        track_index: usize,
        /// Number of available video tracks.
        track_count: usize,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// A JSON document could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] JsonError),

    /// Probing was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for FramePaceError {
    fn from(error: FfmpegError) -> Self {
        FramePaceError::Ffmpeg(error.to_string())
    }
}

impl FramePaceError {
    /// Build a [`FramePaceError::MalformedRate`].
    pub(crate) fn malformed_rate(value: &str, reason: impl Into<String>) -> Self {
        FramePaceError::MalformedRate {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a [`FramePaceError::MalformedInput`] for a given packet.
    pub(crate) fn malformed_input(
        packet_index: Option<usize>,
        field: &str,
        reason: impl Into<String>,
    ) -> Self {
        FramePaceError::MalformedInput {
            packet_index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn packet_suffix(packet_index: &Option<usize>) -> String {
    match packet_index {
        Some(index) => format!(" in packet {index}"),
        None => String::new(),
    }
}
