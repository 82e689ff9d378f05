//! Hand-off from a [`FrameTimingReport`] to whatever draws it.
//!
//! A renderer is expected to show three labeled series in one plot (frame
//! duration on the primary axis, DTS and PTS intervals on a secondary axis)
//! and three scalar annotations. [`plot_series`] and [`annotations`] produce
//! that data contract; [`RenderSink`] is the seam a renderer implements.
//!
//! Two sinks ship with the crate: [`JsonSink`] writes a self-describing JSON
//! document, and [`TextSummarySink`] writes a short human-readable summary.
//!
//! # Example
//!
//! ```
//! use framepace::{JsonSink, RawPacketTimestamps, RenderSink, build_report};
//!
//! let packets = [
//!     RawPacketTimestamps::new(0.0, 0.0, 0.02),
//!     RawPacketTimestamps::new(0.02, 0.02, 0.02),
//! ];
//! let report = build_report(&packets, "50/1")?;
//!
//! let mut sink = JsonSink::new(Vec::new());
//! sink.render(&report)?;
//! let document: serde_json::Value = serde_json::from_slice(&sink.into_inner())?;
//! assert_eq!(document["summary"]["frame_count"], 2);
//! # Ok::<(), framepace::FramePaceError>(())
//! ```

use std::io::Write;

use serde_json::{Value, json};

use crate::error::FramePaceError;
use crate::timing::{FrameTimingReport, value_range};

/// Label of the per-frame duration series.
pub const FRAME_DURATION_LABEL: &str = "frame duration";
/// Label of the decode-timestamp interval series.
pub const DTS_INTERVAL_LABEL: &str = "DTS interval";
/// Label of the presentation-timestamp interval series.
pub const PTS_INTERVAL_LABEL: &str = "PTS interval";

/// Which vertical axis a series belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// "Duration (milliseconds)".
    Primary,
    /// "DTS/PTS interval (milliseconds)".
    Secondary,
}

impl Axis {
    /// Axis title a renderer should display.
    pub fn title(self) -> &'static str {
        match self {
            Axis::Primary => "Duration (milliseconds)",
            Axis::Secondary => "DTS/PTS interval (milliseconds)",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Axis::Primary => "primary",
            Axis::Secondary => "secondary",
        }
    }
}

/// One named series of per-frame values, indexed by frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries<'a> {
    /// Legend label.
    pub label: &'static str,
    /// Axis to plot against.
    pub axis: Axis,
    /// Values in milliseconds.
    pub values: &'a [f64],
    /// Whether the series is shown before the user toggles it.
    pub visible_by_default: bool,
}

/// A scalar summary shown on the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Caption, e.g. `"Number of Frames"`.
    pub label: &'static str,
    /// Formatted value, e.g. `"33.367 milliseconds"`.
    pub text: String,
}

/// The three series of a report, in drawing order.
///
/// The PTS interval series is hidden by default: with B-frames it is noisy
/// and would dominate the secondary axis.
pub fn plot_series(report: &FrameTimingReport) -> [LabeledSeries<'_>; 3] {
    [
        LabeledSeries {
            label: FRAME_DURATION_LABEL,
            axis: Axis::Primary,
            values: report.frame_durations_ms(),
            visible_by_default: true,
        },
        LabeledSeries {
            label: DTS_INTERVAL_LABEL,
            axis: Axis::Secondary,
            values: report.dts_intervals_ms(),
            visible_by_default: true,
        },
        LabeledSeries {
            label: PTS_INTERVAL_LABEL,
            axis: Axis::Secondary,
            values: report.pts_intervals_ms(),
            visible_by_default: false,
        },
    ]
}

/// The three scalar annotations: frame count, average frame duration and
/// nominal frame rate.
pub fn annotations(report: &FrameTimingReport) -> [Annotation; 3] {
    [
        Annotation {
            label: "Number of Frames",
            text: report.frame_count().to_string(),
        },
        Annotation {
            label: "Average Frame Duration",
            text: format!("{:.3} milliseconds", report.average_frame_duration_ms()),
        },
        Annotation {
            label: "Average Frame Rate",
            text: format!("{:?}", report.nominal_fps()),
        },
    ]
}

/// Something that turns a report into a visual or serialized artifact.
pub trait RenderSink {
    /// Render one report. Buffered sinks flush before returning.
    ///
    /// # Errors
    ///
    /// Implementations report their own I/O or encoding failures.
    fn render(&mut self, report: &FrameTimingReport) -> Result<(), FramePaceError>;
}

/// Build the JSON document [`JsonSink`] writes.
///
/// Non-finite values have no JSON representation and are written as `null`.
pub fn report_to_json(report: &FrameTimingReport) -> Value {
    let series: Vec<Value> = plot_series(report)
        .iter()
        .map(|series| {
            json!({
                "label": series.label,
                "axis": series.axis.key(),
                "axis_title": series.axis.title(),
                "visible": series.visible_by_default,
                "values": series.values,
            })
        })
        .collect();

    let annotations: Vec<Value> = annotations(report)
        .iter()
        .map(|annotation| json!({ "label": annotation.label, "text": annotation.text }))
        .collect();

    json!({
        "summary": {
            "frame_count": report.frame_count(),
            "average_frame_duration_ms": report.average_frame_duration_ms(),
            "nominal_fps": report.nominal_fps(),
            "frame_duration_range_ms": report.frame_duration_range().map(|(min, max)| [min, max]),
        },
        "series": series,
        "annotations": annotations,
    })
}

/// Writes each report as a pretty-printed JSON document.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn render(&mut self, report: &FrameTimingReport) -> Result<(), FramePaceError> {
        serde_json::to_writer_pretty(&mut self.writer, &report_to_json(report))?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the annotations plus per-series min/max as plain text.
#[derive(Debug)]
pub struct TextSummarySink<W: Write> {
    writer: W,
}

impl<W: Write> TextSummarySink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for TextSummarySink<W> {
    fn render(&mut self, report: &FrameTimingReport) -> Result<(), FramePaceError> {
        for annotation in annotations(report) {
            writeln!(self.writer, "{}: {}", annotation.label, annotation.text)?;
        }
        for series in plot_series(report) {
            match value_range(series.values) {
                Some((min, max)) => writeln!(
                    self.writer,
                    "{}: {} values, min {min:.3} ms, max {max:.3} ms",
                    series.label,
                    series.values.len(),
                )?,
                None => writeln!(self.writer, "{}: no values", series.label)?,
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
