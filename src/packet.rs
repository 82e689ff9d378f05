//! Per-packet timing records.
//!
//! [`PacketRecord`] is what the probe boundary hands over: three optional
//! timing fields in seconds, exactly as a demuxer (or `ffprobe`) reports
//! them. [`RawPacketTimestamps`] is the complete form the timing engine
//! consumes. The conversion between the two is governed by a
//! [`PacketPolicy`](crate::PacketPolicy).

use crate::error::FramePaceError;

/// Name of the decode-timestamp field at the probe boundary.
pub const DTS_FIELD: &str = "dts_time";
/// Name of the presentation-timestamp field at the probe boundary.
pub const PTS_FIELD: &str = "pts_time";
/// Name of the packet-duration field at the probe boundary.
pub const DURATION_FIELD: &str = "duration_time";

/// Marker `ffprobe` prints for fields it has no value for.
const NOT_AVAILABLE: &str = "N/A";

/// Timing metadata for one demuxed packet, all values in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPacketTimestamps {
    /// When the packet is scheduled for decoding.
    pub decode_timestamp_seconds: f64,
    /// When the decoded frame should be displayed. May run backwards
    /// relative to decode order when B-frames are present.
    pub presentation_timestamp_seconds: f64,
    /// Container-reported duration of the packet. Zero is tolerated.
    pub duration_seconds: f64,
}

impl RawPacketTimestamps {
    /// Create a record from its three timing values.
    pub fn new(
        decode_timestamp_seconds: f64,
        presentation_timestamp_seconds: f64,
        duration_seconds: f64,
    ) -> Self {
        Self {
            decode_timestamp_seconds,
            presentation_timestamp_seconds,
            duration_seconds,
        }
    }
}

/// A packet as reported by the probe, with possibly missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PacketRecord {
    /// Decode timestamp in seconds, if the container carries one.
    pub dts_time: Option<f64>,
    /// Presentation timestamp in seconds, if the container carries one.
    pub pts_time: Option<f64>,
    /// Packet duration in seconds, if the container carries one.
    pub duration_time: Option<f64>,
}

impl PacketRecord {
    /// Create a record from three optional values.
    pub fn new(dts_time: Option<f64>, pts_time: Option<f64>, duration_time: Option<f64>) -> Self {
        Self {
            dts_time,
            pts_time,
            duration_time,
        }
    }

    /// Build a record from textual fields as `ffprobe` prints them.
    ///
    /// `None` and `"N/A"` both mean the field is absent.
    ///
    /// # Errors
    ///
    /// Returns [`FramePaceError::MalformedInput`] if a present field is not a
    /// number. `packet_index` is carried into the error.
    pub fn from_text(
        packet_index: usize,
        dts_time: Option<&str>,
        pts_time: Option<&str>,
        duration_time: Option<&str>,
    ) -> Result<Self, FramePaceError> {
        Ok(Self {
            dts_time: parse_seconds(packet_index, DTS_FIELD, dts_time)?,
            pts_time: parse_seconds(packet_index, PTS_FIELD, pts_time)?,
            duration_time: parse_seconds(packet_index, DURATION_FIELD, duration_time)?,
        })
    }

    /// Whether all three fields are present.
    pub fn is_complete(&self) -> bool {
        self.dts_time.is_some() && self.pts_time.is_some() && self.duration_time.is_some()
    }

    /// Name of the first missing field, if any.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.dts_time.is_none() {
            Some(DTS_FIELD)
        } else if self.pts_time.is_none() {
            Some(PTS_FIELD)
        } else if self.duration_time.is_none() {
            Some(DURATION_FIELD)
        } else {
            None
        }
    }

    /// Convert to [`RawPacketTimestamps`].
    ///
    /// # Errors
    ///
    /// Returns [`FramePaceError::MalformedInput`] naming the first missing
    /// field.
    pub fn to_timestamps(&self, packet_index: usize) -> Result<RawPacketTimestamps, FramePaceError> {
        match (self.dts_time, self.pts_time, self.duration_time) {
            (Some(dts), Some(pts), Some(duration)) => Ok(RawPacketTimestamps::new(dts, pts, duration)),
            _ => Err(FramePaceError::malformed_input(
                Some(packet_index),
                self.first_missing_field().unwrap_or(DTS_FIELD),
                "is missing",
            )),
        }
    }
}

impl From<RawPacketTimestamps> for PacketRecord {
    fn from(packet: RawPacketTimestamps) -> Self {
        Self {
            dts_time: Some(packet.decode_timestamp_seconds),
            pts_time: Some(packet.presentation_timestamp_seconds),
            duration_time: Some(packet.duration_seconds),
        }
    }
}

/// Parse one textual seconds field; `None` and `"N/A"` mean absent.
pub(crate) fn parse_seconds(
    packet_index: usize,
    field: &str,
    value: Option<&str>,
) -> Result<Option<f64>, FramePaceError> {
    let Some(text) = value.map(str::trim) else {
        return Ok(None);
    };
    if text == NOT_AVAILABLE {
        return Ok(None);
    }
    text.parse::<f64>().map(Some).map_err(|_| {
        FramePaceError::malformed_input(
            Some(packet_index),
            field,
            format!("is not a number: {text:?}"),
        )
    })
}
