//! Ingestion of `ffprobe` JSON documents.
//!
//! Accepts the document printed by
//!
//! ```text
//! ffprobe -show_streams -show_packets -of json input.mp4
//! ```
//!
//! or a narrower one restricted with `-select_streams v:0` and
//! `-show_entries packet=stream_index,dts_time,pts_time,duration_time`, so
//! that timing captured elsewhere can be analysed without FFmpeg libraries.
//!
//! The first video stream (or the requested video track) is selected by
//! `codec_type`, its `avg_frame_rate` becomes the nominal rate, and packets
//! whose `stream_index` names another stream are dropped. Packet fields may
//! be numbers or numeric strings; `"N/A"` and absent fields are treated as
//! missing and left to the [`PacketPolicy`](crate::PacketPolicy).

use serde_json::Value;

use crate::error::FramePaceError;
use crate::packet::{DTS_FIELD, DURATION_FIELD, PTS_FIELD, PacketRecord, parse_seconds};
use crate::probe::ProbeOutput;

const VIDEO_CODEC_TYPE: &str = "video";

/// Parse an `ffprobe` JSON document from text, using its first video stream.
///
/// # Errors
///
/// [`FramePaceError::Json`] for invalid JSON, otherwise as
/// [`probe_output_from_json`].
pub fn probe_output_from_str(document: &str) -> Result<ProbeOutput, FramePaceError> {
    probe_output_from_str_for_track(document, None)
}

/// Same as [`probe_output_from_str`], selecting a zero-based video track.
///
/// # Errors
///
/// As [`probe_output_from_json_for_track`].
pub fn probe_output_from_str_for_track(
    document: &str,
    video_track: Option<usize>,
) -> Result<ProbeOutput, FramePaceError> {
    let value: Value = serde_json::from_str(document)?;
    probe_output_from_json_for_track(&value, video_track)
}

/// Read the first video stream's packets and `avg_frame_rate` from a parsed
/// `ffprobe` document.
///
/// # Errors
///
/// As [`probe_output_from_json_for_track`].
pub fn probe_output_from_json(document: &Value) -> Result<ProbeOutput, FramePaceError> {
    probe_output_from_json_for_track(document, None)
}

/// Read packets and `avg_frame_rate` of one video stream from a parsed
/// `ffprobe` document.
///
/// Streams count as video when their `codec_type` is `"video"`. A document
/// whose streams carry no `codec_type` at all (e.g. produced with
/// `-show_entries stream=avg_frame_rate`) is taken to list video streams
/// only. `None` selects the first video stream.
///
/// # Errors
///
/// - [`FramePaceError::MalformedInput`] if `packets` is missing or not an
///   array, or a packet field of the selected stream is neither a number nor
///   a numeric string.
/// - [`FramePaceError::NoVideoStream`] if streams are typed and none is video.
/// - [`FramePaceError::VideoTrackOutOfRange`] for a bad track index.
/// - [`FramePaceError::MalformedRate`] if the selected stream has no string
///   `avg_frame_rate`.
pub fn probe_output_from_json_for_track(
    document: &Value,
    video_track: Option<usize>,
) -> Result<ProbeOutput, FramePaceError> {
    let packets = document
        .get("packets")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FramePaceError::malformed_input(None, "packets", "is missing or not an array")
        })?;

    let stream = select_video_stream(document, video_track)?;

    let average_frame_rate = stream
        .and_then(|stream| stream.get("avg_frame_rate"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FramePaceError::malformed_rate("", "the video stream has no avg_frame_rate")
        })?
        .to_string();

    let stream_index = stream
        .and_then(|stream| stream.get("index"))
        .and_then(Value::as_u64)
        .map(|index| index as usize);

    let mut records = Vec::with_capacity(packets.len());
    let mut other_streams = 0usize;
    for (index, packet) in packets.iter().enumerate() {
        if !belongs_to(packet, stream_index) {
            other_streams += 1;
            continue;
        }
        records.push(packet_record(index, packet)?);
    }

    log::debug!(
        "Read ffprobe document: {} packets on stream {stream_index:?} ({other_streams} from other streams dropped), avg_frame_rate {average_frame_rate}",
        records.len()
    );

    Ok(ProbeOutput {
        packets: records,
        average_frame_rate,
        stream_index,
    })
}

fn select_video_stream(
    document: &Value,
    video_track: Option<usize>,
) -> Result<Option<&Value>, FramePaceError> {
    let streams = document
        .get("streams")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let typed = streams
        .iter()
        .any(|stream| stream.get("codec_type").is_some());
    let video_streams: Vec<&Value> = streams
        .iter()
        .filter(|stream| {
            !typed || stream.get("codec_type").and_then(Value::as_str) == Some(VIDEO_CODEC_TYPE)
        })
        .collect();

    if typed && video_streams.is_empty() {
        return Err(FramePaceError::NoVideoStream);
    }

    match video_track {
        Some(track_index) => video_streams
            .get(track_index)
            .copied()
            .map(Some)
            .ok_or(FramePaceError::VideoTrackOutOfRange {
                track_index,
                track_count: video_streams.len(),
            }),
        None => Ok(video_streams.first().copied()),
    }
}

/// Packets without `stream_index`, or when the stream index is unknown, are
/// kept.
fn belongs_to(packet: &Value, stream_index: Option<usize>) -> bool {
    match (stream_index, packet.get("stream_index").and_then(Value::as_u64)) {
        (Some(selected), Some(index)) => index as usize == selected,
        _ => true,
    }
}

fn packet_record(index: usize, packet: &Value) -> Result<PacketRecord, FramePaceError> {
    Ok(PacketRecord::new(
        field_seconds(index, packet, DTS_FIELD)?,
        field_seconds(index, packet, PTS_FIELD)?,
        field_seconds(index, packet, DURATION_FIELD)?,
    ))
}

fn field_seconds(index: usize, packet: &Value, field: &str) -> Result<Option<f64>, FramePaceError> {
    match packet.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(Value::String(text)) => parse_seconds(index, field, Some(text.as_str())),
        Some(other) => Err(FramePaceError::malformed_input(
            Some(index),
            field,
            format!("has unexpected type: {other}"),
        )),
    }
}
