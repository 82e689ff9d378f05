//! Container-level frame timing probe.
//!
//! [`FrameTimingProbe`] opens a media file, picks a video stream, and reads
//! every packet of that stream in demux order without decoding. The result is
//! a [`ProbeOutput`]: per-packet DTS, PTS and duration in seconds plus the
//! stream's declared average frame rate as an `"N/D"` string.
//!
//! # Example
//!
//! ```no_run
//! use framepace::{AnalysisOptions, FrameTimingProbe, FramePaceError, PacketPolicy};
//!
//! let output = FrameTimingProbe::probe("input.mp4", &AnalysisOptions::default())?;
//! println!("{} packets at {}", output.packets.len(), output.average_frame_rate);
//! let packets = output.into_packets(PacketPolicy::Strict)?;
//! # Ok::<(), FramePaceError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{Error as FfmpegError, Packet, Rational, format::context::Input, media::Type};

use crate::configuration::{AnalysisOptions, PacketPolicy};
use crate::error::FramePaceError;
use crate::observer::PacketCounter;
use crate::packet::{PacketRecord, RawPacketTimestamps};
use crate::rate::NominalFrameRate;

/// Packet timing for one video stream, as read from the container.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutput {
    /// Per-packet records in demux order.
    pub packets: Vec<PacketRecord>,
    /// The stream's average frame rate, formatted `"N/D"`.
    pub average_frame_rate: String,
    /// Container stream index the packets were read from, when known.
    pub stream_index: Option<usize>,
}

impl ProbeOutput {
    /// Apply `policy` and return complete packets in their original order.
    ///
    /// # Errors
    ///
    /// Under [`PacketPolicy::Strict`], returns
    /// [`FramePaceError::MalformedInput`] for the first packet with a missing
    /// field.
    pub fn into_packets(
        self,
        policy: PacketPolicy,
    ) -> Result<Vec<RawPacketTimestamps>, FramePaceError> {
        let mut packets = Vec::with_capacity(self.packets.len());
        let mut skipped = 0usize;

        for (index, record) in self.packets.iter().enumerate() {
            match policy {
                PacketPolicy::Strict => packets.push(record.to_timestamps(index)?),
                PacketPolicy::SkipIncomplete => match record.to_timestamps(index) {
                    Ok(packet) => packets.push(packet),
                    Err(error) => {
                        log::debug!("Skipping packet: {error}");
                        skipped += 1;
                    }
                },
            }
        }

        if skipped > 0 {
            log::warn!(
                "Skipped {skipped} of {} packets with missing timing fields",
                self.packets.len()
            );
        }

        Ok(packets)
    }
}

/// Reads packet timing from media files through FFmpeg.
pub struct FrameTimingProbe;

impl FrameTimingProbe {
    /// Probe the video stream selected by `options`.
    ///
    /// # Errors
    ///
    /// - [`FramePaceError::FileOpen`] if the file cannot be opened.
    /// - [`FramePaceError::NoVideoStream`] if it has no video stream.
    /// - [`FramePaceError::VideoTrackOutOfRange`] for a bad track index.
    /// - [`FramePaceError::MalformedRate`] if the stream declares no average
    ///   frame rate (`0/0`).
    /// - [`FramePaceError::Cancelled`] if the token fires mid-read.
    /// - [`FramePaceError::Ffmpeg`] on demuxer errors.
    pub fn probe<P: AsRef<Path>>(
        path: P,
        options: &AnalysisOptions,
    ) -> Result<ProbeOutput, FramePaceError> {
        let path = path.as_ref();
        log::debug!("Probing frame timing: {}", path.display());

        ffmpeg_next::init().map_err(|error| FramePaceError::FileOpen {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let mut input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FramePaceError::FileOpen {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

        let stream_index = select_video_stream(&input_context, options.video_track)?;
        let (time_base, average_frame_rate) = {
            let stream = input_context
                .stream(stream_index)
                .ok_or(FramePaceError::NoVideoStream)?;
            let rate = NominalFrameRate::try_from(stream.avg_frame_rate())?;
            (stream.time_base(), rate.to_string())
        };

        log::debug!(
            "Video stream {stream_index}: time base {}/{}, avg_frame_rate {average_frame_rate}",
            time_base.numerator(),
            time_base.denominator(),
        );

        let packets = read_packets(&mut input_context, stream_index, time_base, options)?;

        log::info!(
            "Probed {}: {} packets on stream {stream_index}",
            path.display(),
            packets.len(),
        );

        Ok(ProbeOutput {
            packets,
            average_frame_rate,
            stream_index: Some(stream_index),
        })
    }
}

fn select_video_stream(
    input_context: &Input,
    video_track: Option<usize>,
) -> Result<usize, FramePaceError> {
    let video_streams: Vec<usize> = input_context
        .streams()
        .filter(|stream| stream.parameters().medium() == Type::Video)
        .map(|stream| stream.index())
        .collect();

    match video_track {
        Some(track_index) => video_streams.get(track_index).copied().ok_or(
            FramePaceError::VideoTrackOutOfRange {
                track_index,
                track_count: video_streams.len(),
            },
        ),
        None => input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .or_else(|| video_streams.first().copied())
            .ok_or(FramePaceError::NoVideoStream),
    }
}

fn read_packets(
    input_context: &mut Input,
    stream_index: usize,
    time_base: Rational,
    options: &AnalysisOptions,
) -> Result<Vec<PacketRecord>, FramePaceError> {
    let mut counter = PacketCounter::new(options.observer(), options.batch_size);
    let mut records = Vec::new();

    loop {
        if options.is_cancelled() {
            return Err(FramePaceError::Cancelled);
        }

        // av_read_frame expects a blank packet; reusing one leaks its buffer.
        let mut packet = Packet::empty();
        match packet.read(input_context) {
            Ok(()) => {
                if packet.stream() != stream_index {
                    continue;
                }
                records.push(PacketRecord::new(
                    packet.dts().map(|dts| ticks_to_seconds(dts, time_base)),
                    packet.pts().map(|pts| ticks_to_seconds(pts, time_base)),
                    Some(ticks_to_seconds(packet.duration(), time_base)),
                ));
                counter.advance();
            }
            Err(FfmpegError::Eof) => break,
            Err(error) => return Err(FramePaceError::from(error)),
        }
    }

    counter.finish();
    Ok(records)
}

/// Rescale a stream-time-base tick count to seconds.
fn ticks_to_seconds(ticks: i64, time_base: Rational) -> f64 {
    ticks as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator().max(1))
}
