//! Analyse frame timing captured with `ffprobe`, without FFmpeg libraries.
//!
//! Usage:
//!
//! ```text
//! ffprobe -show_streams -show_packets -of json input.mp4 > probe.json
//! cargo run --example ffprobe_document -- probe.json
//! ```

use framepace::{AnalysisOptions, PacketPolicy, RenderSink, TextSummarySink};

fn main() -> Result<(), framepace::FramePaceError> {
    let path = std::env::args().nth(1).expect("Usage: ffprobe_document <probe.json>");
    let document = std::fs::read_to_string(&path)?;

    let output = framepace::probe_output_from_str(&document)?;
    println!(
        "{} video packets on stream {:?} at {}",
        output.packets.len(),
        output.stream_index,
        output.average_frame_rate,
    );

    let incomplete = output.packets.iter().filter(|record| !record.is_complete()).count();
    if incomplete > 0 {
        println!("{incomplete} packets lack a timestamp and will be skipped");
    }

    let options = AnalysisOptions::new().with_packet_policy(PacketPolicy::SkipIncomplete);
    let report = framepace::analyze_probe_output(output, &options)?;

    TextSummarySink::new(std::io::stdout().lock()).render(&report)?;
    Ok(())
}
