//! Analyse a file's frame timing and export it as JSON.
//!
//! Usage: `cargo run --example frame_timing -- path/to/video.mp4 [timing.json]`

use std::{fs::File, io::BufWriter};

use framepace::{AnalysisOptions, JsonSink, RenderSink, annotations};

fn main() -> Result<(), framepace::FramePaceError> {
    let path = std::env::args().nth(1).expect("Usage: frame_timing <video_path> [json_path]");
    let json_path = std::env::args().nth(2);

    let report = framepace::analyze_file(&path, &AnalysisOptions::default())?;

    println!("Frame timing of: {path}");
    println!("---");
    for annotation in annotations(&report) {
        println!("{}: {}", annotation.label, annotation.text);
    }

    if let Some((min, max)) = report.frame_duration_range() {
        println!("Frame duration range: {min:.3} - {max:.3} ms");
    }

    // Print first 10 DTS intervals for demonstration.
    for (index, interval) in report.dts_intervals_ms().iter().take(10).enumerate() {
        println!("  frame {} -> {}: {interval:.3} ms", index, index + 1);
    }

    if let Some(json_path) = json_path {
        let mut sink = JsonSink::new(BufWriter::new(File::create(&json_path)?));
        sink.render(&report)?;
        println!("---");
        println!("Wrote {json_path}");
    }

    Ok(())
}
