//! Analyse several files in parallel.
//!
//! Usage: `cargo run --example rayon --features rayon -- a.mp4 b.mkv c.mov`

fn main() {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Usage: rayon <video_path>...");
        return;
    }

    let options = framepace::AnalysisOptions::default();
    let results = framepace::analyze_many_parallel(&paths, &options);

    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(report) => println!(
                "{path}: {} frames, {:.3} ms average, {:?} fps nominal",
                report.frame_count(),
                report.average_frame_duration_ms(),
                report.nominal_fps(),
            ),
            Err(error) => println!("{path}: {error}"),
        }
    }
}
