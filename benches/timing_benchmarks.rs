//! Benchmarks for the timing engine and the probe.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! The probe benchmarks need `tests/fixtures/sample_video.mp4` and are
//! skipped without it.

use std::{hint::black_box, path::Path};

use criterion::{BenchmarkId, Criterion};
use ffmpeg_next::util::log::Level as LogLevel;
use framepace::{
    AnalysisOptions, FrameTimingProbe, JsonSink, RawPacketTimestamps, RenderSink, build_report,
    probe_output_from_str,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

/// A 29.97 fps stream with an I-P-B-B reorder pattern.
fn synthetic_packets(count: usize) -> Vec<RawPacketTimestamps> {
    let frame_seconds = 1001.0 / 30000.0;
    (0..count)
        .map(|index| {
            let dts = index as f64 * frame_seconds;
            let reorder = match index % 4 {
                1 => 2.0,
                2 | 3 => -1.0,
                _ => 0.0,
            };
            RawPacketTimestamps::new(dts, dts + reorder * frame_seconds, frame_seconds)
        })
        .collect()
}

fn ffprobe_document(count: usize) -> String {
    let packets: Vec<String> = synthetic_packets(count)
        .iter()
        .map(|packet| {
            format!(
                r#"{{"dts_time":"{:.6}","pts_time":"{:.6}","duration_time":"{:.6}"}}"#,
                packet.decode_timestamp_seconds,
                packet.presentation_timestamp_seconds,
                packet.duration_seconds,
            )
        })
        .collect();
    format!(
        r#"{{"packets":[{}],"streams":[{{"index":0,"avg_frame_rate":"30000/1001"}}]}}"#,
        packets.join(",")
    )
}

fn benchmark_build_report(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("build_report");
    for count in [300, 9_000, 108_000] {
        let packets = synthetic_packets(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &packets, |bencher, packets| {
            bencher.iter(|| build_report(black_box(packets), "30000/1001").unwrap());
        });
    }
    group.finish();
}

fn benchmark_ffprobe_ingestion(criterion: &mut Criterion) {
    let document = ffprobe_document(9_000);
    criterion.bench_function("parse ffprobe document (9000 packets)", |bencher| {
        bencher.iter(|| probe_output_from_str(black_box(&document)).unwrap());
    });
}

fn benchmark_json_render(criterion: &mut Criterion) {
    let report = build_report(&synthetic_packets(9_000), "30000/1001").unwrap();
    criterion.bench_function("render report as JSON (9000 frames)", |bencher| {
        bencher.iter(|| {
            let mut sink = JsonSink::new(Vec::new());
            sink.render(black_box(&report)).unwrap();
            sink.into_inner()
        });
    });
}

fn benchmark_probe(criterion: &mut Criterion) {
    ffmpeg_next::util::log::set_level(LogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    criterion.bench_function("probe sample video", |bencher| {
        bencher.iter(|| FrameTimingProbe::probe(SAMPLE_VIDEO, &AnalysisOptions::default()).unwrap());
    });

    criterion.bench_function("analyze sample video", |bencher| {
        bencher.iter(|| framepace::analyze_file(SAMPLE_VIDEO, &AnalysisOptions::default()).unwrap());
    });
}

criterion::criterion_group!(
    benches,
    benchmark_build_report,
    benchmark_ffprobe_ingestion,
    benchmark_json_render,
    benchmark_probe,
);
criterion::criterion_main!(benches);
