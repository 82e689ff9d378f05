//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions.

use std::path::Path;

use framepace::{
    AnalysisOptions, CancellationToken, FramePaceError, FrameTimingProbe, analyze_file,
    analyze_many, build_report,
};

#[test]
fn open_nonexistent_file() {
    let result = analyze_file("this_file_does_not_exist.mp4", &AnalysisOptions::default());
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    // Create a temporary file with garbage content.
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = FrameTimingProbe::probe(&invalid_file_path, &AnalysisOptions::default());
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn batch_keeps_going_after_failures() {
    let results = analyze_many(
        &["missing_one.mp4", "missing_two.mp4"],
        &AnalysisOptions::default(),
    );
    assert_eq!(results.len(), 2);
    assert!(
        results
            .iter()
            .all(|result| matches!(result, Err(FramePaceError::FileOpen { .. })))
    );
}

#[test]
fn track_out_of_range() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let options = AnalysisOptions::new().with_video_track(99);
    let result = analyze_file(path, &options);

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("out of range"),
        "Error message should mention out of range: {error_message}",
    );
}

#[test]
fn no_video_stream_error() {
    let path = "tests/fixtures/sample_audio_only.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let result = analyze_file(path, &AnalysisOptions::default());
    assert!(matches!(result, Err(FramePaceError::NoVideoStream)));
}

#[test]
fn cancelled_before_first_packet() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let token = CancellationToken::new();
    token.cancel();
    let options = AnalysisOptions::new().with_cancellation(token);

    let result = FrameTimingProbe::probe(path, &options);
    assert!(matches!(result, Err(FramePaceError::Cancelled)));
}

#[test]
fn engine_error_messages() {
    let empty = build_report(&[], "25/1").unwrap_err().to_string();
    assert!(empty.contains("Empty series"), "{empty}");

    let rate = build_report(&[], "thirty").unwrap_err().to_string();
    assert!(rate.contains("Malformed frame rate"), "{rate}");
    assert!(rate.contains("thirty"), "{rate}");
}

#[test]
fn malformed_input_message_names_packet_and_field() {
    let document = r#"{
        "packets": [
            { "pts_time": "0", "dts_time": "0", "duration_time": "0.04" },
            { "pts_time": "0.04", "dts_time": "0.04", "duration_time": "oops" }
        ],
        "streams": [ { "avg_frame_rate": "25/1" } ]
    }"#;
    let message = framepace::probe_output_from_str(document)
        .unwrap_err()
        .to_string();

    assert!(message.contains("packet 1"), "{message}");
    assert!(message.contains("duration_time"), "{message}");
}
