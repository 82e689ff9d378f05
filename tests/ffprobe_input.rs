//! ffprobe JSON ingestion and packet policy tests.

use framepace::{
    AnalysisOptions, FramePaceError, PacketPolicy, PacketRecord, analyze_probe_output,
    probe_output_from_str, probe_output_from_str_for_track,
};

const THREE_PACKETS: &str = r#"{
    "packets": [
        { "pts_time": "0.000000", "dts_time": "0.000000", "duration_time": "0.033333" },
        { "pts_time": "0.033333", "dts_time": "0.033333", "duration_time": "0.033333" },
        { "pts_time": "0.066667", "dts_time": "0.066667", "duration_time": "0.033333" }
    ],
    "streams": [
        { "index": 0, "codec_type": "video", "avg_frame_rate": "30/1" }
    ]
}"#;

const MISSING_DTS: &str = r#"{
    "packets": [
        { "pts_time": "0.000000", "dts_time": "N/A", "duration_time": "0.040000" },
        { "pts_time": "0.040000", "dts_time": "0.040000", "duration_time": "0.040000" },
        { "pts_time": "0.080000", "dts_time": "0.080000", "duration_time": "0.040000" }
    ],
    "streams": [ { "avg_frame_rate": "25/1" } ]
}"#;

#[test]
fn reads_packets_and_frame_rate() {
    let output = probe_output_from_str(THREE_PACKETS).expect("parse");

    assert_eq!(output.packets.len(), 3);
    assert_eq!(output.average_frame_rate, "30/1");
    assert_eq!(output.stream_index, Some(0));
    assert_eq!(
        output.packets[1],
        PacketRecord::new(Some(0.033333), Some(0.033333), Some(0.033333))
    );
}

#[test]
fn numeric_fields_are_accepted() {
    let document = r#"{
        "packets": [ { "pts_time": 0.5, "dts_time": 0.25, "duration_time": 0.04 } ],
        "streams": [ { "avg_frame_rate": "25/1" } ]
    }"#;
    let output = probe_output_from_str(document).expect("parse");
    assert_eq!(
        output.packets[0],
        PacketRecord::new(Some(0.25), Some(0.5), Some(0.04))
    );
}

#[test]
fn analyse_ffprobe_document_end_to_end() {
    let output = probe_output_from_str(THREE_PACKETS).expect("parse");
    let report = analyze_probe_output(output, &AnalysisOptions::default()).expect("report");

    assert_eq!(report.frame_count(), 3);
    assert_eq!(report.nominal_fps(), 30.0);
    assert!((report.average_frame_duration_ms() - 33.333).abs() < 1e-9);
    assert_eq!(report.dts_intervals_ms().len(), 2);
}

#[test]
fn not_available_is_missing_under_strict_policy() {
    let output = probe_output_from_str(MISSING_DTS).expect("parse");
    assert_eq!(output.packets[0].dts_time, None);

    match analyze_probe_output(output, &AnalysisOptions::default()) {
        Err(FramePaceError::MalformedInput {
            packet_index, field, ..
        }) => {
            assert_eq!(packet_index, Some(0));
            assert_eq!(field, "dts_time");
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

#[test]
fn skip_incomplete_drops_only_incomplete_packets() {
    let output = probe_output_from_str(MISSING_DTS).expect("parse");
    let options = AnalysisOptions::new().with_packet_policy(PacketPolicy::SkipIncomplete);
    let report = analyze_probe_output(output, &options).expect("report");

    assert_eq!(report.frame_count(), 2);
    assert_eq!(report.dts_intervals_ms().len(), 1);
    assert!((report.dts_intervals_ms()[0] - 40.0).abs() < 1e-9);
}

#[test]
fn skipping_every_packet_leaves_an_empty_series() {
    let document = r#"{
        "packets": [ { "pts_time": "N/A", "dts_time": "N/A", "duration_time": "N/A" } ],
        "streams": [ { "avg_frame_rate": "25/1" } ]
    }"#;
    let output = probe_output_from_str(document).expect("parse");
    let options = AnalysisOptions::new().with_packet_policy(PacketPolicy::SkipIncomplete);

    match analyze_probe_output(output, &options) {
        Err(FramePaceError::EmptySeries) => {}
        other => panic!("expected EmptySeries, got {other:?}"),
    }
}

#[test]
fn non_numeric_field_is_malformed_input() {
    let document = r#"{
        "packets": [ { "pts_time": "zero", "dts_time": "0.0", "duration_time": "0.04" } ],
        "streams": [ { "avg_frame_rate": "25/1" } ]
    }"#;
    match probe_output_from_str(document) {
        Err(FramePaceError::MalformedInput {
            packet_index, field, ..
        }) => {
            assert_eq!(packet_index, Some(0));
            assert_eq!(field, "pts_time");
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

#[test]
fn missing_frame_rate_is_malformed_rate() {
    let document = r#"{ "packets": [], "streams": [ { "codec_type": "video" } ] }"#;
    match probe_output_from_str(document) {
        Err(FramePaceError::MalformedRate { .. }) => {}
        other => panic!("expected MalformedRate, got {other:?}"),
    }
}

#[test]
fn unknown_frame_rate_fails_the_analysis() {
    // ffprobe reports 0/0 when the rate is unknown.
    let document = r#"{
        "packets": [ { "pts_time": "0", "dts_time": "0", "duration_time": "0.04" } ],
        "streams": [ { "avg_frame_rate": "0/0" } ]
    }"#;
    let output = probe_output_from_str(document).expect("parse");
    match analyze_probe_output(output, &AnalysisOptions::default()) {
        Err(FramePaceError::MalformedRate { .. }) => {}
        other => panic!("expected MalformedRate, got {other:?}"),
    }
}

#[test]
fn missing_packets_array_is_malformed_input() {
    let document = r#"{ "streams": [ { "avg_frame_rate": "25/1" } ] }"#;
    assert!(matches!(
        probe_output_from_str(document),
        Err(FramePaceError::MalformedInput { packet_index: None, .. })
    ));
}

#[test]
fn invalid_json_is_a_json_error() {
    assert!(matches!(
        probe_output_from_str("{ not json"),
        Err(FramePaceError::Json(_))
    ));
}

#[test]
fn packet_record_text_parsing() {
    let record = PacketRecord::from_text(4, Some(" 1.5 "), Some("N/A"), None).expect("record");
    assert_eq!(record, PacketRecord::new(Some(1.5), None, None));
    assert!(!record.is_complete());
    assert_eq!(record.first_missing_field(), Some("pts_time"));

    match record.to_timestamps(4) {
        Err(FramePaceError::MalformedInput {
            packet_index, field, ..
        }) => {
            assert_eq!(packet_index, Some(4));
            assert_eq!(field, "pts_time");
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

const MIXED_STREAMS: &str = r#"{
    "packets": [
        { "codec_type": "video", "stream_index": 0, "pts_time": "0.000000", "dts_time": "0.000000", "duration_time": "0.040000" },
        { "codec_type": "audio", "stream_index": 1, "pts_time": "0.000000", "dts_time": "0.000000", "duration_time": "0.021333" },
        { "codec_type": "video", "stream_index": 0, "pts_time": "0.040000", "dts_time": "0.040000", "duration_time": "0.040000" },
        { "codec_type": "audio", "stream_index": 1, "pts_time": "0.021333", "dts_time": "0.021333", "duration_time": "0.021333" },
        { "codec_type": "video", "stream_index": 2, "pts_time": "0.000000", "dts_time": "0.000000", "duration_time": "0.033333" }
    ],
    "streams": [
        { "index": 1, "codec_type": "audio", "avg_frame_rate": "0/0" },
        { "index": 0, "codec_type": "video", "avg_frame_rate": "25/1" },
        { "index": 2, "codec_type": "video", "avg_frame_rate": "30/1" }
    ]
}"#;

#[test]
fn mixed_document_keeps_only_first_video_stream() {
    let output = probe_output_from_str(MIXED_STREAMS).expect("parse");

    assert_eq!(output.stream_index, Some(0));
    assert_eq!(output.average_frame_rate, "25/1");
    assert_eq!(output.packets.len(), 2, "audio packets leaked into the video series");

    let report = analyze_probe_output(output, &AnalysisOptions::default()).expect("report");
    assert_eq!(report.frame_count(), 2);
    assert!((report.dts_intervals_ms()[0] - 40.0).abs() < 1e-9);
    assert!((report.average_frame_duration_ms() - 40.0).abs() < 1e-9);
}

#[test]
fn video_track_selects_among_video_streams() {
    let output = probe_output_from_str_for_track(MIXED_STREAMS, Some(1)).expect("parse");

    assert_eq!(output.stream_index, Some(2));
    assert_eq!(output.average_frame_rate, "30/1");
    assert_eq!(output.packets.len(), 1);
}

#[test]
fn video_track_out_of_range_in_document() {
    match probe_output_from_str_for_track(MIXED_STREAMS, Some(2)) {
        Err(FramePaceError::VideoTrackOutOfRange {
            track_index,
            track_count,
        }) => {
            assert_eq!(track_index, 2);
            assert_eq!(track_count, 2);
        }
        other => panic!("expected VideoTrackOutOfRange, got {other:?}"),
    }
}

#[test]
fn audio_only_document_has_no_video_stream() {
    let document = r#"{
        "packets": [ { "stream_index": 0, "pts_time": "0", "dts_time": "0", "duration_time": "0.02" } ],
        "streams": [ { "index": 0, "codec_type": "audio", "avg_frame_rate": "0/0" } ]
    }"#;
    assert!(matches!(
        probe_output_from_str(document),
        Err(FramePaceError::NoVideoStream)
    ));
}

#[test]
fn malformed_packets_of_other_streams_are_ignored() {
    let document = r#"{
        "packets": [
            { "stream_index": 1, "pts_time": "garbage", "dts_time": "0", "duration_time": "0.02" },
            { "stream_index": 0, "pts_time": "0", "dts_time": "0", "duration_time": "0.04" }
        ],
        "streams": [
            { "index": 0, "codec_type": "video", "avg_frame_rate": "25/1" },
            { "index": 1, "codec_type": "audio", "avg_frame_rate": "0/0" }
        ]
    }"#;
    let output = probe_output_from_str(document).expect("parse");
    assert_eq!(output.packets.len(), 1);
}
