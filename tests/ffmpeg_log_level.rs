//! FFmpeg log level parsing tests.

use framepace::{FfmpegLogLevel, FramePaceError, set_ffmpeg_log_level};

#[test]
fn every_documented_name_parses() {
    for name in FfmpegLogLevel::NAMES {
        assert!(name.parse::<FfmpegLogLevel>().is_ok(), "{name} should parse");
    }
}

#[test]
fn parsing_ignores_case_and_accepts_warn() {
    assert_eq!("ERROR".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Error);
    assert_eq!(" warn ".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Warning);
}

#[test]
fn unknown_level_lists_the_choices() {
    match "loud".parse::<FfmpegLogLevel>() {
        Err(FramePaceError::Ffmpeg(message)) => {
            assert!(message.contains("loud"), "{message}");
            assert!(message.contains("quiet"), "{message}");
        }
        other => panic!("expected Ffmpeg error, got {other:?}"),
    }
}

#[test]
fn setting_the_level_does_not_panic() {
    set_ffmpeg_log_level(FfmpegLogLevel::Error);
    set_ffmpeg_log_level(FfmpegLogLevel::Warning);
}
