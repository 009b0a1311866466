// Tests for probing inputs through the fake ffmpeg

#![cfg(unix)]

use crate::common::fake_ffmpeg::fake_ffmpeg;
use crate::common::helpers::touch_inputs;
use mkvconv::engine::{ProbeError, ffmpeg_version, probe_input};
use tempfile::TempDir;

#[test]
fn test_probe_lists_streams_and_duration() {
    let dir = TempDir::new().unwrap();
    let input = &touch_inputs(dir.path(), &["movie.mkv"])[0];

    let info = probe_input(fake_ffmpeg(), input).unwrap();

    assert_eq!(info.video_streams.len(), 1);
    assert_eq!(info.audio_streams.len(), 2);
    assert!(info.video_streams[0].contains("Video: h264"));
    assert!(
        info.audio_streams.iter().all(|s| s.contains("Audio")),
        "subtitle streams are not audio"
    );
    assert_eq!(info.duration, Some(60.0));
}

#[test]
fn test_probe_without_duration() {
    let dir = TempDir::new().unwrap();
    let input = &touch_inputs(dir.path(), &["noduration.mkv"])[0];

    let info = probe_input(fake_ffmpeg(), input).unwrap();
    assert!(info.has_streams());
    assert_eq!(info.duration, None);
}

#[test]
fn test_probe_unreadable_input_has_no_streams() {
    let dir = TempDir::new().unwrap();
    let input = &touch_inputs(dir.path(), &["nostreams.mkv"])[0];

    let info = probe_input(fake_ffmpeg(), input).unwrap();
    assert!(!info.has_streams());
}

#[test]
fn test_probe_launch_failure_is_typed() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-ffmpeg");

    let err = probe_input(&missing, &dir.path().join("movie.mkv")).unwrap_err();
    assert!(matches!(err, ProbeError::Launch { .. }));
}

#[test]
fn test_ffmpeg_version_reads_first_line() {
    let version = ffmpeg_version(fake_ffmpeg()).unwrap();
    assert!(version.starts_with("ffmpeg version 6.1-fake"));
}
