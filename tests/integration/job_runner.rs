// Tests for running a single conversion and the worker wrapper

#![cfg(unix)]

use crate::common::fake_ffmpeg::fake_ffmpeg;
use crate::common::helpers::{fake_job, touch_inputs};
use mkvconv::engine::{
    ConvertError, Encoder, ERROR_LOG_FILE, JobStatus, Worker, WorkerMessage, build_convert_cmd,
    format_cmd, run_job,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_successful_run_reports_progress_and_finishes_at_100() {
    let dir = TempDir::new().unwrap();
    let input = &touch_inputs(dir.path(), &["movie.mkv"])[0];
    let output = dir.path().join("out/movie_converted.mp4");
    let error_log = dir.path().join(ERROR_LOG_FILE);
    let mut job = fake_job(input, &output, fake_ffmpeg(), Encoder::H264Nvenc);

    let mut percents = Vec::new();
    let mut lines = Vec::new();
    run_job(&mut job, &error_log, |line, pct| {
        lines.push(line.to_string());
        if let Some(p) = pct {
            percents.push(p);
        }
    })
    .unwrap();

    assert_eq!(percents, [25.0, 50.0, 100.0]);
    assert_eq!(lines.len(), 3, "carriage returns split status lines");
    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.progress_pct, 100.0);
    assert!(output.exists(), "output directory is created");
    assert!(!error_log.exists());
}

#[test]
fn test_failed_run_writes_diagnostic_log() {
    let dir = TempDir::new().unwrap();
    let input = &touch_inputs(dir.path(), &["fail.mkv"])[0];
    let output = dir.path().join("fail_converted.mp4");
    let error_log = dir.path().join(ERROR_LOG_FILE);
    let mut job = fake_job(input, &output, fake_ffmpeg(), Encoder::H264Amf);
    let command = format_cmd(&build_convert_cmd(&job));

    let err = run_job(&mut job, &error_log, |_, _| {}).unwrap_err();

    match &err {
        ConvertError::ProcessFailed {
            command: reported,
            output,
            exit_code,
        } => {
            assert_eq!(reported, &command);
            assert_eq!(*exit_code, Some(1));
            assert!(output.contains("time=00:00:30.00"));
            assert!(output.contains("Error while processing the decoded data"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress_pct, 50.0, "progress stops where ffmpeg stopped");

    let log = fs::read_to_string(&error_log).unwrap();
    assert!(log.starts_with(&format!(
        "Video conversion failed:\n\nCommand:\n{}\n\nError:\n",
        command
    )));
    assert_eq!(log, err.to_string());
}

#[test]
fn test_worker_reports_lifecycle_and_refuses_second_job() {
    let dir = TempDir::new().unwrap();
    let inputs = touch_inputs(dir.path(), &["a.mkv", "b.mkv"]);
    let worker = Worker::new(dir.path().join(ERROR_LOG_FILE));

    let first = fake_job(
        &inputs[0],
        &dir.path().join("a_converted.mp4"),
        fake_ffmpeg(),
        Encoder::H264Nvenc,
    );
    let first_id = first.id;
    worker.spawn(first).unwrap();

    let second = fake_job(
        &inputs[1],
        &dir.path().join("b_converted.mp4"),
        fake_ffmpeg(),
        Encoder::H264Nvenc,
    );
    assert!(matches!(worker.spawn(second), Err(ConvertError::Busy)));

    let mut messages = Vec::new();
    loop {
        let msg = worker
            .receiver()
            .recv_timeout(Duration::from_secs(10))
            .expect("worker message");
        let done = msg.is_terminal();
        messages.push(msg);
        if done {
            break;
        }
    }

    assert!(messages.iter().all(|m| m.job_id() == first_id));
    match &messages[0] {
        WorkerMessage::JobStarted { command, .. } => {
            assert!(command.contains("-c:v h264_nvenc -pix_fmt yuv420p -preset fast"));
        }
        other => panic!("expected JobStarted, got {other:?}"),
    }
    assert!(matches!(
        messages.last(),
        Some(WorkerMessage::JobCompleted { .. })
    ));
    assert!(!worker.is_busy(), "busy flag clears before completion is sent");
}
