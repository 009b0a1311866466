// Tests for draining the queue end to end

#![cfg(unix)]

use crate::common::fake_ffmpeg::{fake_ffmpeg, transcoded_inputs};
use crate::common::helpers::touch_inputs;
use mkvconv::engine::{
    ConvertError, DrainSummary, ERROR_LOG_FILE, GpuVendor, QueueController, Settings,
    StartOutcome, WorkerMessage,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn settings(output_dir: &Path, vendor: GpuVendor) -> Settings {
    Settings::new(
        output_dir.display().to_string(),
        fake_ffmpeg().display().to_string(),
        vendor,
    )
}

fn names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}

#[test]
fn test_drain_converts_every_entry_once_in_order() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let inputs = touch_inputs(dir.path(), &["one.mkv", "two.mkv", "three.mkv"]);

    let mut queue = QueueController::new(dir.path().join(ERROR_LOG_FILE));
    for input in &inputs {
        queue.enqueue(input.clone());
    }

    let mut started = 0;
    let summary = queue
        .run_to_completion(&settings(&out, GpuVendor::Nvidia), |msg| {
            if matches!(msg, WorkerMessage::JobStarted { .. }) {
                started += 1;
            }
        })
        .unwrap();

    assert_eq!(
        summary,
        DrainSummary {
            completed: 3,
            failed: 0
        }
    );
    assert_eq!(started, 3);
    assert!(queue.is_empty());
    assert!(!queue.is_busy());
    assert_eq!(transcoded_inputs(&out), names(&inputs));
    for stem in ["one", "two", "three"] {
        assert!(out.join(format!("{}_converted.mp4", stem)).exists());
    }
}

#[test]
fn test_failed_job_is_logged_and_queue_advances() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let error_log = dir.path().join(ERROR_LOG_FILE);
    let inputs = touch_inputs(dir.path(), &["a.mkv", "fail.mkv", "c.mkv"]);

    let mut queue = QueueController::new(error_log.clone());
    for input in &inputs {
        queue.enqueue(input.clone());
    }

    let summary = queue
        .run_to_completion(&settings(&out, GpuVendor::Amd), |_| {})
        .unwrap();

    assert_eq!(summary.completed, 2);
    assert_eq!(summary.failed, 1);
    assert!(queue.is_empty(), "the failed entry is removed too");
    assert_eq!(
        transcoded_inputs(&out),
        [inputs[0].display().to_string(), inputs[2].display().to_string()]
    );

    let log = fs::read_to_string(&error_log).unwrap();
    assert!(log.contains("-c:v h264_amf -preset fast"));
    assert!(log.contains(&inputs[1].display().to_string()));
    assert!(log.contains("Error while processing the decoded data"));
}

#[test]
fn test_drain_stops_when_next_entry_fails_validation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let inputs = touch_inputs(dir.path(), &["first.mkv", "noduration.mkv", "last.mkv"]);

    let mut queue = QueueController::new(dir.path().join(ERROR_LOG_FILE));
    for input in &inputs {
        queue.enqueue(input.clone());
    }

    let err = queue
        .run_to_completion(&settings(&out, GpuVendor::Nvidia), |_| {})
        .unwrap_err();

    assert!(matches!(err, ConvertError::DurationUnavailable(ref p) if p == &inputs[1]));
    assert_eq!(queue.len(), 2, "entry that failed validation stays queued");
    assert!(!queue.is_busy());
    assert_eq!(transcoded_inputs(&out), [inputs[0].display().to_string()]);
}

#[test]
fn test_input_without_streams_is_refused() {
    let dir = TempDir::new().unwrap();
    let inputs = touch_inputs(dir.path(), &["nostreams.mkv"]);

    let mut queue = QueueController::new(dir.path().join(ERROR_LOG_FILE));
    queue.enqueue(inputs[0].clone());

    let err = queue
        .start(&settings(dir.path(), GpuVendor::Nvidia))
        .unwrap_err();
    assert!(matches!(err, ConvertError::NoStreams(_)));
    assert!(
        err.to_string()
            .starts_with("No supported video or audio streams found in ")
    );
}

#[test]
fn test_running_entry_cannot_be_removed() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let inputs = touch_inputs(dir.path(), &["a.mkv", "b.mkv"]);

    let mut queue = QueueController::new(dir.path().join(ERROR_LOG_FILE));
    for input in &inputs {
        queue.enqueue(input.clone());
    }

    let settings = settings(&out, GpuVendor::Nvidia);
    let outcome = queue.start(&settings).unwrap();
    assert!(matches!(outcome, StartOutcome::Started { .. }));
    assert_eq!(queue.start(&settings).unwrap(), StartOutcome::Busy);
    assert!(queue.dequeue_front().is_none());

    assert_eq!(queue.remove(&[0, 1]), 1);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.entries()[0].input_path, inputs[0]);

    // Let the running job finish so the drain ends cleanly
    while let Ok(msg) = queue.receiver().recv() {
        if msg.is_terminal() {
            let next = queue.on_job_finished(msg.job_id(), &settings).unwrap();
            assert_eq!(next, StartOutcome::QueueEmpty);
            break;
        }
    }
    assert!(queue.is_empty());
}
