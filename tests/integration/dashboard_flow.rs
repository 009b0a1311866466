// Dashboard state driven through the same calls the key handlers make

#![cfg(unix)]

use crate::common::fake_ffmpeg::{fake_ffmpeg, transcoded_inputs};
use crate::common::helpers::touch_inputs;
use mkvconv::config::ConfigStore;
use mkvconv::engine::{ERROR_LOG_FILE, GpuInfo, GpuVendor};
use mkvconv::ui::AppState;
use mkvconv::ui::state::{ModalKind, PromptKind};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn fake_amd() -> GpuInfo {
    GpuInfo {
        vendor: GpuVendor::Amd,
        name: "Radeon RX 6800".to_string(),
    }
}

fn ready_state(dir: &TempDir) -> AppState {
    let mut state = AppState::with_error_log(
        ConfigStore::new(dir.path().join("config.json")),
        dir.path().join(ERROR_LOG_FILE),
    );
    state.gpu_detector = fake_amd;

    let out = dir.path().join("out");
    state.set_output_dir(&out.display().to_string());
    state.set_ffmpeg_path(&fake_ffmpeg().display().to_string());
    state
}

/// Feed worker messages back into the state until the queue is drained
fn pump_until_idle(state: &mut AppState) {
    while state.queue.is_busy() {
        let msg = state
            .queue
            .receiver()
            .recv_timeout(Duration::from_secs(10))
            .expect("worker message");
        state.on_worker_message(msg);
    }
}

#[test]
fn test_setting_ffmpeg_path_detects_gpu_and_persists() {
    let dir = TempDir::new().unwrap();
    let state = ready_state(&dir);

    assert_eq!(state.gpu, fake_amd());
    let saved = ConfigStore::new(dir.path().join("config.json")).load();
    assert_eq!(saved.last_gpu_type, "AMD");
    assert_eq!(saved.last_ffmpeg_path, fake_ffmpeg().display().to_string());
}

#[test]
fn test_add_folder_and_drain() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("in");
    fs::create_dir_all(&input_dir).unwrap();
    let inputs = touch_inputs(&input_dir, &["a.mkv", "b.mkv"]);

    let mut state = ready_state(&dir);
    state.open_prompt(PromptKind::AddInput);
    state.prompt.as_mut().unwrap().buffer = input_dir.display().to_string();
    state.submit_prompt();
    assert_eq!(state.queue.len(), 2);

    state.start_conversion();
    assert!(state.queue.is_busy());
    pump_until_idle(&mut state);

    assert!(state.queue.is_empty());
    assert!(state.modals.is_empty());
    assert_eq!(state.dashboard.progress.percent(), 100.0);
    assert_eq!(
        state.dashboard.status,
        "Video conversion completed successfully!"
    );
    assert!(
        state
            .dashboard
            .progress
            .transcript()
            .iter()
            .any(|l| l.ends_with("Converting b.mkv..."))
    );
    assert_eq!(
        transcoded_inputs(&dir.path().join("out")),
        [inputs[0].display().to_string(), inputs[1].display().to_string()]
    );
}

#[test]
fn test_failure_shows_error_and_continues() {
    let dir = TempDir::new().unwrap();
    let input_dir = dir.path().join("in");
    fs::create_dir_all(&input_dir).unwrap();
    let inputs = touch_inputs(&input_dir, &["1_fail.mkv", "2_ok.mkv"]);

    let mut state = ready_state(&dir);
    state.add_input(&input_dir);
    state.start_conversion();
    pump_until_idle(&mut state);

    assert!(state.queue.is_empty());
    assert_eq!(state.modals.len(), 1);
    let modal = &state.modals[0];
    assert_eq!(modal.kind, ModalKind::Error);
    assert!(modal.message.starts_with("Video conversion failed:\n\nCommand:\n"));

    assert!(dir.path().join(ERROR_LOG_FILE).exists());
    assert_eq!(
        transcoded_inputs(&dir.path().join("out")),
        [inputs[1].display().to_string()]
    );
}
