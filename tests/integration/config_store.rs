// Tests for preference persistence

use mkvconv::config::{Config, ConfigStore};
use mkvconv::engine::GpuVendor;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.json"));

    let mut config = Config::default();
    config.record_input_file(std::path::Path::new("/videos/tv/ep1.mkv"));
    config.set_output_dir("/srv/converted");
    config.set_ffmpeg_path("/opt/ffmpeg/bin/ffmpeg");
    config.set_gpu_vendor(GpuVendor::Amd);

    store.save(&config).unwrap();
    assert_eq!(store.load(), config);
}

#[test]
fn test_file_is_flat_json_object_with_known_keys() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("config.json"));

    let mut config = Config::default();
    config.set_gpu_vendor(GpuVendor::Nvidia);
    store.save(&config).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    let object = raw.as_object().expect("top level is an object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(
        keys,
        [
            "last_ffmpeg_dir",
            "last_ffmpeg_path",
            "last_gpu_type",
            "last_input_dir",
            "last_output_dir"
        ]
    );
    assert_eq!(object["last_gpu_type"], "NVIDIA");
}

#[test]
fn test_unknown_keys_pass_through() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"last_output_dir": "/out", "window_geometry": "800x600", "recent": [1, 2]}"#,
    )
    .unwrap();

    let store = ConfigStore::new(&path);
    let mut config = store.load();
    assert_eq!(config.last_output_dir, "/out");

    config.set_output_dir("/elsewhere");
    store.save(&config).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["window_geometry"], "800x600");
    assert_eq!(raw["recent"], serde_json::json!([1, 2]));
    assert_eq!(raw["last_output_dir"], "/elsewhere");
}

#[test]
fn test_save_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("nested/prefs/config.json"));

    store.save(&Config::default()).unwrap();
    assert!(store.exists());
}

#[test]
fn test_malformed_file_is_not_overwritten_by_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "[not, an, object").unwrap();

    let store = ConfigStore::new(&path);
    assert_eq!(store.load(), Config::default());
    assert_eq!(fs::read_to_string(&path).unwrap(), "[not, an, object");
}
