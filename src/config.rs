// Persisted user preferences

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::engine::{GpuVendor, Settings};

/// Default preferences file, relative to the working directory
pub const CONFIG_FILE: &str = "config.json";

/// Flat string preferences. Keys this program does not know about are
/// carried through load/save untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of the last file added to the queue
    #[serde(default)]
    pub last_input_dir: String,

    #[serde(default)]
    pub last_output_dir: String,

    #[serde(default)]
    pub last_ffmpeg_path: String,

    #[serde(default)]
    pub last_ffmpeg_dir: String,

    /// Vendor tag from the last GPU detection ("NVIDIA", "AMD", "Unknown", "None")
    #[serde(default)]
    pub last_gpu_type: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn parent_dir(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl Config {
    /// Remember the directory of a file added to the queue
    pub fn record_input_file(&mut self, path: &Path) {
        self.last_input_dir = parent_dir(path);
    }

    pub fn set_output_dir(&mut self, dir: &str) {
        self.last_output_dir = dir.to_string();
    }

    /// Set the transcoder executable (and remember its directory)
    pub fn set_ffmpeg_path(&mut self, path: &str) {
        self.last_ffmpeg_path = path.to_string();
        self.last_ffmpeg_dir = parent_dir(Path::new(path));
    }

    pub fn set_gpu_vendor(&mut self, vendor: GpuVendor) {
        self.last_gpu_type = vendor.as_str().to_string();
    }

    pub fn gpu_vendor(&self) -> GpuVendor {
        GpuVendor::from_tag(&self.last_gpu_type)
    }

    /// Conversion settings from the stored preferences and the detected vendor
    pub fn settings(&self, gpu_vendor: GpuVendor) -> Settings {
        Settings::new(
            self.last_output_dir.clone(),
            self.last_ffmpeg_path.clone(),
            gpu_vendor,
        )
    }

    /// Starting directory for a path prompt: the stored one, else home
    pub fn start_dir(stored: &str) -> PathBuf {
        if !stored.is_empty() {
            return PathBuf::from(stored);
        }
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Loads and saves `Config` at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(CONFIG_FILE)
    }
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Strict load: `Ok(None)` when the file is missing, an error when it
    /// cannot be read or parsed
    pub fn try_load(&self) -> Result<Option<Config>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))?;

        Ok(Some(config))
    }

    /// Load config from disk. A missing or malformed file yields empty preferences.
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                warn!("{:#}; starting with empty preferences", e);
                Config::default()
            }
        }
    }

    /// Where `move_aside` puts an unreadable config file
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Rename the current file to `backup_path`, replacing any older backup
    pub fn move_aside(&self) -> Result<PathBuf> {
        let backup = self.backup_path();
        fs::rename(&self.path, &backup).with_context(|| {
            format!(
                "Failed to move {} to {}",
                self.path.display(),
                backup.display()
            )
        })?;
        Ok(backup)
    }

    /// Load before a save. An unreadable file is moved to `backup_path` first
    /// and its location returned, so the save cannot destroy it.
    pub fn load_for_update(&self) -> Result<(Config, Option<PathBuf>)> {
        match self.try_load() {
            Ok(config) => Ok((config.unwrap_or_default(), None)),
            Err(e) => {
                warn!("{:#}; moving it aside", e);
                let backup = self.move_aside()?;
                Ok((Config::default(), Some(backup)))
            }
        }
    }

    /// Save config to disk
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        Ok(())
    }
}
