use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use super::ffmpeg_cmd::new_command;

static DURATION_RE: OnceLock<Regex> = OnceLock::new();
static TIME_RE: OnceLock<Regex> = OnceLock::new();

fn duration_re() -> &'static Regex {
    DURATION_RE.get_or_init(|| {
        Regex::new(r"Duration: (\d+:\d+:\d+\.\d+)").expect("valid duration regex")
    })
}

fn time_re() -> &'static Regex {
    TIME_RE.get_or_init(|| Regex::new(r"time=(\d+:\d+:\d+\.\d+)").expect("valid time regex"))
}

/// Convert "HH:MM:SS.ms" to seconds
pub fn parse_hms(value: &str) -> Option<f64> {
    let mut parts = value.trim().split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Find the first `Duration: H:MM:SS.ms` in ffmpeg's diagnostic output
pub fn parse_duration(text: &str) -> Option<f64> {
    parse_hms(duration_re().captures(text)?.get(1)?.as_str())
}

/// Extract the `time=H:MM:SS.ms` position from an ffmpeg status line
pub fn parse_progress_time(line: &str) -> Option<f64> {
    parse_hms(time_re().captures(line)?.get(1)?.as_str())
}

/// Check that the given ffmpeg executable runs and return its version line
pub fn ffmpeg_version(ffmpeg: &Path) -> Result<String> {
    let output = new_command(ffmpeg)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {}", ffmpeg.display()))?;

    if !output.status.success() {
        anyhow::bail!("ffmpeg command failed with status: {}", output.status);
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("Unknown version");

    Ok(first_line.to_string())
}
