use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Diagnostic log written (and overwritten) on every failed conversion
pub const ERROR_LOG_FILE: &str = "ffmpeg_error_log.txt";

/// Debug log written by the tracing subscriber
pub const DEBUG_LOG_FILE: &str = "mkvconv.log";

/// Text of the diagnostic log for a failed conversion
pub fn failure_report(command: &str, output: &str) -> String {
    format!(
        "Video conversion failed:\n\nCommand:\n{}\n\nError:\n{}",
        command, output
    )
}

/// Write the failing command and its full output, replacing any previous log
pub fn write_error_log(path: &Path, command: &str, output: &str) -> Result<()> {
    std::fs::write(path, failure_report(command, output))
        .with_context(|| format!("Failed to write error log: {}", path.display()))
}

/// Route tracing output to an appended log file.
/// The dashboard owns the terminal, so nothing is printed to stdout.
pub fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))
}
