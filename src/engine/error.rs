//! Errors surfaced to the user when a conversion cannot start or fails

use std::path::PathBuf;
use thiserror::Error;

use super::hardware::GpuVendor;
use super::probe::ProbeError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Please select an output directory.")]
    MissingOutputDir,

    #[error("Please select the FFmpeg executable.")]
    MissingFfmpeg,

    #[error("Input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Unsupported GPU type detected: {0}.")]
    UnsupportedGpu(GpuVendor),

    #[error("No supported video or audio streams found in {}.", .0.display())]
    NoStreams(PathBuf),

    #[error("Could not get video duration for {}.", .0.display())]
    DurationUnavailable(PathBuf),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Display text is exactly what lands in the diagnostic log
    #[error("Video conversion failed:\n\nCommand:\n{command}\n\nError:\n{output}")]
    ProcessFailed {
        command: String,
        output: String,
        exit_code: Option<i32>,
    },

    #[error("A conversion is already running.")]
    Busy,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
