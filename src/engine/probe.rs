// Input probing using ffmpeg's diagnostic output

use std::path::Path;
use thiserror::Error;

use super::core::{new_command, parse_duration};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to run {program} to probe {input}: {source}")]
    Launch {
        program: String,
        input: String,
        #[source]
        source: std::io::Error,
    },
}

/// Streams and duration found in the input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeInfo {
    pub video_streams: Vec<String>,
    pub audio_streams: Vec<String>,
    pub duration: Option<f64>,
}

impl ProbeInfo {
    pub fn has_streams(&self) -> bool {
        !self.video_streams.is_empty() || !self.audio_streams.is_empty()
    }
}

/// Run `<ffmpeg> -hide_banner -i <input>` and parse what it prints.
///
/// ffmpeg exits non-zero here because no output is given; only a failure to
/// launch it counts as an error.
pub fn probe_input(ffmpeg: &Path, input: &Path) -> Result<ProbeInfo, ProbeError> {
    let output = new_command(ffmpeg)
        .arg("-hide_banner")
        .arg("-i")
        .arg(input)
        .output()
        .map_err(|source| ProbeError::Launch {
            program: ffmpeg.display().to_string(),
            input: input.display().to_string(),
            source,
        })?;

    Ok(parse_probe_output(&String::from_utf8_lossy(&output.stderr)))
}

/// Parse stream descriptor lines and the duration from ffmpeg's stderr
pub fn parse_probe_output(stderr: &str) -> ProbeInfo {
    let mut info = ProbeInfo {
        duration: parse_duration(stderr),
        ..ProbeInfo::default()
    };

    for line in stderr.lines().filter(|l| l.contains("Stream #")) {
        let descriptor = line.trim().to_string();
        if descriptor.contains("Video") {
            info.video_streams.push(descriptor);
        } else if descriptor.contains("Audio") {
            info.audio_streams.push(descriptor);
        }
    }

    info
}
