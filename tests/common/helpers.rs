use mkvconv::engine::{ConvertJob, Encoder, QueueEntry};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Program followed by each argument, lossily decoded
pub fn cmd_words(cmd: &Command) -> Vec<String> {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|word| word.to_string_lossy().into_owned())
        .collect()
}

/// Space-joined command line, unquoted, for snapshots
pub fn cmd_to_string(cmd: &Command) -> String {
    cmd_words(cmd).join(" ")
}

/// Create empty input files; the fake ffmpeg never reads them
pub fn touch_inputs(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, b"").expect("create input file");
            path
        })
        .collect()
}

/// Job for `input` with the stream layout the fake ffmpeg reports
pub fn fake_job(input: &Path, output: &Path, ffmpeg: &Path, encoder: Encoder) -> ConvertJob {
    let entry = QueueEntry::new(input.to_path_buf());
    ConvertJob::new(
        &entry,
        output.to_path_buf(),
        ffmpeg.to_path_buf(),
        encoder,
        60.0,
    )
    .with_streams(1, 2)
}
