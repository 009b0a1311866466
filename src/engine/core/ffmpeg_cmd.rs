use super::log::write_error_log;
use super::types::{ConvertJob, JobStatus, ProgressParser};
use crate::engine::error::ConvertError;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Fixed speed/quality preset passed to the hardware encoder
pub const ENCODER_PRESET: &str = "fast";

/// Create a command for a helper process.
/// On Windows the child gets no console window of its own.
pub fn new_command<S: AsRef<OsStr>>(program: S) -> Command {
    #[allow(unused_mut)]
    let mut cmd = Command::new(program);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    cmd
}

/// Build the transcode command:
/// `-y -i <input> <video maps> <audio maps> -c:v <encoder> <options> -preset fast <output>`
pub fn build_convert_cmd(job: &ConvertJob) -> Command {
    let mut cmd = new_command(&job.ffmpeg_path);

    // Existing outputs are overwritten without asking
    cmd.arg("-y");
    cmd.arg("-i").arg(&job.input_path);

    // All video streams first, then all audio streams
    for i in 0..job.video_streams {
        cmd.arg("-map").arg(format!("0:v:{}", i));
    }
    for i in 0..job.audio_streams {
        cmd.arg("-map").arg(format!("0:a:{}", i));
    }

    cmd.arg("-c:v").arg(job.encoder.ffmpeg_name());
    cmd.args(job.encoder.extra_args());
    cmd.arg("-preset").arg(ENCODER_PRESET);

    cmd.arg(&job.output_path);
    cmd
}

/// Format a command as a copy-pasteable shell line (display only)
pub fn format_cmd(cmd: &Command) -> String {
    let parts: Vec<String> = std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().to_string())
        .collect();

    shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
}

/// Call `on_line` for every line of `reader`.
///
/// Lines end at `\n` or `\r`: ffmpeg rewrites its status line in place with
/// carriage returns. Empty lines are dropped.
pub fn for_each_line<R: Read>(reader: R, mut on_line: impl FnMut(String)) {
    let mut reader = BufReader::new(reader);
    let mut current: Vec<u8> = Vec::new();

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        };
        if chunk.is_empty() {
            break;
        }

        let len = chunk.len();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                if !current.is_empty() {
                    on_line(String::from_utf8_lossy(&current).to_string());
                    current.clear();
                }
            } else {
                current.push(byte);
            }
        }
        reader.consume(len);
    }

    if !current.is_empty() {
        on_line(String::from_utf8_lossy(&current).to_string());
    }
}

fn spawn_line_reader<R>(reader: R, tx: Sender<String>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for_each_line(reader, |line| {
            let _ = tx.send(line);
        });
    })
}

/// Run one conversion to completion.
///
/// `on_progress` receives every output line together with the updated
/// percentage when that line carried a `time=` position. On a non-zero exit
/// the full transcript is written to `error_log` (overwriting it) and
/// `ConvertError::ProcessFailed` is returned.
pub fn run_job<F>(job: &mut ConvertJob, error_log: &Path, mut on_progress: F) -> Result<(), ConvertError>
where
    F: FnMut(&str, Option<f64>),
{
    job.status = JobStatus::Running;
    job.progress_pct = 0.0;
    job.out_time_s = 0.0;

    // Create output directory if it doesn't exist
    if let Some(parent) = job.output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConvertError::io("Failed to create output directory", e))?;
        }
    }

    let mut cmd = build_convert_cmd(job);
    let command = format_cmd(&cmd);
    info!(input = %job.input_path.display(), "Starting conversion");
    debug!("ffmpeg command: {}", command);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            let output = format!("Failed to start ffmpeg: {}\n", e);
            return Err(fail(job, error_log, command, output, None));
        }
    };

    // Merge stdout and stderr into one line stream
    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_line_reader(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_line_reader(stderr, tx.clone()));
    }
    drop(tx);

    let mut parser = ProgressParser::new();
    let mut transcript = String::new();

    for line in rx {
        transcript.push_str(&line);
        transcript.push('\n');

        let percent = if parser.parse_line(&line) {
            job.out_time_s = parser.out_time_s.unwrap_or(job.out_time_s);
            job.progress_pct = job.progress_pct.max(parser.progress_pct(job.duration_s));
            Some(job.progress_pct)
        } else {
            None
        };

        on_progress(&line, percent);
    }

    for reader in readers {
        let _ = reader.join();
    }

    let status = match child.wait() {
        Ok(status) => status,
        Err(e) => {
            transcript.push_str(&format!("Failed to wait for ffmpeg: {}\n", e));
            return Err(fail(job, error_log, command, transcript, None));
        }
    };

    if !status.success() {
        return Err(fail(job, error_log, command, transcript, status.code()));
    }

    job.status = JobStatus::Done;
    job.progress_pct = 100.0;
    info!(output = %job.output_path.display(), "Conversion finished");
    Ok(())
}

fn fail(
    job: &mut ConvertJob,
    error_log: &Path,
    command: String,
    output: String,
    exit_code: Option<i32>,
) -> ConvertError {
    job.status = JobStatus::Failed;
    warn!(input = %job.input_path.display(), ?exit_code, "Conversion failed");

    if let Err(e) = write_error_log(error_log, &command, &output) {
        warn!("{:#}", e);
    }

    ConvertError::ProcessFailed {
        command,
        output,
        exit_code,
    }
}
