mod ffmpeg_cmd;
mod ffmpeg_info;
mod log;
mod scan;
mod types;

pub use ffmpeg_cmd::{
    ENCODER_PRESET, build_convert_cmd, for_each_line, format_cmd, new_command, run_job,
};
pub use ffmpeg_info::{ffmpeg_version, parse_duration, parse_hms, parse_progress_time};
pub use log::{
    DEBUG_LOG_FILE, ERROR_LOG_FILE, failure_report, init_logging, write_error_log,
};
pub use scan::{
    INPUT_EXTENSION, OUTPUT_SUFFIX, derive_output_path, expand_inputs, is_mkv_file, scan,
    scan_streaming,
};
pub use types::{
    ConvertJob, JobProgress, JobStatus, ProgressParser, QueueEntry, TRANSCRIPT_LIMIT,
};
