use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mkvconv")]
#[command(about = "Queue MKV files and convert them to MP4 on the GPU", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Preferences file (defaults to config.json in the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write debug-level entries to the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Inputs and overrides shared by `convert` and `dry-run`
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// MKV files or directories to scan for MKV files
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Directory for converted files (saved to config)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Path to the ffmpeg executable (saved to config)
    #[arg(long, value_name = "FILE")]
    pub ffmpeg: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the given files one after another, then exit
    Convert(ConvertArgs),

    /// Show ffmpeg commands without executing (dry run)
    DryRun(ConvertArgs),

    /// List the streams and duration ffmpeg reports for a file
    Probe {
        /// Path to the video file
        file: PathBuf,

        /// Path to the ffmpeg executable (defaults to the configured one)
        #[arg(long, value_name = "FILE")]
        ffmpeg: Option<String>,
    },

    /// Detect the GPU and the encoder it selects
    Gpu,

    /// Check that ffmpeg can be run
    CheckFfmpeg {
        /// Path to the ffmpeg executable (defaults to the configured one)
        #[arg(long, value_name = "FILE")]
        ffmpeg: Option<String>,
    },

    /// Show config status and location, or create an empty config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
