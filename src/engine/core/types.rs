use std::collections::VecDeque;
use std::path::PathBuf;
use uuid::Uuid;

use super::ffmpeg_info::parse_progress_time;
use crate::engine::hardware::Encoder;

/// One pending input file awaiting conversion
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEntry {
    pub id: Uuid,
    pub input_path: PathBuf,
}

impl QueueEntry {
    pub fn new(input_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            input_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Done,
    Failed,
}

/// A fully validated conversion, ready to hand to a worker
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub id: Uuid,
    pub entry_id: Uuid,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub encoder: Encoder,
    pub video_streams: usize,
    pub audio_streams: usize,
    pub duration_s: f64,
    pub status: JobStatus,

    // Runtime
    pub progress_pct: f64,
    pub out_time_s: f64,
}

impl ConvertJob {
    pub fn new(
        entry: &QueueEntry,
        output_path: PathBuf,
        ffmpeg_path: PathBuf,
        encoder: Encoder,
        duration_s: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_id: entry.id,
            input_path: entry.input_path.clone(),
            output_path,
            ffmpeg_path,
            encoder,
            video_streams: 0,
            audio_streams: 0,
            duration_s,
            status: JobStatus::Pending,
            progress_pct: 0.0,
            out_time_s: 0.0,
        }
    }

    pub fn with_streams(mut self, video: usize, audio: usize) -> Self {
        self.video_streams = video;
        self.audio_streams = audio;
        self
    }
}

/// Parser for the `time=` field of ffmpeg's status lines
#[derive(Debug, Default, Clone)]
pub struct ProgressParser {
    pub out_time_s: Option<f64>,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single output line. Returns true if it carried a timestamp.
    pub fn parse_line(&mut self, line: &str) -> bool {
        match parse_progress_time(line) {
            Some(t) => {
                self.out_time_s = Some(t);
                true
            }
            None => false,
        }
    }

    /// Calculate progress percentage given total duration, clamped to [0, 100]
    pub fn progress_pct(&self, duration_s: f64) -> f64 {
        match self.out_time_s {
            Some(t) if duration_s > 0.0 => (t / duration_s * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }
}

/// Maximum transcript lines kept for display
pub const TRANSCRIPT_LIMIT: usize = 2000;

/// Percentage and transcript shown for the current job.
///
/// The percentage never goes down between `reset` calls.
#[derive(Debug, Clone, Default)]
pub struct JobProgress {
    percent: f64,
    transcript: VecDeque<String>,
}

impl JobProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn transcript(&self) -> &VecDeque<String> {
        &self.transcript
    }

    /// Start of a new job: percentage back to 0, transcript kept
    pub fn reset(&mut self) {
        self.percent = 0.0;
    }

    /// Apply a progress update; values are clamped and never move backwards
    pub fn advance(&mut self, percent: f64) {
        if percent.is_nan() {
            return;
        }
        self.percent = self.percent.max(percent.clamp(0.0, 100.0));
    }

    pub fn complete(&mut self) {
        self.percent = 100.0;
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.transcript.push_back(line.into());
        while self.transcript.len() > TRANSCRIPT_LIMIT {
            self.transcript.pop_front();
        }
    }
}
