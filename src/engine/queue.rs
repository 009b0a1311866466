//! Conversion queue: drains entries one at a time through the worker

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use tracing::{info, warn};
use uuid::Uuid;

use super::core::{ConvertJob, QueueEntry, derive_output_path};
use super::error::ConvertError;
use super::hardware::{Encoder, GpuVendor};
use super::probe::probe_input;
use super::worker::{Worker, WorkerMessage};

/// Everything a conversion needs besides the input file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub output_dir: String,
    pub ffmpeg_path: String,
    pub gpu_vendor: GpuVendor,
}

impl Settings {
    pub fn new(
        output_dir: impl Into<String>,
        ffmpeg_path: impl Into<String>,
        gpu_vendor: GpuVendor,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            ffmpeg_path: ffmpeg_path.into(),
            gpu_vendor,
        }
    }
}

/// Result of asking the queue to start work
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A job was handed to the worker
    Started { job_id: Uuid, input_path: PathBuf },
    /// Nothing left to convert
    QueueEmpty,
    /// A job is already in flight; nothing was started
    Busy,
}

/// Totals for a headless drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub completed: usize,
    pub failed: usize,
}

/// Validate settings, probe the input and build the job for one entry
pub fn prepare_job(entry: &QueueEntry, settings: &Settings) -> Result<ConvertJob, ConvertError> {
    if settings.output_dir.trim().is_empty() {
        return Err(ConvertError::MissingOutputDir);
    }
    if settings.ffmpeg_path.trim().is_empty() {
        return Err(ConvertError::MissingFfmpeg);
    }

    let encoder = Encoder::for_vendor(settings.gpu_vendor)
        .ok_or(ConvertError::UnsupportedGpu(settings.gpu_vendor))?;

    if !entry.input_path.is_file() {
        return Err(ConvertError::InputMissing(entry.input_path.clone()));
    }

    let ffmpeg_path = PathBuf::from(settings.ffmpeg_path.trim());
    let probe = probe_input(&ffmpeg_path, &entry.input_path)?;
    if !probe.has_streams() {
        return Err(ConvertError::NoStreams(entry.input_path.clone()));
    }
    let duration = probe
        .duration
        .ok_or_else(|| ConvertError::DurationUnavailable(entry.input_path.clone()))?;

    let output_path = derive_output_path(&entry.input_path, Path::new(settings.output_dir.trim()));

    Ok(
        ConvertJob::new(entry, output_path, ffmpeg_path, encoder, duration)
            .with_streams(probe.video_streams.len(), probe.audio_streams.len()),
    )
}

/// Ordered queue of pending inputs with at most one job in flight
pub struct QueueController {
    entries: VecDeque<QueueEntry>,
    worker: Worker,
    /// (job id, entry id) of the running conversion
    in_flight: Option<(Uuid, Uuid)>,
}

impl QueueController {
    pub fn new(error_log: PathBuf) -> Self {
        Self {
            entries: VecDeque::new(),
            worker: Worker::new(error_log),
            in_flight: None,
        }
    }

    pub fn enqueue(&mut self, path: PathBuf) -> Uuid {
        let entry = QueueEntry::new(path);
        let id = entry.id;
        self.entries.push_back(entry);
        id
    }

    pub fn dequeue_front(&mut self) -> Option<QueueEntry> {
        if self.in_flight.is_some() {
            return None;
        }
        self.entries.pop_front()
    }

    /// Remove entries by position. The entry being converted is kept.
    /// Returns how many entries were removed.
    pub fn remove(&mut self, indices: &[usize]) -> usize {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let running_entry = self.in_flight.map(|(_, entry_id)| entry_id);
        let mut removed = 0;
        for index in sorted.into_iter().rev() {
            let is_running = self
                .entries
                .get(index)
                .is_some_and(|e| Some(e.id) == running_entry);
            if is_running {
                continue;
            }
            if self.entries.remove(index).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn entries(&self) -> &VecDeque<QueueEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Entry id of the job being converted
    pub fn running_entry(&self) -> Option<Uuid> {
        self.in_flight.map(|(_, entry_id)| entry_id)
    }

    pub fn receiver(&self) -> &Receiver<WorkerMessage> {
        self.worker.receiver()
    }

    /// Start converting the head of the queue.
    /// On error nothing is started and the entry stays queued.
    pub fn start(&mut self, settings: &Settings) -> Result<StartOutcome, ConvertError> {
        if self.in_flight.is_some() {
            return Ok(StartOutcome::Busy);
        }
        let Some(entry) = self.entries.front() else {
            return Ok(StartOutcome::QueueEmpty);
        };

        let job = prepare_job(entry, settings)?;
        let job_id = job.id;
        let entry_id = entry.id;
        let input_path = job.input_path.clone();

        self.worker.spawn(job)?;
        self.in_flight = Some((job_id, entry_id));
        info!(input = %input_path.display(), remaining = self.entries.len(), "Queued job started");

        Ok(StartOutcome::Started { job_id, input_path })
    }

    /// Called when the worker reports completion, successful or not.
    /// Drops the finished entry and starts the next one.
    pub fn on_job_finished(
        &mut self,
        job_id: Uuid,
        settings: &Settings,
    ) -> Result<StartOutcome, ConvertError> {
        match self.in_flight {
            Some((running, entry_id)) if running == job_id => {
                self.in_flight = None;
                self.entries.retain(|e| e.id != entry_id);
            }
            _ => {
                warn!(%job_id, "Completion for a job that is not running");
                return Ok(if self.is_busy() {
                    StartOutcome::Busy
                } else {
                    StartOutcome::QueueEmpty
                });
            }
        }

        self.start(settings)
    }

    /// Drain the whole queue on the calling thread.
    ///
    /// Every worker message is passed to `on_event`. Stops when the queue is
    /// empty or when the next entry fails validation.
    pub fn run_to_completion<F>(
        &mut self,
        settings: &Settings,
        mut on_event: F,
    ) -> Result<DrainSummary, ConvertError>
    where
        F: FnMut(&WorkerMessage),
    {
        let mut summary = DrainSummary::default();

        if self.start(settings)? == StartOutcome::QueueEmpty {
            return Ok(summary);
        }

        while let Ok(msg) = self.worker.receiver().recv() {
            on_event(&msg);

            match &msg {
                WorkerMessage::JobCompleted { .. } => summary.completed += 1,
                WorkerMessage::JobFailed { .. } => summary.failed += 1,
                _ => continue,
            }

            if self.on_job_finished(msg.job_id(), settings)? == StartOutcome::QueueEmpty {
                break;
            }
        }

        Ok(summary)
    }
}
