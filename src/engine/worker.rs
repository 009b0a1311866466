// Background worker running one conversion at a time

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use uuid::Uuid;

use super::core::{ConvertJob, build_convert_cmd, format_cmd, run_job};
use super::error::ConvertError;

/// Message from worker to main thread
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// Job started encoding
    JobStarted { job_id: Uuid, command: String },

    /// One line of ffmpeg output, with the new percentage if the line carried a timestamp
    Output {
        job_id: Uuid,
        line: String,
        progress_pct: Option<f64>,
    },

    /// Job completed successfully
    JobCompleted { job_id: Uuid },

    /// Job failed with error
    JobFailed { job_id: Uuid, error: String },
}

impl WorkerMessage {
    pub fn job_id(&self) -> Uuid {
        match self {
            Self::JobStarted { job_id, .. }
            | Self::Output { job_id, .. }
            | Self::JobCompleted { job_id }
            | Self::JobFailed { job_id, .. } => *job_id,
        }
    }

    /// True for the last message a job sends
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::JobCompleted { .. } | Self::JobFailed { .. })
    }
}

/// Single-slot worker: at most one ffmpeg process exists at any time
pub struct Worker {
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
    busy: Arc<AtomicBool>,
    error_log: PathBuf,
}

impl Worker {
    pub fn new(error_log: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();

        Self {
            tx,
            rx,
            busy: Arc::new(AtomicBool::new(false)),
            error_log,
        }
    }

    /// Get the receiver for worker messages
    pub fn receiver(&self) -> &Receiver<WorkerMessage> {
        &self.rx
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run `job` on a new thread. A completion message (`JobCompleted` or
    /// `JobFailed`) is always sent, after the busy flag has been cleared.
    pub fn spawn(&self, mut job: ConvertJob) -> Result<(), ConvertError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConvertError::Busy);
        }

        let tx = self.tx.clone();
        let busy = self.busy.clone();
        let error_log = self.error_log.clone();

        thread::spawn(move || {
            let job_id = job.id;
            let _ = tx.send(WorkerMessage::JobStarted {
                job_id,
                command: format_cmd(&build_convert_cmd(&job)),
            });

            let tx_progress = tx.clone();
            let result = run_job(&mut job, &error_log, |line, progress_pct| {
                let _ = tx_progress.send(WorkerMessage::Output {
                    job_id,
                    line: line.to_string(),
                    progress_pct,
                });
            });

            busy.store(false, Ordering::SeqCst);

            match result {
                Ok(()) => {
                    let _ = tx.send(WorkerMessage::JobCompleted { job_id });
                }
                Err(e) => {
                    let _ = tx.send(WorkerMessage::JobFailed {
                        job_id,
                        error: e.to_string(),
                    });
                }
            }
        });

        Ok(())
    }
}
