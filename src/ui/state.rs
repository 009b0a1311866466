// Application state management

use crate::config::{Config, ConfigStore};
use crate::engine::{
    self, ERROR_LOG_FILE, GpuInfo, JobProgress, QueueController, Settings, StartOutcome,
    WorkerMessage,
};
use chrono::Local;
use ratatui::widgets::TableState;
use std::collections::{BTreeSet, VecDeque};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Which preference a path prompt edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddInput,
    OutputDir,
    FfmpegPath,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AddInput => " Add MKV file or folder ",
            Self::OutputDir => " Output directory ",
            Self::FfmpegPath => " FFmpeg executable ",
        }
    }
}

/// Single-line path entry
#[derive(Debug, Clone)]
pub struct PathPrompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl PathPrompt {
    pub fn new(kind: PromptKind, initial: String) -> Self {
        Self {
            kind,
            buffer: initial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Error,
    Info,
}

/// Blocking message shown over the dashboard until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct MessageModalState {
    pub kind: ModalKind,
    pub message: String,
}

/// State for the quit confirmation modal
#[derive(Debug, Clone)]
pub struct QuitConfirmationState {
    /// Input being converted when quit was requested
    pub running_input: Option<String>,
}

pub struct DashboardState {
    pub table_state: TableState,
    /// Rows marked for removal (multi-select)
    pub marked: BTreeSet<usize>,
    pub progress: JobProgress,
    /// Status line under the progress bar
    pub status: String,
    pub current_input: Option<PathBuf>,
    /// Set when the last job of the queue failed
    pub last_failed: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            table_state,
            marked: BTreeSet::new(),
            progress: JobProgress::new(),
            status: String::new(),
            current_input: None,
            last_failed: false,
        }
    }
}

pub struct AppState {
    pub dashboard: DashboardState,
    pub config: Config,
    pub store: ConfigStore,
    pub queue: QueueController,
    pub gpu: GpuInfo,
    pub gpu_detector: fn() -> GpuInfo,
    pub prompt: Option<PathPrompt>,
    pub modals: VecDeque<MessageModalState>,
    pub quit_confirmation: Option<QuitConfirmationState>,
    /// The config file failed to parse at startup and has not been replaced yet
    pub config_unreadable: bool,
}

impl AppState {
    /// State with preferences loaded from `store`. No GPU detection happens here.
    pub fn new(store: ConfigStore) -> Self {
        Self::with_error_log(store, PathBuf::from(ERROR_LOG_FILE))
    }

    pub fn with_error_log(store: ConfigStore, error_log: PathBuf) -> Self {
        let (config, config_unreadable) = match store.try_load() {
            Ok(config) => (config.unwrap_or_default(), false),
            Err(e) => {
                warn!("{:#}; starting with empty preferences", e);
                (Config::default(), true)
            }
        };

        Self {
            dashboard: DashboardState::default(),
            config,
            store,
            queue: QueueController::new(error_log),
            gpu: GpuInfo::none(),
            gpu_detector: engine::detect_gpu,
            prompt: None,
            modals: VecDeque::new(),
            quit_confirmation: None,
            config_unreadable,
        }
    }

    pub fn settings(&self) -> Settings {
        self.config.settings(self.gpu.vendor)
    }

    fn persist(&mut self) {
        if self.config_unreadable && !self.store.exists() {
            self.config_unreadable = false;
        }
        if self.config_unreadable {
            match self.store.move_aside() {
                Ok(backup) => {
                    self.config_unreadable = false;
                    let message = format!(
                        "{} could not be read and was moved to {}",
                        self.store.path().display(),
                        backup.display()
                    );
                    self.show_info(message);
                }
                Err(e) => {
                    warn!("{:#}", e);
                    self.show_error(format!("Preferences not saved: {:#}", e));
                    return;
                }
            }
        }
        if let Err(e) = self.store.save(&self.config) {
            warn!("{:#}", e);
            self.show_error(format!("Failed to save preferences: {:#}", e));
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.modals.push_back(MessageModalState {
            kind: ModalKind::Error,
            message: message.into(),
        });
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.modals.push_back(MessageModalState {
            kind: ModalKind::Info,
            message: message.into(),
        });
    }

    pub fn dismiss_modal(&mut self) {
        self.modals.pop_front();
    }

    /// Update the status line and log it to the transcript with a timestamp
    pub fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        self.dashboard.progress.push_line(format!(
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            status
        ));
        self.dashboard.status = status;
    }

    // GPU

    pub fn redetect_gpu(&mut self) {
        let gpu = (self.gpu_detector)();
        self.apply_gpu(gpu);
    }

    pub fn apply_gpu(&mut self, gpu: GpuInfo) {
        info!(gpu = %gpu.label(), "GPU selected");
        self.config.set_gpu_vendor(gpu.vendor);
        self.gpu = gpu;
        // Detection alone never replaces an unreadable file
        if !self.config_unreadable {
            self.persist();
        }
    }

    // Preferences

    pub fn set_output_dir(&mut self, dir: &str) {
        self.config.set_output_dir(dir.trim());
        self.persist();
    }

    /// Store the ffmpeg path and re-run GPU detection
    pub fn set_ffmpeg_path(&mut self, path: &str) {
        self.config.set_ffmpeg_path(path.trim());
        self.persist();
        self.redetect_gpu();
    }

    // Queue

    /// Add a `.mkv` file, or every `.mkv` file under a directory
    pub fn add_input(&mut self, path: &Path) {
        let files = match engine::expand_inputs(&[path.to_path_buf()]) {
            Ok(files) => files,
            Err(e) => {
                self.show_error(format!("{:#}", e));
                return;
            }
        };

        if files.is_empty() {
            self.show_info(format!("No MKV files found in {}", path.display()));
            return;
        }

        let select_first = self.queue.is_empty();
        self.config.record_input_file(&files[0]);
        let count = files.len();
        for file in files {
            self.queue.enqueue(file);
        }
        if select_first {
            self.dashboard.table_state.select(Some(0));
        }
        self.persist();
        self.set_status(format!("Added {} file(s) to the queue", count));
    }

    pub fn select_next(&mut self) {
        let len = self.queue.len();
        if let Some(i) = self.dashboard.table_state.selected() {
            if len > 0 && i < len - 1 {
                self.dashboard.table_state.select(Some(i + 1));
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(i) = self.dashboard.table_state.selected() {
            if i > 0 {
                self.dashboard.table_state.select(Some(i - 1));
            }
        }
    }

    /// Mark or unmark the highlighted row
    pub fn toggle_mark(&mut self) {
        let Some(i) = self.dashboard.table_state.selected() else {
            return;
        };
        if i >= self.queue.len() {
            return;
        }
        if !self.dashboard.marked.remove(&i) {
            self.dashboard.marked.insert(i);
        }
    }

    /// Remove the marked rows, or the highlighted row when nothing is marked
    pub fn remove_marked(&mut self) {
        let indices: Vec<usize> = if self.dashboard.marked.is_empty() {
            self.dashboard.table_state.selected().into_iter().collect()
        } else {
            self.dashboard.marked.iter().copied().collect()
        };

        let requested = indices.iter().filter(|&&i| i < self.queue.len()).count();
        let removed = self.queue.remove(&indices);
        self.dashboard.marked.clear();

        let len = self.queue.len();
        if let Some(i) = self.dashboard.table_state.selected() {
            if len == 0 {
                self.dashboard.table_state.select(Some(0));
            } else if i >= len {
                self.dashboard.table_state.select(Some(len - 1));
            }
        }

        if removed < requested {
            self.set_status("The file being converted cannot be removed");
        } else if removed > 0 {
            self.set_status(format!("Removed {} file(s) from the queue", removed));
        }
    }

    fn handle_start_outcome(&mut self, outcome: Result<StartOutcome, engine::ConvertError>) {
        match outcome {
            Ok(StartOutcome::Started { input_path, .. }) => {
                self.dashboard.progress.reset();
                self.dashboard.last_failed = false;
                let name = input_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| input_path.display().to_string());
                self.dashboard.current_input = Some(input_path);
                self.set_status(format!("Converting {}...", name));
            }
            Ok(StartOutcome::QueueEmpty) => {
                self.dashboard.current_input = None;
            }
            Ok(StartOutcome::Busy) => {}
            Err(e) => {
                self.dashboard.current_input = None;
                self.show_error(e.to_string());
            }
        }
    }

    /// Start draining the queue
    pub fn start_conversion(&mut self) {
        if self.queue.is_busy() {
            self.set_status("A conversion is already running");
            return;
        }
        if self.queue.is_empty() {
            self.show_info("No videos in the queue to convert.");
            return;
        }

        let settings = self.settings();
        let outcome = self.queue.start(&settings);
        self.handle_start_outcome(outcome);
    }

    pub fn on_worker_message(&mut self, msg: WorkerMessage) {
        match msg {
            WorkerMessage::JobStarted { command, .. } => {
                self.dashboard.progress.push_line(command);
            }
            WorkerMessage::Output {
                line, progress_pct, ..
            } => {
                self.dashboard.progress.push_line(line);
                if let Some(pct) = progress_pct {
                    self.dashboard.progress.advance(pct);
                }
            }
            WorkerMessage::JobCompleted { job_id } => {
                self.dashboard.progress.complete();
                self.set_status("Video conversion completed successfully!");
                self.finish_job(job_id);
            }
            WorkerMessage::JobFailed { job_id, error } => {
                self.dashboard.last_failed = true;
                self.set_status(format!("Video conversion failed (see {})", ERROR_LOG_FILE));
                self.show_error(error);
                self.finish_job(job_id);
            }
        }
    }

    fn finish_job(&mut self, job_id: Uuid) {
        // Marks refer to row positions, which shift when the head is dropped
        self.dashboard.marked.clear();

        let settings = self.settings();
        let outcome = self.queue.on_job_finished(job_id, &settings);
        self.handle_start_outcome(outcome);

        let len = self.queue.len();
        if let Some(i) = self.dashboard.table_state.selected() {
            if len > 0 && i >= len {
                self.dashboard.table_state.select(Some(len - 1));
            }
        }
    }

    // Prompts

    pub fn open_prompt(&mut self, kind: PromptKind) {
        let initial = match kind {
            PromptKind::AddInput => dir_with_separator(&Config::start_dir(&self.config.last_input_dir)),
            PromptKind::OutputDir => {
                if self.config.last_output_dir.is_empty() {
                    dir_with_separator(&Config::start_dir(""))
                } else {
                    self.config.last_output_dir.clone()
                }
            }
            PromptKind::FfmpegPath => {
                if self.config.last_ffmpeg_path.is_empty() {
                    dir_with_separator(&Config::start_dir(&self.config.last_ffmpeg_dir))
                } else {
                    self.config.last_ffmpeg_path.clone()
                }
            }
        };
        self.prompt = Some(PathPrompt::new(kind, initial));
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Apply the prompt's value. An empty value changes nothing.
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let value = prompt.buffer.trim().to_string();
        if value.is_empty() {
            return;
        }

        match prompt.kind {
            PromptKind::AddInput => self.add_input(Path::new(&value)),
            PromptKind::OutputDir => self.set_output_dir(&value),
            PromptKind::FfmpegPath => self.set_ffmpeg_path(&value),
        }
    }

    // Quit

    /// Returns true when the app can exit right away
    pub fn request_quit(&mut self) -> bool {
        if !self.queue.is_busy() {
            return true;
        }
        self.quit_confirmation = Some(QuitConfirmationState {
            running_input: self
                .dashboard
                .current_input
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string()),
        });
        false
    }
}

fn dir_with_separator(dir: &Path) -> String {
    let mut s = dir.display().to_string();
    if !s.ends_with(MAIN_SEPARATOR) {
        s.push(MAIN_SEPARATOR);
    }
    s
}
