// Conversion engine - independent of UI

pub mod core;
pub mod error;
pub mod hardware;
pub mod probe;
pub mod queue;
pub mod worker;

pub use self::core::*;
pub use error::ConvertError;
pub use hardware::{Encoder, GpuInfo, GpuVendor, detect_gpu};
pub use probe::{ProbeError, ProbeInfo, probe_input};
pub use queue::{DrainSummary, QueueController, Settings, StartOutcome, prepare_job};
pub use worker::{Worker, WorkerMessage};
