//! Background processing: job registry, queue and the tool pipeline

mod job_queue;
mod pipeline;
mod registry;
mod stage;
mod worker;

pub use job_queue::{JobQueue, PipelineJob};
pub use pipeline::{PipelineRunner, CONVERSION_ONLY_RESULT};
pub use registry::{JobRegistry, RegistryStats};
pub use stage::{Stage, StageError, StageFailure};
pub use worker::ProcessingWorker;
