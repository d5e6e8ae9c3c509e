//! Job queue feeding the pipeline workers

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{Error, Result};

use super::registry::JobRegistry;

/// A saved upload waiting for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineJob {
    /// Registry key
    pub filename: String,
    /// Where the upload was saved
    pub upload_path: PathBuf,
    /// Signal channel for the converter
    pub channel_number: i32,
}

/// Registers jobs and hands them to the worker over a bounded channel
pub struct JobQueue {
    registry: Arc<JobRegistry>,
    /// Channel for sending jobs to workers
    sender: mpsc::Sender<PipelineJob>,
    /// Pipeline runs allowed at once
    max_concurrent: usize,
}

impl JobQueue {
    /// Create a queue; the receiver goes to [`super::ProcessingWorker::run`]
    pub fn new(
        registry: Arc<JobRegistry>,
        capacity: usize,
        max_concurrent: usize,
    ) -> (Self, mpsc::Receiver<PipelineJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        let queue = Self {
            registry,
            sender,
            max_concurrent,
        };

        (queue, receiver)
    }

    /// Register the job as received and queue it.
    ///
    /// Waits while the channel is full. Fails only if the worker has shut
    /// down, in which case the registration is withdrawn.
    pub async fn submit(&self, job: PipelineJob) -> Result<()> {
        let filename = job.filename.clone();
        self.registry.register(&filename, job.channel_number);

        if let Err(e) = self.sender.send(job).await {
            tracing::error!("Failed to submit job {}: {}", filename, e);
            self.registry.withdraw(&filename);
            return Err(Error::internal("Processing worker is not running"));
        }

        tracing::debug!("Queued job {}", filename);
        Ok(())
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
