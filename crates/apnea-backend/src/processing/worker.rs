//! Background worker dispatching queued jobs to the pipeline

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use super::job_queue::PipelineJob;
use super::pipeline::PipelineRunner;

/// Pulls jobs off the queue and runs each on its own task, at most
/// `max_concurrent` at a time. Further jobs wait in the channel.
pub struct ProcessingWorker {
    runner: Arc<PipelineRunner>,
    max_concurrent: usize,
}

impl ProcessingWorker {
    pub fn new(runner: Arc<PipelineRunner>, max_concurrent: usize) -> Self {
        Self {
            runner,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Start processing jobs from the queue
    pub async fn run(self, mut receiver: mpsc::Receiver<PipelineJob>) {
        tracing::info!(
            "Processing worker started: {} concurrent jobs",
            self.max_concurrent
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        while let Some(job) = receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Worker semaphore closed: {}", e);
                    break;
                }
            };

            let runner = self.runner.clone();
            tokio::spawn(async move {
                let _permit = permit;
                let filename = job.filename.clone();
                let status = runner.run(job).await;
                tracing::debug!("Job {} finished: {}", filename, status);
            });
        }

        tracing::info!("Processing worker stopped");
    }

    /// Run on a background task
    pub fn spawn(self, receiver: mpsc::Receiver<PipelineJob>) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }
}
