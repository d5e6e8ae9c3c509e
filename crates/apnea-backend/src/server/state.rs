//! Application state for the upload server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::processing::{JobQueue, JobRegistry, PipelineRunner, ProcessingWorker};
use crate::storage::WorkDir;
use crate::tools::{ProcessInvoker, ToolInvoker};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Upload directory layout
    workdir: WorkDir,
    /// Status/result store
    registry: Arc<JobRegistry>,
    /// Job queue for async processing
    job_queue: JobQueue,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state that runs the configured tools as child processes.
    ///
    /// Spawns the processing worker, so it must be called inside a Tokio
    /// runtime.
    pub fn new(config: AppConfig) -> Self {
        Self::with_invoker(config, Arc::new(ProcessInvoker::new()))
    }

    /// Create state with a custom tool invoker
    pub fn with_invoker(config: AppConfig, invoker: Arc<dyn ToolInvoker>) -> Self {
        tracing::info!("Initializing application state...");

        let workdir = WorkDir::new(&config.storage);
        tracing::info!("Upload directory: {}", workdir.root().display());

        let registry = Arc::new(JobRegistry::new());

        let max_concurrent = config.pipeline.concurrency();
        let (job_queue, receiver) = JobQueue::new(
            registry.clone(),
            config.pipeline.queue_capacity,
            max_concurrent,
        );
        tracing::info!(
            "Job queue initialized (capacity {}, {} concurrent jobs)",
            config.pipeline.queue_capacity,
            max_concurrent
        );

        let runner = Arc::new(PipelineRunner::new(
            invoker,
            registry.clone(),
            workdir.clone(),
            config.pipeline.clone(),
        ));
        ProcessingWorker::new(runner, max_concurrent).spawn(receiver);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                workdir,
                registry,
                job_queue,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn workdir(&self) -> &WorkDir {
        &self.inner.workdir
    }

    /// Get job registry
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.inner.registry
    }

    /// Get job queue
    pub fn job_queue(&self) -> &JobQueue {
        &self.inner.job_queue
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }
}
