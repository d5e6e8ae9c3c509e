//! Pipeline runner: repair → conversion → analysis for one upload

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::storage::WorkDir;
use crate::tools::{Placeholders, StageCommand, ToolInvoker, ToolOutput};
use crate::types::JobStatus;

use super::job_queue::PipelineJob;
use super::registry::JobRegistry;
use super::stage::{Stage, StageError};

/// Result stored when the analysis stage is switched off
pub const CONVERSION_ONLY_RESULT: &str = "Conversion and analysis completed";

/// Runs the configured tool chain for a job and records the outcome.
///
/// The first failing stage is terminal; nothing is retried.
pub struct PipelineRunner {
    invoker: Arc<dyn ToolInvoker>,
    registry: Arc<JobRegistry>,
    workdir: WorkDir,
    config: PipelineConfig,
}

impl PipelineRunner {
    pub fn new(
        invoker: Arc<dyn ToolInvoker>,
        registry: Arc<JobRegistry>,
        workdir: WorkDir,
        config: PipelineConfig,
    ) -> Self {
        Self {
            invoker,
            registry,
            workdir,
            config,
        }
    }

    /// Process one job to a terminal state and return that state
    pub async fn run(&self, job: PipelineJob) -> JobStatus {
        let filename = job.filename.as_str();
        let start = Instant::now();
        tracing::info!("Processing file: {}", filename);
        self.registry.set_status(filename, JobStatus::Processing);

        match self.execute(&job).await {
            Ok(result) => {
                self.registry.complete(filename, result);
                tracing::info!(
                    "Completed {} in {:.1}s",
                    filename,
                    start.elapsed().as_secs_f64()
                );
                JobStatus::Completed
            }
            Err(e) => {
                let status = e.stage.failure_status();
                tracing::error!("Error processing {}: {}", filename, e);
                let output = e.tool_output();
                if !output.is_empty() {
                    tracing::error!("{} output: {}", e.stage, output);
                }
                self.registry.set_status(filename, status);
                status
            }
        }
    }

    async fn execute(&self, job: &PipelineJob) -> Result<String, StageError> {
        let channel = job.channel_number;

        let fixed_path = self.workdir.fixed_path(&job.filename);
        self.workdir
            .ensure_fixed_dir()
            .await
            .map_err(|e| StageError::new(Stage::Repair, e))?;
        self.run_stage(
            Stage::Repair,
            &self.config.repair,
            &job.upload_path,
            Some(&fixed_path),
            channel,
        )
        .await?;
        tracing::info!("File fixed: {}", fixed_path.display());

        let ascii_path = self.workdir.ascii_path(&job.filename);
        self.workdir
            .ensure_ascii_dir()
            .await
            .map_err(|e| StageError::new(Stage::Conversion, e))?;
        self.run_stage(
            Stage::Conversion,
            &self.config.conversion,
            &fixed_path,
            Some(&ascii_path),
            channel,
        )
        .await?;
        tracing::info!("File converted to ASCII: {}", ascii_path.display());

        if !self.config.run_analysis {
            return Ok(CONVERSION_ONLY_RESULT.to_string());
        }

        let analysis = self
            .run_stage(
                Stage::Analysis,
                &self.config.analysis,
                &ascii_path,
                None,
                channel,
            )
            .await?;

        Ok(analysis.combined)
    }

    async fn run_stage(
        &self,
        stage: Stage,
        command: &StageCommand,
        input: &Path,
        output: Option<&Path>,
        channel: i32,
    ) -> Result<ToolOutput, StageError> {
        let command = command.render(
            &Placeholders {
                input,
                output,
                channel,
            },
            self.config.working_dir.as_deref(),
        );
        tracing::info!("Running {} stage: {}", stage, command);

        self.invoker
            .invoke(&command)
            .await
            .map_err(|e| StageError::new(stage, e))
    }
}
