//! Pipeline stages and their failures

use std::fmt;
use thiserror::Error;

use crate::tools::ToolError;
use crate::types::JobStatus;

/// One external-tool step of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Rewrite the recording's EDF header so the converter accepts it
    Repair,
    /// Extract one channel to ASCII
    Conversion,
    /// Summarise the ASCII signal
    Analysis,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Repair => "repair",
            Stage::Conversion => "conversion",
            Stage::Analysis => "analysis",
        }
    }

    /// Terminal status a job ends in when this stage fails
    pub fn failure_status(&self) -> JobStatus {
        match self {
            Stage::Repair => JobStatus::FixError,
            Stage::Conversion => JobStatus::ConversionError,
            Stage::Analysis => JobStatus::AnalysisError,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StageFailure {
    #[error("cannot prepare output directory: {0}")]
    Prepare(#[from] std::io::Error),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A stage failed; the job stops here
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: StageFailure,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<StageFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Output the failing tool printed, if it ran at all
    pub fn tool_output(&self) -> &str {
        match &self.source {
            StageFailure::Tool(err) => err.output(),
            StageFailure::Prepare(_) => "",
        }
    }
}
