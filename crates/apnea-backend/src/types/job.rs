//! Job state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing state of an uploaded recording.
///
/// Serialized with the human-readable strings clients poll for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Saved and queued, pipeline not started
    #[serde(rename = "received")]
    Received,
    /// Pipeline running
    #[serde(rename = "processing")]
    Processing,
    /// Header repair failed
    #[serde(rename = "fix error")]
    FixError,
    /// Conversion to ASCII failed
    #[serde(rename = "conversion error")]
    ConversionError,
    /// Analysis failed
    #[serde(rename = "analysis error")]
    AnalysisError,
    /// All stages succeeded; a result is available
    #[serde(rename = "completed")]
    Completed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Received,
        JobStatus::Processing,
        JobStatus::FixError,
        JobStatus::ConversionError,
        JobStatus::AnalysisError,
        JobStatus::Completed,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Received => "received",
            JobStatus::Processing => "processing",
            JobStatus::FixError => "fix error",
            JobStatus::ConversionError => "conversion error",
            JobStatus::AnalysisError => "analysis error",
            JobStatus::Completed => "completed",
        }
    }

    /// No further transitions happen from a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Received | JobStatus::Processing)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::FixError | JobStatus::ConversionError | JobStatus::AnalysisError
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for one uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// File name the job is keyed by
    pub filename: String,
    pub status: JobStatus,
    /// Analysis output, only meaningful once completed
    pub result: Option<String>,
    /// Signal channel passed to the converter
    pub channel_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(filename: impl Into<String>, status: JobStatus, channel_number: i32) -> Self {
        let now = Utc::now();
        Self {
            filename: filename.into(),
            status,
            result: None,
            channel_number,
            created_at: now,
            updated_at: now,
        }
    }
}
