//! Response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use super::job::{JobRecord, JobStatus};

/// Acknowledgement message returned for every accepted upload
pub const UPLOAD_ACCEPTED: &str = "File uploaded successfully";

/// POST /upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    /// Sanitized name the job is keyed by; use it to poll
    pub filename: String,
}

impl UploadResponse {
    pub fn accepted(filename: impl Into<String>) -> Self {
        Self {
            status: UPLOAD_ACCEPTED.to_string(),
            filename: filename.into(),
        }
    }
}

/// GET /status/:filename
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
}

/// GET /results/:filename
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub results: String,
}

/// One row of GET /jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub filename: String,
    pub status: JobStatus,
    pub channel_number: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&JobRecord> for JobSummary {
    fn from(record: &JobRecord) -> Self {
        Self {
            filename: record.filename.clone(),
            status: record.status,
            channel_number: record.channel_number,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// GET /jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
    pub total_jobs: usize,
    pub received: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub max_concurrent_jobs: usize,
}
