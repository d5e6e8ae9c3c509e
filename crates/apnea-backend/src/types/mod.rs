//! Core types for the upload service

pub mod job;
pub mod response;

pub use job::{JobRecord, JobStatus};
pub use response::{
    JobListResponse, JobSummary, ResultsResponse, StatusResponse, UploadResponse,
};
