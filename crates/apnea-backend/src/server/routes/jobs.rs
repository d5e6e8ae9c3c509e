//! Job status and result endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{JobListResponse, JobSummary, ResultsResponse, StatusResponse};

/// GET /status/:filename - Current pipeline state
pub async fn get_status(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<StatusResponse>> {
    tracing::info!("Checking status for file: {}", filename);

    let status = state.registry().get_status(&filename).ok_or_else(|| {
        tracing::error!("Status not found for file: {}", filename);
        Error::JobNotFound(filename.clone())
    })?;

    Ok(Json(StatusResponse { status }))
}

/// GET /results/:filename - Analysis output of a completed job
pub async fn get_results(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<ResultsResponse>> {
    tracing::info!("Fetching results for file: {}", filename);

    let results = state.registry().get_result(&filename).ok_or_else(|| {
        tracing::error!("Results not found for file: {}", filename);
        Error::ResultNotFound(filename.clone())
    })?;

    Ok(Json(ResultsResponse { results }))
}

/// GET /jobs - List all jobs
pub async fn list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    let registry = state.registry();
    let stats = registry.stats();

    let jobs: Vec<JobSummary> = registry.list().iter().map(JobSummary::from).collect();

    Json(JobListResponse {
        jobs,
        total_jobs: stats.total_jobs,
        received: stats.received,
        processing: stats.processing,
        completed: stats.completed,
        failed: stats.failed,
        max_concurrent_jobs: state.job_queue().max_concurrent(),
    })
}
