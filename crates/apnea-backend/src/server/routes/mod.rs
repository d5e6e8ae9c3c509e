//! API routes for the upload server

pub mod jobs;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload - with larger body limit for recordings
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Polling
        .route("/status/:filename", get(jobs::get_status))
        .route("/results/:filename", get(jobs::get_results))
        // Job overview
        .route("/jobs", get(jobs::list_jobs))
}
