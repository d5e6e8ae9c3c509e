//! apnea-backend: upload service for sleep-study recordings
//!
//! Accepts an uploaded biosignal recording, runs it through a chain of
//! external tools (EDF header repair, conversion of one channel to ASCII,
//! analysis) on a background task, and exposes the per-file job status and
//! the analysis output for polling clients.

pub mod config;
pub mod error;
pub mod processing;
pub mod server;
pub mod storage;
pub mod tools;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use processing::{JobRegistry, PipelineRunner};
pub use server::{build_router, state::AppState, ApneaServer};
pub use types::{JobRecord, JobStatus};
