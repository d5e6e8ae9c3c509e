//! Error types for the upload service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors surfaced through the HTTP API or at startup
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload request carried no `file` field
    #[error("No file is received")]
    MissingFile,

    /// `channel_number` was present but not an integer
    #[error("Invalid channel number: {0}")]
    InvalidChannel(String),

    /// Uploaded file name has no usable base name
    #[error("Invalid file name: {0:?}")]
    InvalidFilename(String),

    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No job registered under this file name
    #[error("File not found: {0}")]
    JobNotFound(String),

    /// Job exists but has no result (yet)
    #[error("Results not found for file: {0}")]
    ResultNotFound(String),

    /// Failure persisting an upload
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config parse error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFile
            | Error::InvalidChannel(_)
            | Error::InvalidFilename(_)
            | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::JobNotFound(_) | Error::ResultNotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_)
            | Error::Storage { .. }
            | Error::Io(_)
            | Error::Toml(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::MissingFile => "missing_file",
            Error::InvalidChannel(_) => "invalid_channel",
            Error::InvalidFilename(_) => "invalid_filename",
            Error::BadRequest(_) => "bad_request",
            Error::JobNotFound(_) | Error::ResultNotFound(_) => "not_found",
            Error::Storage { .. } => "storage_error",
            Error::Io(_) => "io_error",
            Error::Toml(_) => "config_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
