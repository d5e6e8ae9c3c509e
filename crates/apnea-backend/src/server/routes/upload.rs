//! Recording upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::processing::PipelineJob;
use crate::server::state::AppState;
use crate::storage::sanitize_filename;
use crate::types::UploadResponse;

/// Multipart field carrying the recording
const FILE_FIELD: &str = "file";
/// Optional multipart field selecting the signal channel
const CHANNEL_FIELD: &str = "channel_number";

/// Parse `channel_number`; absent or empty means channel 0
pub fn parse_channel(raw: Option<&str>) -> Result<i32> {
    match raw {
        None | Some("") => Ok(0),
        Some(value) => value
            .parse::<i32>()
            .map_err(|_| Error::InvalidChannel(value.to_string())),
    }
}

/// POST /upload - Save a recording and start processing it
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    tracing::info!("Received upload request");

    let mut file: Option<(String, Bytes)> = None;
    let mut channel_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FILE_FIELD {
            // A `file` field without a file name is a plain form value
            let Some(filename) = field.file_name().map(|s| s.to_string()) else {
                continue;
            };
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;
            file = Some((filename, data));
        } else if name == CHANNEL_FIELD {
            let value = field.text().await.map_err(|e| {
                Error::BadRequest(format!("Failed to read channel number: {}", e))
            })?;
            channel_raw = Some(value);
        }
    }

    let Some((raw_filename, data)) = file else {
        tracing::error!("Error receiving file: no '{}' field", FILE_FIELD);
        return Err(Error::MissingFile);
    };

    let channel_number = parse_channel(channel_raw.as_deref()).inspect_err(|e| {
        tracing::error!("{}", e);
    })?;

    tracing::info!("File received: {} ({} bytes)", raw_filename, data.len());

    let filename = sanitize_filename(&raw_filename)?;
    let upload_path = state.workdir().save_upload(&filename, &data).await?;
    tracing::info!("File saved to: {}", upload_path.display());

    state
        .job_queue()
        .submit(PipelineJob {
            filename: filename.clone(),
            upload_path,
            channel_number,
        })
        .await?;

    Ok(Json(UploadResponse::accepted(filename)))
}
