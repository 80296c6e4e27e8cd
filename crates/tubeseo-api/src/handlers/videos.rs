//! Video API handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use tubeseo_models::{is_allowed_source_url, RecordId, VideoRecord};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for video processing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    pub source_url: String,
}

/// Run the processing pipeline for a submitted URL.
///
/// Returns the full record, either freshly processed or served from cache.
pub async fn process_video(
    State(state): State<AppState>,
    Json(body): Json<ProcessVideoRequest>,
) -> ApiResult<Json<VideoRecord>> {
    // Host allow-list gate; no record exists yet when this rejects.
    if !is_allowed_source_url(&body.source_url) {
        return Err(ApiError::bad_request(
            "Invalid YouTube URL format. Please provide a valid YouTube video URL.",
        ));
    }

    info!(source_url = %body.source_url, "Received process request");
    let record = state.pipeline.process(&body.source_url).await?;
    Ok(Json(record))
}

/// Fetch a record by primary key.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VideoRecord>> {
    let record = state
        .store
        .get(&RecordId::from_string(id))
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    Ok(Json(record))
}
