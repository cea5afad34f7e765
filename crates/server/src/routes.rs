use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use idscan_core::FieldSet;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Flat OCR text of the document.
    pub raw_text: String,
    /// Narrative answer from the text-understanding service, or an error
    /// description when that call degraded.
    pub answers: String,
    /// Pattern/entity extraction result; absent fields are omitted.
    pub fields: FieldSet,
}

/// `POST /upload` — multipart form with the document photo in field `image`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        // Extension hint only; the staging layer sanitizes it and never
        // uses the caller-supplied filename as a path.
        let ext = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        image = Some((data.to_vec(), ext));
        break;
    }

    let Some((data, ext)) = image.filter(|(data, _)| !data.is_empty()) else {
        return Err(ApiError::bad_request("No image uploaded"));
    };

    let outcome = state.pipeline.run(&data, &ext).await?;

    Ok(Json(UploadResponse {
        raw_text: outcome.raw_text,
        answers: outcome.narrative.into_text(),
        fields: outcome.fields,
    }))
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
