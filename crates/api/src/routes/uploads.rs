//! Public serving of stored uploads (gallery images, sponsor logos).
//!
//! Files live in a single flat directory under random names, so the content
//! type is derived from the stored extension. Guideline PDFs have their own
//! endpoint that sets a download filename.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::storage::content_type_for;

/// Cache lifetime for served uploads. Stored names are random per upload,
/// so a replaced file always gets a fresh URL.
const CACHE_MAX_AGE_SECS: u64 = 3600;

/// GET /uploads/:filename
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state
        .storage
        .load(&filename)
        .await?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", CACHE_MAX_AGE_SECS),
        )
        .body(Body::from(bytes))
        .unwrap())
}
