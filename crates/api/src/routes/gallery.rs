//! Gallery API routes.
//!
//! Public browsing of the active year's images plus admin upload and
//! curation. The featured set feeds the homepage carousel.

use axum::{
    extract::{Extension, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{GalleryImage, SetFeaturedRequest, UploadGalleryImageRequest, FEATURED_LIMIT};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, ActivityRepository, GalleryRepository, YearRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::storage::image_extension;

/// Query parameters for the public gallery.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    /// When true, returns the curated featured set instead of the active
    /// year's full gallery.
    pub featured: Option<bool>,
}

/// GET /api/v1/public/gallery
///
/// Without parameters: the active year's images, newest first (empty when no
/// year is active). With `featured=true`: the featured set capped at 8,
/// falling back to the most recent uploads while nothing is featured yet.
pub async fn public_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());

    if query.featured.unwrap_or(false) {
        let mut entities = repo.featured(FEATURED_LIMIT).await?;
        if entities.is_empty() {
            entities = repo.recent(FEATURED_LIMIT).await?;
        }
        let images: Vec<GalleryImage> = entities.into_iter().map(Into::into).collect();
        return Ok(Json(images));
    }

    let years = YearRepository::new(state.pool.clone());
    let Some(active) = years.find_active().await? else {
        return Ok(Json(Vec::new()));
    };

    let images: Vec<GalleryImage> = repo
        .list_by_year(active.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(images))
}

/// GET /api/v1/admin/activities/:id/gallery
///
/// List an activity's images for the admin view.
pub async fn list_activity_gallery(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let activities = ActivityRepository::new(state.pool.clone());
    if activities.find_by_id(activity_id).await?.is_none() {
        return Err(ApiError::NotFound("Activity not found".to_string()));
    }

    let repo = GalleryRepository::new(state.pool.clone());
    let images: Vec<GalleryImage> = repo
        .list_by_activity(activity_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(images))
}

/// POST /api/v1/admin/activities/:id/gallery
///
/// Multipart image upload. Accepts png, jpg, jpeg, gif and webp; the file is
/// stored under a random name and the image is attached to the activity's
/// year.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let activities = ActivityRepository::new(state.pool.clone());
    let activity = activities
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut metadata = UploadGalleryImageRequest::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let Some(extension) = image_extension(&content_type) else {
                    return Err(ApiError::UnsupportedMedia(format!(
                        "Unsupported image type: {}",
                        content_type
                    )));
                };
                file = Some((extension.to_string(), field.bytes().await?.to_vec()));
            }
            Some("caption") => {
                let text = field.text().await?;
                if !text.is_empty() {
                    metadata.caption = Some(text);
                }
            }
            Some("isFeatured") => {
                let text = field.text().await?;
                // HTML checkboxes send "on"; JSON-ish clients send "true".
                metadata.is_featured = matches!(text.trim(), "true" | "1" | "on");
            }
            _ => {}
        }
    }

    metadata.validate()?;
    let (extension, bytes) =
        file.ok_or_else(|| ApiError::Validation("Missing file field in upload".to_string()))?;

    let stored_name = state.storage.save(&extension, &bytes).await?;

    let repo = GalleryRepository::new(state.pool.clone());
    let entity = repo
        .insert(
            activity.year_id,
            Some(activity_id),
            &stored_name,
            metadata.caption.as_deref(),
            metadata.is_featured,
        )
        .await?;

    info!(
        image_id = %entity.id,
        activity_id = %activity_id,
        file = %stored_name,
        size = bytes.len(),
        "Gallery image uploaded"
    );

    ActivityLogRepository::new(state.pool.clone())
        .insert_async(log_helpers::gallery_uploaded(auth.user_id, entity.id));

    let image: GalleryImage = entity.into();
    Ok((StatusCode::CREATED, Json(image)))
}

/// PUT /api/v1/admin/gallery/:id/featured
///
/// Toggle the featured flag on an image.
pub async fn set_featured(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(image_id): Path<Uuid>,
    Json(request): Json<SetFeaturedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());
    let entity = repo
        .set_featured(image_id, request.is_featured)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery image not found".to_string()))?;

    info!(image_id = %image_id, featured = request.is_featured, "Gallery image flag updated");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::gallery_featured(
        auth.user_id,
        image_id,
        request.is_featured,
    ));

    let image: GalleryImage = entity.into();
    Ok(Json(image))
}

/// DELETE /api/v1/admin/gallery/:id
///
/// Remove an image and its stored file.
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(image_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(image_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Gallery image not found".to_string()))?;

    repo.delete(image_id).await?;

    if let Err(e) = state.storage.delete(&entity.file).await {
        warn!(file = %entity.file, error = %e, "Failed to remove gallery file");
    }

    info!(image_id = %image_id, file = %entity.file, "Gallery image deleted");

    ActivityLogRepository::new(state.pool.clone())
        .insert_async(log_helpers::gallery_deleted(auth.user_id, image_id));

    Ok(StatusCode::NO_CONTENT)
}
