//! Sponsor API routes.
//!
//! Public listing for the active year plus super-admin management. Sponsor
//! writes arrive as multipart because the logo travels with the metadata.

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{Sponsor, SponsorRequest};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, SponsorRepository, YearRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::storage::image_extension;

/// GET /api/v1/public/sponsors
///
/// The active year's sponsors, newest first. Empty when no year is active.
pub async fn public_sponsors(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let years = YearRepository::new(state.pool.clone());
    let Some(active) = years.find_active().await? else {
        return Ok(Json(Vec::new()));
    };

    let repo = SponsorRepository::new(state.pool.clone());
    let sponsors: Vec<Sponsor> = repo
        .list_by_year(active.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(sponsors))
}

/// GET /api/v1/admin/sponsors
///
/// Admin listing, scoped to the active year like the public endpoint.
pub async fn list_sponsors(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    public_sponsors(State(state)).await
}

/// Collected multipart fields for a sponsor write.
struct SponsorUpload {
    request: SponsorRequest,
    logo: Option<(String, Vec<u8>)>,
}

async fn read_sponsor_multipart(mut multipart: Multipart) -> Result<SponsorUpload, ApiError> {
    let mut name = String::new();
    let mut link: Option<String> = None;
    let mut year_id: Option<Uuid> = None;
    let mut logo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("name") => name = field.text().await?,
            Some("link") => {
                let text = field.text().await?;
                if !text.is_empty() {
                    link = Some(text);
                }
            }
            Some("yearId") => {
                let text = field.text().await?;
                year_id = Some(text.parse().map_err(|_| {
                    ApiError::Validation("yearId must be a valid UUID".to_string())
                })?);
            }
            Some("logo") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let Some(extension) = image_extension(&content_type) else {
                    return Err(ApiError::UnsupportedMedia(format!(
                        "Unsupported logo type: {}",
                        content_type
                    )));
                };
                logo = Some((extension.to_string(), field.bytes().await?.to_vec()));
            }
            _ => {}
        }
    }

    let request = SponsorRequest {
        name,
        link,
        year_id,
    };
    request.validate()?;

    Ok(SponsorUpload { request, logo })
}

/// POST /api/v1/admin/sponsors
///
/// Create a sponsor. The logo file is required; the year defaults to the
/// active one when `yearId` is not given.
pub async fn create_sponsor(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_sponsor_multipart(multipart).await?;

    let year_id = match upload.request.year_id {
        Some(id) => id,
        None => {
            let years = YearRepository::new(state.pool.clone());
            years
                .find_active()
                .await?
                .map(|year| year.id)
                .ok_or_else(|| {
                    ApiError::Validation(
                        "No active year; pass yearId explicitly".to_string(),
                    )
                })?
        }
    };

    let (extension, bytes) = upload
        .logo
        .ok_or_else(|| ApiError::Validation("Missing logo field in upload".to_string()))?;
    let stored_name = state.storage.save(&extension, &bytes).await?;

    let repo = SponsorRepository::new(state.pool.clone());
    let entity = repo
        .create(
            year_id,
            &upload.request.name,
            &stored_name,
            upload.request.link.as_deref(),
        )
        .await?;

    info!(sponsor_id = %entity.id, name = %entity.name, "Sponsor created");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::sponsor_created(
        auth.user_id,
        entity.id,
        &entity.name,
    ));

    let sponsor: Sponsor = entity.into();
    Ok((StatusCode::CREATED, Json(sponsor)))
}

/// PUT /api/v1/admin/sponsors/:id
///
/// Update a sponsor. The logo is optional here; omitting it keeps the
/// stored one, while an absent link clears the field.
pub async fn update_sponsor(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(sponsor_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_sponsor_multipart(multipart).await?;

    let repo = SponsorRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(sponsor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sponsor not found".to_string()))?;

    let new_logo = match upload.logo {
        Some((extension, bytes)) => Some(state.storage.save(&extension, &bytes).await?),
        None => None,
    };

    let entity = repo
        .update(
            sponsor_id,
            &upload.request.name,
            new_logo.as_deref(),
            upload.request.link.as_deref(),
            upload.request.year_id,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Sponsor not found".to_string()))?;

    // The old logo is orphaned once a replacement is stored.
    if new_logo.is_some() {
        if let Err(e) = state.storage.delete(&existing.logo).await {
            warn!(file = %existing.logo, error = %e, "Failed to remove replaced sponsor logo");
        }
    }

    info!(sponsor_id = %sponsor_id, name = %entity.name, "Sponsor updated");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::sponsor_updated(
        auth.user_id,
        sponsor_id,
        &entity.name,
    ));

    let sponsor: Sponsor = entity.into();
    Ok(Json(sponsor))
}

/// DELETE /api/v1/admin/sponsors/:id
///
/// Remove a sponsor and its stored logo.
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(sponsor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SponsorRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(sponsor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sponsor not found".to_string()))?;

    repo.delete(sponsor_id).await?;

    if let Err(e) = state.storage.delete(&entity.logo).await {
        warn!(file = %entity.logo, error = %e, "Failed to remove sponsor logo");
    }

    info!(sponsor_id = %sponsor_id, name = %entity.name, "Sponsor deleted");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::sponsor_deleted(
        auth.user_id,
        sponsor_id,
        &entity.name,
    ));

    Ok(StatusCode::NO_CONTENT)
}
