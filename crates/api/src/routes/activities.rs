//! Activity API routes.
//!
//! Public handlers serve the active year's catalog, guideline downloads and
//! registration. Admin handlers manage the catalog itself, including the
//! guideline PDF upload.

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActivityResponse, ActivityStatus, CreateActivityRequest, RegisterRequest, RegistrantResponse,
    UpdateActivityRequest,
};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, ActivityRepository, YearRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::export::guideline_filename;
use crate::services::storage::is_pdf;
use crate::services::{RegistrationError, RegistrationService};

/// GET /api/v1/public/activities
///
/// Lists the active year's activities with registration flags. An empty list
/// is returned when no year is active.
pub async fn list_public_activities(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let years = YearRepository::new(state.pool.clone());
    let Some(active) = years.find_active().await? else {
        return Ok(Json(Vec::<ActivityResponse>::new()));
    };

    let repo = ActivityRepository::new(state.pool.clone());
    let activities = repo
        .list_by_year(active.id)
        .await?
        .into_iter()
        .map(|entity| {
            let (activity, count) = entity.into_parts();
            ActivityResponse::from_activity(activity, count)
        })
        .collect::<Vec<_>>();

    Ok(Json(activities))
}

/// GET /api/v1/public/activities/:id and GET /api/v1/admin/activities/:id
///
/// Fetch one activity with its registrant count.
pub async fn get_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .find_with_count(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let (activity, count) = entity.into_parts();
    Ok(Json(ActivityResponse::from_activity(activity, count)))
}

/// GET /api/v1/public/activities/:id/guideline
///
/// Download the activity's guideline PDF. 404 when the activity has no
/// guideline or the stored file is gone.
pub async fn get_public_guideline(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let Some(stored_name) = entity.guideline_file.as_deref() else {
        return Err(ApiError::NotFound(
            "Activity has no guideline".to_string(),
        ));
    };

    let bytes = state
        .storage
        .load(stored_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guideline file not found".to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        guideline_filename(&entity.title)
    );

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(bytes.into())
        .unwrap())
}

/// POST /api/v1/public/activities/:id/register
///
/// Public registration for an open activity. Returns the registrant with its
/// check-in code; a confirmation message goes out in the background when a
/// usable phone number was given.
pub async fn register_for_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let service = RegistrationService::new(state.pool.clone(), state.notifier.clone());
    let registrant = service
        .register(activity_id, &request)
        .await
        .map_err(|e| match e {
            RegistrationError::ActivityNotFound => {
                ApiError::NotFound("Activity not found".to_string())
            }
            RegistrationError::Closed => ApiError::RegistrationClosed,
            RegistrationError::Database(err) => err.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrantResponse::from(registrant)),
    ))
}

/// GET /api/v1/admin/years/:id/activities
///
/// List a year's activities for the admin catalog view.
pub async fn list_activities_for_year(
    State(state): State<AppState>,
    Path(year_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let years = YearRepository::new(state.pool.clone());
    if years.find_by_id(year_id).await?.is_none() {
        return Err(ApiError::NotFound("Year not found".to_string()));
    }

    let repo = ActivityRepository::new(state.pool.clone());
    let activities = repo
        .list_by_year(year_id)
        .await?
        .into_iter()
        .map(|entity| {
            let (activity, count) = entity.into_parts();
            ActivityResponse::from_activity(activity, count)
        })
        .collect::<Vec<_>>();

    Ok(Json(activities))
}

/// POST /api/v1/admin/years/:id/activities
///
/// Create an activity under a year. Status defaults to `upcoming`; opening
/// for registration is a separate, deliberate update.
pub async fn create_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(year_id): Path<Uuid>,
    Json(request): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let years = YearRepository::new(state.pool.clone());
    if years.find_by_id(year_id).await?.is_none() {
        return Err(ApiError::NotFound("Year not found".to_string()));
    }

    let status = request.status.unwrap_or(ActivityStatus::Upcoming);

    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .create(
            year_id,
            &request.title,
            request.description.as_deref(),
            request.date,
            request.kind.as_str(),
            status.as_str(),
            request.quota,
        )
        .await?;

    info!(
        activity_id = %entity.id,
        year_id = %year_id,
        title = %entity.title,
        "Activity created"
    );

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::activity_created(
        auth.user_id,
        entity.id,
        &entity.title,
    ));

    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse::from_activity(entity.into(), 0)),
    ))
}

/// PUT /api/v1/admin/activities/:id
///
/// Full replace of an activity's editable fields. The status in the request
/// always wins, so an admin can reopen an auto-closed activity or close one
/// early regardless of quota.
pub async fn update_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .update(
            activity_id,
            &request.title,
            request.description.as_deref(),
            request.date,
            request.kind.as_str(),
            request.status.as_str(),
            request.quota,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let count = repo.registrant_count(activity_id).await?;

    info!(activity_id = %activity_id, status = %request.status, "Activity updated");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::activity_updated(
        auth.user_id,
        entity.id,
        &entity.title,
    ));

    Ok(Json(ActivityResponse::from_activity(entity.into(), count)))
}

/// DELETE /api/v1/admin/activities/:id
///
/// Super admin only. Registrants cascade with the activity.
pub async fn delete_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    repo.delete(activity_id).await?;

    // The guideline file has no other referrers once the row is gone.
    if let Some(stored_name) = entity.guideline_file.as_deref() {
        if let Err(e) = state.storage.delete(stored_name).await {
            warn!(file = %stored_name, error = %e, "Failed to remove guideline file");
        }
    }

    info!(activity_id = %activity_id, title = %entity.title, "Activity deleted");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::activity_deleted(
        auth.user_id,
        activity_id,
        &entity.title,
    ));

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/activities/:id/guideline
///
/// Upload the activity's guideline as multipart form data. Only PDF content
/// is accepted; the file is stored under a random name and replaces any
/// previous guideline.
pub async fn upload_guideline(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ActivityRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_pdf(&content_type) {
            return Err(ApiError::UnsupportedMedia(
                "Guideline must be a PDF".to_string(),
            ));
        }

        file_bytes = Some(field.bytes().await?.to_vec());
    }

    let bytes = file_bytes
        .ok_or_else(|| ApiError::Validation("Missing file field in upload".to_string()))?;

    let stored_name = state.storage.save("pdf", &bytes).await?;
    repo.set_guideline(activity_id, &stored_name).await?;

    // Drop the replaced file after the new name is committed.
    if let Some(old_name) = entity.guideline_file.as_deref() {
        if let Err(e) = state.storage.delete(old_name).await {
            warn!(file = %old_name, error = %e, "Failed to remove replaced guideline file");
        }
    }

    info!(
        activity_id = %activity_id,
        file = %stored_name,
        size = bytes.len(),
        "Guideline uploaded"
    );

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::guideline_uploaded(
        auth.user_id,
        activity_id,
        &entity.title,
    ));

    let entity = repo
        .find_with_count(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;
    let (activity, count) = entity.into_parts();

    Ok(Json(ActivityResponse::from_activity(activity, count)))
}
