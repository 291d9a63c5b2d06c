//! Registrant admin API routes.
//!
//! Listing, status management, attendance marking, the participant list PDF
//! export and the per-registrant QR code.

use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use domain::models::{
    Activity, Registrant, RegistrantResponse, RegistrantStatus, UpdateRegistrantStatusRequest,
};
use domain::services::log_helpers;
use persistence::repositories::{
    ActivityLogRepository, ActivityRepository, MarkAttendedOutcome, RegistrantRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_check_in;
use crate::middleware::AuthUser;
use crate::services::export::{participants_filename, render_participant_list};
use crate::services::qr::{check_in_url, render_qr_svg};

/// Query parameters for the registrant list.
#[derive(Debug, Deserialize)]
pub struct ListRegistrantsQuery {
    /// Optional status filter, matched against the stored status string.
    pub status: Option<String>,
}

/// GET /api/v1/admin/activities/:id/registrants
///
/// List an activity's registrants, newest first, optionally filtered by
/// status. Rows that predate check-in codes get one allocated here so every
/// listed registrant is scannable.
pub async fn list_registrants(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
    Query(query): Query<ListRegistrantsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let activities = ActivityRepository::new(state.pool.clone());
    if activities.find_by_id(activity_id).await?.is_none() {
        return Err(ApiError::NotFound("Activity not found".to_string()));
    }

    let repo = RegistrantRepository::new(state.pool.clone());
    let entities = repo
        .list_by_activity(activity_id, query.status.as_deref())
        .await?;

    let mut registrants = Vec::with_capacity(entities.len());
    for entity in entities {
        let mut registrant: Registrant = entity.into();
        if registrant.check_in_code.is_none() {
            registrant.check_in_code = repo.ensure_check_in_code(registrant.id).await?;
        }
        registrants.push(RegistrantResponse::from(registrant));
    }

    Ok(Json(registrants))
}

/// GET /api/v1/admin/activities/:id/registrants/export
///
/// Download the activity's participant list as a PDF.
pub async fn export_registrants(
    State(state): State<AppState>,
    Path(activity_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let activities = ActivityRepository::new(state.pool.clone());
    let activity: Activity = activities
        .find_by_id(activity_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?
        .into();

    let repo = RegistrantRepository::new(state.pool.clone());
    let registrants: Vec<Registrant> = repo
        .list_by_activity(activity_id, None)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let pdf = render_participant_list(&activity, &registrants);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        participants_filename(&activity.title)
    );

    info!(
        activity_id = %activity_id,
        registrants = registrants.len(),
        "Participant list exported"
    );

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(pdf.into())
        .unwrap())
}

/// PUT /api/v1/admin/registrants/:id/status
///
/// Set a registrant's status. Unrecognized values coerce to `pending`
/// rather than erroring, so a bad client falls back to the safe state.
pub async fn set_registrant_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(registrant_id): Path<Uuid>,
    Json(request): Json<UpdateRegistrantStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = RegistrantStatus::parse_or_pending(&request.status);
    update_status(&state, &auth, registrant_id, status).await
}

/// POST /api/v1/admin/registrants/:id/verify
///
/// Shortcut for setting the status to `verified`.
pub async fn verify_registrant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(registrant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    update_status(&state, &auth, registrant_id, RegistrantStatus::Verified).await
}

async fn update_status(
    state: &AppState,
    auth: &AuthUser,
    registrant_id: Uuid,
    status: RegistrantStatus,
) -> Result<Json<RegistrantResponse>, ApiError> {
    let repo = RegistrantRepository::new(state.pool.clone());
    let entity = repo
        .set_status(registrant_id, status.as_str())
        .await?
        .ok_or_else(|| ApiError::NotFound("Registrant not found".to_string()))?;

    info!(registrant_id = %registrant_id, status = %status, "Registrant status updated");

    ActivityLogRepository::new(state.pool.clone()).insert_async(
        log_helpers::registrant_status_changed(auth.user_id, registrant_id, status.as_str()),
    );

    let registrant: Registrant = entity.into();
    Ok(Json(registrant.into()))
}

/// POST /api/v1/admin/registrants/:id/attend
///
/// Mark a registrant as attended. Marking twice is not an error; the second
/// call returns the registrant unchanged with the original attendance time.
pub async fn attend_registrant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(registrant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrantRepository::new(state.pool.clone());
    match repo.mark_attended(registrant_id).await? {
        MarkAttendedOutcome::Marked(entity) => {
            let registrant: Registrant = entity.into();
            record_check_in();

            info!(registrant_id = %registrant_id, name = %registrant.name, "Attendance marked");

            ActivityLogRepository::new(state.pool.clone()).insert_async(
                log_helpers::registrant_attended(
                    Some(auth.user_id),
                    registrant_id,
                    &registrant.name,
                ),
            );

            Ok(Json(RegistrantResponse::from(registrant)))
        }
        MarkAttendedOutcome::AlreadyAttended(entity) => {
            let registrant: Registrant = entity.into();
            Ok(Json(RegistrantResponse::from(registrant)))
        }
        MarkAttendedOutcome::NotFound => {
            Err(ApiError::NotFound("Registrant not found".to_string()))
        }
    }
}

/// GET /api/v1/admin/registrants/:id/qr
///
/// SVG QR code for the registrant's public check-in URL, suitable for
/// printing on a badge. Allocates the check-in code first when missing.
pub async fn registrant_qr(
    State(state): State<AppState>,
    Path(registrant_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let repo = RegistrantRepository::new(state.pool.clone());
    let code = repo
        .ensure_check_in_code(registrant_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Registrant not found".to_string()))?;

    let url = check_in_url(&state.config.server.public_base_url, &code);
    let svg = render_qr_svg(&url)
        .map_err(|e| ApiError::Internal(format!("Failed to render QR code: {}", e)))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/svg+xml")
        .body(svg.into())
        .unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_status_is_optional() {
        let query: ListRegistrantsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.status.is_none());

        let query: ListRegistrantsQuery =
            serde_json::from_str(r#"{"status": "verified"}"#).unwrap();
        assert_eq!(query.status.as_deref(), Some("verified"));
    }

    #[test]
    fn test_status_request_accepts_free_form_values() {
        let request: UpdateRegistrantStatusRequest =
            serde_json::from_str(r#"{"status": "rejected"}"#).unwrap();
        assert_eq!(
            RegistrantStatus::parse_or_pending(&request.status),
            RegistrantStatus::Pending
        );

        let request: UpdateRegistrantStatusRequest =
            serde_json::from_str(r#"{"status": "Verified"}"#).unwrap();
        assert_eq!(
            RegistrantStatus::parse_or_pending(&request.status),
            RegistrantStatus::Verified
        );
    }
}
