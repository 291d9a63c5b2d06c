//! Public check-in API routes.
//!
//! The GET variant resolves a code without side effects so the scanner UI
//! can preview who is about to be checked in; the POST variant marks
//! attendance. Both answer 200 with `found: false` for unknown codes, since
//! a mistyped code is an expected outcome at the door, not an error.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use tracing::info;

use domain::models::{CheckInResult, Registrant};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, MarkAttendedOutcome, RegistrantRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_check_in;

/// GET /api/v1/public/checkin/:code
///
/// Look up a check-in code without marking attendance.
pub async fn get_check_in(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrantRepository::new(state.pool.clone());
    let result = match repo.find_by_code(&code).await? {
        Some(entity) => {
            let registrant: Registrant = entity.into();
            let already_attended = registrant.is_attended();
            CheckInResult::resolved(registrant.into(), already_attended)
        }
        None => CheckInResult::not_found(),
    };

    Ok(Json(result))
}

/// POST /api/v1/public/checkin/:code
///
/// Mark the registrant behind the code as attended. A second scan of the
/// same code reports `alreadyAttended: true` and leaves the original
/// attendance time untouched.
pub async fn post_check_in(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RegistrantRepository::new(state.pool.clone());
    let result = match repo.mark_attended_by_code(&code).await? {
        MarkAttendedOutcome::Marked(entity) => {
            let registrant: Registrant = entity.into();
            record_check_in();

            info!(
                registrant_id = %registrant.id,
                name = %registrant.name,
                "Check-in recorded"
            );

            ActivityLogRepository::new(state.pool.clone()).insert_async(
                log_helpers::registrant_attended(None, registrant.id, &registrant.name),
            );

            CheckInResult::resolved(registrant.into(), false)
        }
        MarkAttendedOutcome::AlreadyAttended(entity) => {
            let registrant: Registrant = entity.into();
            CheckInResult::resolved(registrant.into(), true)
        }
        MarkAttendedOutcome::NotFound => CheckInResult::not_found(),
    };

    Ok(Json(result))
}
