//! Year admin and public routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{CreateYearRequest, UpdateYearRequest, Year, DEFAULT_THEME};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, YearRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/v1/public/years/active
///
/// The active year, with the public theme fallback applied.
pub async fn get_active_year(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = YearRepository::new(state.pool.clone());

    let mut year: Year = repo
        .find_active()
        .await?
        .ok_or_else(|| ApiError::NotFound("No active year".to_string()))?
        .into();

    // Storage keeps NULL so the admin form shows the field empty; the
    // public site always gets a banner line.
    year.theme = year.theme.or_else(|| Some(DEFAULT_THEME.to_string()));

    Ok(Json(year))
}

/// GET /api/v1/admin/years
///
/// List all years, newest first.
pub async fn list_years(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = YearRepository::new(state.pool.clone());
    let years: Vec<Year> = repo.list().await?.into_iter().map(Year::from).collect();
    Ok(Json(years))
}

/// POST /api/v1/admin/years
///
/// Create a year. The first year ever created becomes active.
pub async fn create_year(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = YearRepository::new(state.pool.clone());
    let year: Year = repo
        .create(&request.name, request.theme.as_deref())
        .await?
        .into();

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::year_created(
        auth.user_id,
        year.id,
        &year.name,
    ));

    info!(year_id = %year.id, name = %year.name, active = year.active, "Created year");

    Ok((StatusCode::CREATED, Json(year)))
}

/// PUT /api/v1/admin/years/:id
///
/// Full replace of name and theme; an absent theme clears it.
pub async fn update_year(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(year_id): Path<Uuid>,
    Json(request): Json<UpdateYearRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = YearRepository::new(state.pool.clone());
    let year: Year = repo
        .update(year_id, &request.name, request.theme.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Year not found".to_string()))?
        .into();

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::year_updated(
        auth.user_id,
        year.id,
        &year.name,
    ));

    info!(year_id = %year.id, "Updated year");

    Ok(Json(year))
}

/// POST /api/v1/admin/years/:id/activate
///
/// Make this year the active one; every other year is deactivated in the
/// same transaction.
pub async fn activate_year(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(year_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = YearRepository::new(state.pool.clone());

    if !repo.activate(year_id).await? {
        return Err(ApiError::NotFound("Year not found".to_string()));
    }

    let year: Year = repo
        .find_by_id(year_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Year not found".to_string()))?
        .into();

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::year_activated(
        auth.user_id,
        year.id,
        &year.name,
    ));

    info!(year_id = %year.id, name = %year.name, "Activated year");

    Ok(Json(year))
}

/// DELETE /api/v1/admin/years/:id
///
/// Super admin only. Activities and their registrants cascade.
pub async fn delete_year(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(year_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = YearRepository::new(state.pool.clone());

    let year = repo
        .find_by_id(year_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Year not found".to_string()))?;

    repo.delete(year_id).await?;

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::year_deleted(
        auth.user_id,
        year.id,
        &year.name,
    ));

    info!(year_id = %year_id, name = %year.name, "Deleted year");

    Ok(StatusCode::NO_CONTENT)
}
