//! About page API routes.
//!
//! The About content is a singleton row, created with defaults on first
//! read so the public site never sees a 404 here.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::{About, UpdateAboutRequest};
use domain::services::log_helpers;
use persistence::repositories::{AboutRepository, ActivityLogRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/v1/public/about and GET /api/v1/admin/about
pub async fn get_about(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = AboutRepository::new(state.pool.clone());
    let about: About = repo.get_or_create().await?.into();
    Ok(Json(about))
}

/// PUT /api/v1/admin/about
///
/// Full replace of the About content. Absent optional fields are cleared.
pub async fn update_about(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<UpdateAboutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = AboutRepository::new(state.pool.clone());
    // Materialize the row first so the update always has a target.
    repo.get_or_create().await?;
    let about: About = repo
        .update(
            &request.title,
            request.description.as_deref(),
            request.goals.as_deref(),
            request.location.as_deref(),
        )
        .await?
        .into();

    info!(title = %about.title, "About page updated");

    ActivityLogRepository::new(state.pool.clone())
        .insert_async(log_helpers::about_updated(auth.user_id));

    Ok(Json(about))
}
