//! Admin account management routes. Super admin only.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::{CreateUserRequest, User, UserResponse};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, UserRepository};
use shared::password::hash_password;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/v1/admin/users
///
/// All admin accounts, newest first.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let users: Vec<UserResponse> = repo
        .list()
        .await?
        .into_iter()
        .map(|entity| User::from(entity).into())
        .collect();

    Ok(Json(users))
}

/// POST /api/v1/admin/users
///
/// Create an admin account. Emails are stored lowercased so logins are
/// case-insensitive.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    let email = request.email.to_lowercase();

    let repo = UserRepository::new(state.pool.clone());
    let entity = repo
        .create_user(&request.name, &email, &password_hash, request.role.as_str())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Email already registered".to_string())
            }
            other => other.into(),
        })?;

    info!(user_id = %entity.id, email = %entity.email, role = %entity.role, "Admin user created");

    ActivityLogRepository::new(state.pool.clone()).insert_async(log_helpers::user_created(
        auth.user_id,
        entity.id,
        &entity.email,
    ));

    let user: User = entity.into();
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
