//! Authentication routes for admin login, token refresh and logout.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use domain::models::{LoginRequest, User, UserResponse};
use domain::services::log_helpers;
use persistence::repositories::{ActivityLogRepository, UserRepository};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::auth::{AuthError, AuthService};

/// Token information in response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for logout.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,

    /// Invalidate every session of the user instead of just this one.
    #[serde(default)]
    pub all_devices: bool,
}

/// Authenticate an admin with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let auth_service = auth_service(&state)?;
    let result = auth_service
        .login(&request.email, &request.password)
        .await
        .map_err(map_auth_error)?;

    ActivityLogRepository::new(state.pool.clone())
        .insert_async(log_helpers::login(result.user.id, &result.user.email));

    Ok(Json(LoginResponse {
        user: result.user.into(),
        tokens: TokensResponse {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: result.access_token_expires_in,
        },
    }))
}

/// Exchange a refresh token for a fresh token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    request.validate()?;

    let auth_service = auth_service(&state)?;
    let result = auth_service
        .refresh(&request.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokensResponse {
        access_token: result.access_token,
        refresh_token: result.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: result.expires_in,
    }))
}

/// Invalidate the session behind a refresh token.
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let auth_service = auth_service(&state)?;
    auth_service
        .logout(&request.refresh_token, request.all_devices)
        .await
        .map_err(map_auth_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Current authenticated user.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user: User = repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
        .into();

    Ok(Json(user.into()))
}

fn auth_service(state: &AppState) -> Result<AuthService, ApiError> {
    AuthService::new(state.pool.clone(), &state.config.jwt)
        .map_err(|e| ApiError::Internal(format!("Failed to initialize auth service: {}", e)))
}

fn map_auth_error(error: AuthError) -> ApiError {
    match error {
        AuthError::InvalidCredentials => {
            ApiError::Unauthorized("Invalid email or password".to_string())
        }
        AuthError::InvalidRefreshToken | AuthError::SessionNotFound | AuthError::UserNotFound => {
            ApiError::Unauthorized("Invalid or expired refresh token".to_string())
        }
        AuthError::DatabaseError(db_err) => ApiError::from(db_err),
        AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        AuthError::Internal(msg) => ApiError::Internal(msg),
    }
}
