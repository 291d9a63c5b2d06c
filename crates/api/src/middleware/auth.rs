//! JWT authentication and role gating middleware.
//!
//! Validates Bearer tokens, resolves the user's role from the database and
//! injects `AuthUser` into request extensions for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use domain::models::{Role, User};
use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;

use crate::app::AppState;
use crate::config::JwtAuthConfig;

/// Authenticated admin identity, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Role resolved from the database, not the token claim.
    pub role: Role,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl AuthUser {
    /// Validates an access token and returns the identity it carries.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id = claims
            .user_id()
            .map_err(|_| "Invalid user ID in token".to_string())?;

        let role = claims
            .role
            .parse::<Role>()
            .map_err(|_| "Invalid role in token".to_string())?;

        Ok(AuthUser {
            user_id,
            role,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }
}

/// Middleware that admits any back-office role (operator or super admin).
pub async fn require_operator(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    require_role_impl(state, req, next, None).await
}

/// Middleware that admits super admins only.
pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    require_role_impl(state, req, next, Some(Role::SuperAdmin)).await
}

/// Internal implementation of role checking middleware.
async fn require_role_impl(
    state: AppState,
    mut req: Request<Body>,
    next: Next,
    min_role: Option<Role>,
) -> Response {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = match AuthUser::create_jwt_config(&state.config.jwt) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to create JWT config: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    let mut auth = match AuthUser::validate(&jwt_config, token) {
        Ok(auth) => auth,
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    // The database is authoritative for the role; the claim goes stale when
    // a super admin changes the user's role after token issuance.
    let repo = UserRepository::new(state.pool.clone());
    match repo.find_by_id(auth.user_id).await {
        Ok(Some(entity)) => {
            let user: User = entity.into();
            auth.role = user.role;
        }
        Ok(None) => {
            return unauthorized_response("User no longer exists");
        }
        Err(e) => {
            tracing::error!("Database error loading user: {}", e);
            return internal_error_response("Failed to verify user");
        }
    }

    if let Some(required_role) = min_role {
        if !has_sufficient_role(&auth.role, &required_role) {
            return forbidden_response(&format!(
                "Insufficient permissions. Required role: {}",
                required_role
            ));
        }
    }

    // Store identity in extensions for handler use
    req.extensions_mut().insert(auth);
    next.run(req).await
}

/// Checks if user_role is at least as privileged as required_role.
fn has_sufficient_role(user_role: &Role, required_role: &Role) -> bool {
    match required_role {
        Role::SuperAdmin => user_role.is_super_admin(),
        Role::Operator => user_role.is_operator_or_above(),
    }
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
