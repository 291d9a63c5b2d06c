//! Authentication service for admin login, token refresh and logout.

use chrono::Utc;
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use domain::models::User;
use persistence::repositories::UserRepository;

use crate::config::JwtAuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Token pair with metadata.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_jti: String,
    pub refresh_token: String,
    pub refresh_token_jti: String,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Authentication service.
pub struct AuthService {
    users: UserRepository,
    jwt_config: JwtConfig,
    access_token_expiry: i64,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Result<Self, AuthError> {
        let jwt = JwtConfig::with_leeway(
            &jwt_config.private_key,
            &jwt_config.public_key,
            jwt_config.access_token_expiry_secs,
            jwt_config.refresh_token_expiry_secs,
            jwt_config.leeway_secs,
        )
        .map_err(|e| AuthError::Internal(format!("Failed to initialize JWT: {}", e)))?;

        Ok(Self {
            users: UserRepository::new(pool),
            jwt_config: jwt,
            access_token_expiry: jwt_config.access_token_expiry_secs,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .map(User::from);

        let user = match user {
            Some(u) => u,
            None => return Err(AuthError::InvalidCredentials),
        };

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id).await?;

        let tokens = self.generate_tokens(user.id, user.role.as_str())?;
        self.create_session(user.id, &tokens).await?;

        tracing::info!(user_id = %user.id, "Admin login");

        Ok(AuthResult {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.access_token_expiry,
        })
    }

    /// Refresh access token using a valid refresh token.
    ///
    /// Implements token rotation: old refresh token is invalidated and a new one is issued.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired => AuthError::InvalidRefreshToken,
                JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;

        // Sessions store the hashed JTI, never the token itself
        let jti_hash = sha256_hex(&claims.jti);

        let session = self
            .users
            .find_session_by_refresh_hash(&jti_hash)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if session.user_id != user_id {
            return Err(AuthError::SessionNotFound);
        }

        if session.expires_at < Utc::now() {
            self.users.delete_session(session.id).await?;
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or(AuthError::UserNotFound)?;

        // Rotate: new tokens replace the old pair inside the same session row
        let new_tokens = self.generate_tokens(user.id, user.role.as_str())?;
        let new_expires_at =
            Utc::now() + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);

        self.users
            .rotate_session(
                session.id,
                &sha256_hex(&new_tokens.access_token_jti),
                &sha256_hex(&new_tokens.refresh_token_jti),
                new_expires_at,
            )
            .await?;

        Ok(RefreshResult {
            access_token: new_tokens.access_token,
            refresh_token: new_tokens.refresh_token,
            expires_in: self.access_token_expiry,
        })
    }

    /// Logout by invalidating the session associated with the refresh token.
    ///
    /// If `all_devices` is true, invalidates all sessions for the user.
    /// Otherwise, only invalidates the session identified by the refresh token.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> Result<(), AuthError> {
        let claims = self
            .jwt_config
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired => AuthError::InvalidRefreshToken,
                JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;

        if all_devices {
            self.users.delete_sessions_for_user(user_id).await?;
        } else {
            let jti_hash = sha256_hex(&claims.jti);
            let removed = self
                .users
                .delete_session_by_refresh_hash(&jti_hash, user_id)
                .await?;

            // Already being logged out is not an error
            if removed == 0 {
                tracing::debug!(user_id = %user_id, "Session not found during logout");
            }
        }

        Ok(())
    }

    /// Generate access and refresh tokens for a user.
    fn generate_tokens(&self, user_id: Uuid, role: &str) -> Result<TokenPair, AuthError> {
        let access = self.jwt_config.issue_access_token(user_id, role)?;
        let refresh = self.jwt_config.issue_refresh_token(user_id, role)?;

        Ok(TokenPair {
            access_token: access.token,
            access_token_jti: access.jti,
            refresh_token: refresh.token,
            refresh_token_jti: refresh.jti,
        })
    }

    /// Create a session for the user with the generated tokens.
    async fn create_session(&self, user_id: Uuid, tokens: &TokenPair) -> Result<(), AuthError> {
        let expires_at =
            Utc::now() + chrono::Duration::seconds(self.jwt_config.refresh_token_expiry_secs);

        self.users
            .create_session(
                user_id,
                &sha256_hex(&tokens.access_token_jti),
                &sha256_hex(&tokens.refresh_token_jti),
                expires_at,
            )
            .await?;

        Ok(())
    }
}
