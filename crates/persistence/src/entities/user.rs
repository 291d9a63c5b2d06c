//! Admin user and session entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for domain::models::User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            role: domain::models::Role::from_str(&entity.role)
                .unwrap_or(domain::models::Role::Operator), // Default fallback
            last_login_at: entity.last_login_at,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the user_sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSessionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
}

impl From<UserSessionEntity> for domain::models::UserSession {
    fn from(entity: UserSessionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            token_hash: entity.token_hash,
            refresh_token_hash: entity.refresh_token_hash,
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            last_used_at: entity.last_used_at,
        }
    }
}
