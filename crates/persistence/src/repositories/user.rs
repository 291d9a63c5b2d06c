//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserSessionEntity};
use crate::metrics::QueryTimer;

/// Repository for admin user and session database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, last_login_at, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, last_login_at, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new admin user.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, last_login_at, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all admin users, newest first.
    pub async fn list(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, last_login_at, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Stamp the user's last successful login.
    pub async fn update_last_login(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// True when at least one user exists. Used by startup bootstrap.
    pub async fn any_exists(&self) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) as count
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    /// Create a new user session.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        refresh_token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<UserSessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user_session");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            INSERT INTO user_sessions (user_id, token_hash, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_hash, refresh_token_hash, expires_at, created_at, last_used_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a session by refresh token hash.
    ///
    /// Expired sessions are returned too; the caller decides whether to
    /// reject and clean them up.
    pub async fn find_session_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
    ) -> Result<Option<UserSessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_refresh_hash");
        let result = sqlx::query_as::<_, UserSessionEntity>(
            r#"
            SELECT id, user_id, token_hash, refresh_token_hash, expires_at, created_at, last_used_at
            FROM user_sessions
            WHERE refresh_token_hash = $1
            "#,
        )
        .bind(refresh_token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Rotate a session's tokens in place (refresh flow).
    pub async fn rotate_session(
        &self,
        session_id: Uuid,
        token_hash: &str,
        refresh_token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("rotate_user_session");
        sqlx::query(
            r#"
            UPDATE user_sessions
            SET token_hash = $1, refresh_token_hash = $2, expires_at = $3, last_used_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(token_hash)
        .bind(refresh_token_hash)
        .bind(expires_at)
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Delete a session by its ID. Used to reap expired sessions on refresh.
    pub async fn delete_session(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete the session identified by refresh token hash (single-device logout).
    /// Returns the number of sessions removed.
    pub async fn delete_session_by_refresh_hash(
        &self,
        refresh_token_hash: &str,
        user_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_session_by_refresh_hash");
        let result = sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE refresh_token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(refresh_token_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete every session for the user (logout from all devices).
    pub async fn delete_sessions_for_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_sessions_for_user");
        sqlx::query(
            r#"
            DELETE FROM user_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Note: UserRepository tests require database connection and are covered by integration tests
}
