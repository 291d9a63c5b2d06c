//! Activity log repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ActivityLogEntity;

use domain::models::CreateLogEntry;

/// Repository for the append-only admin action log.
#[derive(Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Append a log entry.
    pub async fn insert(&self, entry: &CreateLogEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_log (user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.action.to_string())
        .bind(entry.entity_type.as_deref())
        .bind(entry.entity_id.as_deref())
        .bind(entry.details.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Append a log entry asynchronously (fire and forget).
    ///
    /// Log recording is best-effort: a failed insert warns and the
    /// operation that triggered it is unaffected.
    pub fn insert_async(&self, entry: CreateLogEntry) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let repo = ActivityLogRepository::new(pool);
            if let Err(e) = repo.insert(&entry).await {
                tracing::warn!(
                    action = %entry.action,
                    error = %e,
                    "Failed to record activity log entry"
                );
            }
        });
    }

    /// List log entries, newest first, keyset-paged on (created_at, id).
    ///
    /// The acting user's name is joined in; it is NULL for public actions
    /// and for users deleted since.
    pub async fn list(
        &self,
        limit: i64,
        after: Option<(DateTime<Utc>, Uuid)>,
    ) -> Result<Vec<ActivityLogEntity>, sqlx::Error> {
        match after {
            Some((created_at, id)) => {
                sqlx::query_as::<_, ActivityLogEntity>(
                    r#"
                    SELECT l.id, l.user_id, u.name AS user_name, l.action,
                           l.entity_type, l.entity_id, l.details, l.created_at
                    FROM activity_log l
                    LEFT JOIN users u ON u.id = l.user_id
                    WHERE (l.created_at, l.id) < ($1, $2)
                    ORDER BY l.created_at DESC, l.id DESC
                    LIMIT $3
                    "#,
                )
                .bind(created_at)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ActivityLogEntity>(
                    r#"
                    SELECT l.id, l.user_id, u.name AS user_name, l.action,
                           l.entity_type, l.entity_id, l.details, l.created_at
                    FROM activity_log l
                    LEFT JOIN users u ON u.id = l.user_id
                    ORDER BY l.created_at DESC, l.id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
    }
}
