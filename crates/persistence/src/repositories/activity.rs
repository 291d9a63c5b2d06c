//! Activity repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ActivityEntity, ActivityWithCountEntity};
use crate::metrics::QueryTimer;

/// Repository for activity database operations.
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create an activity under a year.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        year_id: Uuid,
        title: &str,
        description: Option<&str>,
        date: Option<NaiveDate>,
        kind: &str,
        status: &str,
        quota: Option<i32>,
    ) -> Result<ActivityEntity, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntity>(
            r#"
            INSERT INTO activities (year_id, title, description, date, kind, status, quota)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, year_id, title, description, date, kind, status, quota,
                      guideline_file, created_at
            "#,
        )
        .bind(year_id)
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(kind)
        .bind(status)
        .bind(quota)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an activity by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ActivityEntity>, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT id, year_id, title, description, date, kind, status, quota,
                   guideline_file, created_at
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an activity together with its registrant count.
    pub async fn find_with_count(
        &self,
        id: Uuid,
    ) -> Result<Option<ActivityWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_activity_with_count");
        let result = sqlx::query_as::<_, ActivityWithCountEntity>(
            r#"
            SELECT a.id, a.year_id, a.title, a.description, a.date, a.kind, a.status,
                   a.quota, a.guideline_file, a.created_at,
                   (SELECT COUNT(*) FROM registrants r WHERE r.activity_id = a.id) AS registrant_count
            FROM activities a
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a year's activities with registrant counts.
    ///
    /// Dated activities come first in calendar order, undated ones last,
    /// newest-created first within a date.
    pub async fn list_by_year(
        &self,
        year_id: Uuid,
    ) -> Result<Vec<ActivityWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_activities_by_year");
        let result = sqlx::query_as::<_, ActivityWithCountEntity>(
            r#"
            SELECT a.id, a.year_id, a.title, a.description, a.date, a.kind, a.status,
                   a.quota, a.guideline_file, a.created_at,
                   (SELECT COUNT(*) FROM registrants r WHERE r.activity_id = a.id) AS registrant_count
            FROM activities a
            WHERE a.year_id = $1
            ORDER BY a.date ASC NULLS LAST, a.created_at DESC
            "#,
        )
        .bind(year_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace an activity's editable fields.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: &str,
        description: Option<&str>,
        date: Option<NaiveDate>,
        kind: &str,
        status: &str,
        quota: Option<i32>,
    ) -> Result<Option<ActivityEntity>, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntity>(
            r#"
            UPDATE activities
            SET title = $1, description = $2, date = $3, kind = $4, status = $5, quota = $6
            WHERE id = $7
            RETURNING id, year_id, title, description, date, kind, status, quota,
                      guideline_file, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(date)
        .bind(kind)
        .bind(status)
        .bind(quota)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Attach a stored guideline file to an activity.
    pub async fn set_guideline(&self, id: Uuid, filename: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET guideline_file = $1
            WHERE id = $2
            "#,
        )
        .bind(filename)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an activity. Registrants cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count registrants for an activity.
    pub async fn registrant_count(&self, activity_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) as count
            FROM registrants
            WHERE activity_id = $1
            "#,
        )
        .bind(activity_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    /// Close the activity when its quota is reached.
    ///
    /// Count and status flip happen in one statement so a stale in-process
    /// count can never close an activity that still has room. Returns true
    /// when the activity was closed by this call.
    pub async fn close_if_full(&self, activity_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("close_activity_if_full");
        let result = sqlx::query(
            r#"
            UPDATE activities
            SET status = 'closed'
            WHERE id = $1
              AND status <> 'closed'
              AND quota IS NOT NULL
              AND quota <= (SELECT COUNT(*) FROM registrants WHERE activity_id = $1)
            "#,
        )
        .bind(activity_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
