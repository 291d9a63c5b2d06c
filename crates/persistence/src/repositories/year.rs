//! Year repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::YearEntity;

/// Repository for event year database operations.
#[derive(Clone)]
pub struct YearRepository {
    pool: PgPool,
}

impl YearRepository {
    /// Creates a new YearRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a year. The very first year becomes active automatically so the
    /// public site is never without an edition.
    pub async fn create(&self, name: &str, theme: Option<&str>) -> Result<YearEntity, sqlx::Error> {
        sqlx::query_as::<_, YearEntity>(
            r#"
            INSERT INTO years (name, theme, active)
            VALUES ($1, $2, NOT EXISTS (SELECT 1 FROM years))
            RETURNING id, name, theme, active, created_at
            "#,
        )
        .bind(name)
        .bind(theme)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a year by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<YearEntity>, sqlx::Error> {
        sqlx::query_as::<_, YearEntity>(
            r#"
            SELECT id, name, theme, active, created_at
            FROM years
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find the currently active year, if any.
    pub async fn find_active(&self) -> Result<Option<YearEntity>, sqlx::Error> {
        sqlx::query_as::<_, YearEntity>(
            r#"
            SELECT id, name, theme, active, created_at
            FROM years
            WHERE active = true
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
    }

    /// List all years, newest first.
    pub async fn list(&self) -> Result<Vec<YearEntity>, sqlx::Error> {
        sqlx::query_as::<_, YearEntity>(
            r#"
            SELECT id, name, theme, active, created_at
            FROM years
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Replace a year's name and theme.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        theme: Option<&str>,
    ) -> Result<Option<YearEntity>, sqlx::Error> {
        sqlx::query_as::<_, YearEntity>(
            r#"
            UPDATE years
            SET name = $1, theme = $2
            WHERE id = $3
            RETURNING id, name, theme, active, created_at
            "#,
        )
        .bind(name)
        .bind(theme)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Make one year active and every other year inactive.
    ///
    /// Both steps run in a single transaction so there is never a window with
    /// zero or two active years. Returns false when the year does not exist.
    pub async fn activate(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE years
            SET active = false
            WHERE active = true
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE years
            SET active = true
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a year. Activities and registrants cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM years
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
