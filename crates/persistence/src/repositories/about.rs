//! About page repository for database operations.

use sqlx::PgPool;

use crate::entities::AboutEntity;

use domain::models::DEFAULT_ABOUT_TITLE;

/// Repository for the singleton About page row.
#[derive(Clone)]
pub struct AboutRepository {
    pool: PgPool,
}

impl AboutRepository {
    /// Creates a new AboutRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fetch the About row, creating it with defaults on first access.
    pub async fn get_or_create(&self) -> Result<AboutEntity, sqlx::Error> {
        if let Some(existing) = sqlx::query_as::<_, AboutEntity>(
            r#"
            SELECT id, title, description, goals, location
            FROM about
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        {
            return Ok(existing);
        }

        sqlx::query_as::<_, AboutEntity>(
            r#"
            INSERT INTO about (title)
            VALUES ($1)
            RETURNING id, title, description, goals, location
            "#,
        )
        .bind(DEFAULT_ABOUT_TITLE)
        .fetch_one(&self.pool)
        .await
    }

    /// Replace the About page content.
    pub async fn update(
        &self,
        title: &str,
        description: Option<&str>,
        goals: Option<&str>,
        location: Option<&str>,
    ) -> Result<AboutEntity, sqlx::Error> {
        let current = self.get_or_create().await?;
        sqlx::query_as::<_, AboutEntity>(
            r#"
            UPDATE about
            SET title = $1, description = $2, goals = $3, location = $4
            WHERE id = $5
            RETURNING id, title, description, goals, location
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(goals)
        .bind(location)
        .bind(current.id)
        .fetch_one(&self.pool)
        .await
    }
}
