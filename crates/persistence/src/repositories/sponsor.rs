//! Sponsor repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SponsorEntity;

/// Repository for sponsor database operations.
#[derive(Clone)]
pub struct SponsorRepository {
    pool: PgPool,
}

impl SponsorRepository {
    /// Creates a new SponsorRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a sponsor under a year.
    pub async fn create(
        &self,
        year_id: Uuid,
        name: &str,
        logo: &str,
        link: Option<&str>,
    ) -> Result<SponsorEntity, sqlx::Error> {
        sqlx::query_as::<_, SponsorEntity>(
            r#"
            INSERT INTO sponsors (year_id, name, logo, link)
            VALUES ($1, $2, $3, $4)
            RETURNING id, year_id, name, logo, link, created_at
            "#,
        )
        .bind(year_id)
        .bind(name)
        .bind(logo)
        .bind(link)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a sponsor by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SponsorEntity>, sqlx::Error> {
        sqlx::query_as::<_, SponsorEntity>(
            r#"
            SELECT id, year_id, name, logo, link, created_at
            FROM sponsors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List a year's sponsors, newest first.
    pub async fn list_by_year(&self, year_id: Uuid) -> Result<Vec<SponsorEntity>, sqlx::Error> {
        sqlx::query_as::<_, SponsorEntity>(
            r#"
            SELECT id, year_id, name, logo, link, created_at
            FROM sponsors
            WHERE year_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(year_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Update a sponsor. The logo is replaced only when a new filename is
    /// given; the link is always replaced so it can be cleared.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        logo: Option<&str>,
        link: Option<&str>,
        year_id: Option<Uuid>,
    ) -> Result<Option<SponsorEntity>, sqlx::Error> {
        sqlx::query_as::<_, SponsorEntity>(
            r#"
            UPDATE sponsors
            SET name = $1,
                logo = COALESCE($2, logo),
                link = $3,
                year_id = COALESCE($4, year_id)
            WHERE id = $5
            RETURNING id, year_id, name, logo, link, created_at
            "#,
        )
        .bind(name)
        .bind(logo)
        .bind(link)
        .bind(year_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a sponsor.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sponsors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    // Note: SponsorRepository tests require database connection and are covered by integration tests
}
