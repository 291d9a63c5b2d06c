//! Gallery repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GalleryImageEntity;

/// Repository for gallery image database operations.
#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    /// Creates a new GalleryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Record an uploaded image.
    pub async fn insert(
        &self,
        year_id: Uuid,
        activity_id: Option<Uuid>,
        file: &str,
        caption: Option<&str>,
        is_featured: bool,
    ) -> Result<GalleryImageEntity, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            INSERT INTO gallery_images (year_id, activity_id, file, caption, is_featured)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, year_id, activity_id, file, caption, is_featured, created_at
            "#,
        )
        .bind(year_id)
        .bind(activity_id)
        .bind(file)
        .bind(caption)
        .bind(is_featured)
        .fetch_one(&self.pool)
        .await
    }

    /// Find an image by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            SELECT id, year_id, activity_id, file, caption, is_featured, created_at
            FROM gallery_images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// List an activity's images, newest first.
    pub async fn list_by_activity(
        &self,
        activity_id: Uuid,
    ) -> Result<Vec<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            SELECT id, year_id, activity_id, file, caption, is_featured, created_at
            FROM gallery_images
            WHERE activity_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await
    }

    /// List a year's images, newest first.
    pub async fn list_by_year(&self, year_id: Uuid) -> Result<Vec<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            SELECT id, year_id, activity_id, file, caption, is_featured, created_at
            FROM gallery_images
            WHERE year_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(year_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Latest featured images across all years.
    pub async fn featured(&self, limit: i64) -> Result<Vec<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            SELECT id, year_id, activity_id, file, caption, is_featured, created_at
            FROM gallery_images
            WHERE is_featured = true
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Latest images across all years, featured or not. Homepage fallback
    /// when nothing is featured yet.
    pub async fn recent(&self, limit: i64) -> Result<Vec<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            SELECT id, year_id, activity_id, file, caption, is_featured, created_at
            FROM gallery_images
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Toggle the featured flag on an image.
    pub async fn set_featured(
        &self,
        id: Uuid,
        is_featured: bool,
    ) -> Result<Option<GalleryImageEntity>, sqlx::Error> {
        sqlx::query_as::<_, GalleryImageEntity>(
            r#"
            UPDATE gallery_images
            SET is_featured = $1
            WHERE id = $2
            RETURNING id, year_id, activity_id, file, caption, is_featured, created_at
            "#,
        )
        .bind(is_featured)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an image row. The stored file is the caller's problem.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM gallery_images
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
    // Note: GalleryRepository tests require database connection and are covered by integration tests
}
