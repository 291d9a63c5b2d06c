//! Gallery image entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the gallery_images table.
#[derive(Debug, Clone, FromRow)]
pub struct GalleryImageEntity {
    pub id: Uuid,
    pub year_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub file: String,
    pub caption: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl From<GalleryImageEntity> for domain::models::GalleryImage {
    fn from(entity: GalleryImageEntity) -> Self {
        Self {
            id: entity.id,
            year_id: entity.year_id,
            activity_id: entity.activity_id,
            file: entity.file,
            caption: entity.caption,
            is_featured: entity.is_featured,
            created_at: entity.created_at,
        }
    }
}
