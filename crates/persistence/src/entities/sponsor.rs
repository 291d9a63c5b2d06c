//! Sponsor entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sponsors table.
#[derive(Debug, Clone, FromRow)]
pub struct SponsorEntity {
    pub id: Uuid,
    pub year_id: Uuid,
    pub name: String,
    pub logo: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SponsorEntity> for domain::models::Sponsor {
    fn from(entity: SponsorEntity) -> Self {
        Self {
            id: entity.id,
            year_id: entity.year_id,
            name: entity.name,
            logo: entity.logo,
            link: entity.link,
            created_at: entity.created_at,
        }
    }
}
