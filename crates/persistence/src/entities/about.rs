//! About page entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the about table (single-row content).
#[derive(Debug, Clone, FromRow)]
pub struct AboutEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub location: Option<String>,
}

impl From<AboutEntity> for domain::models::About {
    fn from(entity: AboutEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            goals: entity.goals,
            location: entity.location,
        }
    }
}
