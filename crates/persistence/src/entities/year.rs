//! Event year entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the years table.
#[derive(Debug, Clone, FromRow)]
pub struct YearEntity {
    pub id: Uuid,
    pub name: String,
    pub theme: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<YearEntity> for domain::models::Year {
    fn from(entity: YearEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            theme: entity.theme,
            active: entity.active,
            created_at: entity.created_at,
        }
    }
}
