//! Contact message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the contact_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct ContactMessageEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessageEntity> for domain::models::ContactMessage {
    fn from(entity: ContactMessageEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}
