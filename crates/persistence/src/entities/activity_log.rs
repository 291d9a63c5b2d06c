//! Activity log entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the activity_log table joined with the acting
/// user's name. `user_name` is NULL for system or public actions and for
/// deleted users.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityLogEntity> for domain::models::ActivityLog {
    fn from(entity: ActivityLogEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            user_name: entity.user_name,
            action: entity.action,
            entity_type: entity.entity_type,
            entity_id: entity.entity_id,
            details: entity.details,
            created_at: entity.created_at,
        }
    }
}
