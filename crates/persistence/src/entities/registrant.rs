//! Registrant entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Registrant, RegistrantStatus};

/// Database row mapping for the registrants table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrantEntity {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub school: String,
    pub phone: Option<String>,
    pub email: String,
    pub status: String,
    pub check_in_code: Option<String>,
    pub attended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<RegistrantEntity> for Registrant {
    fn from(entity: RegistrantEntity) -> Self {
        Self {
            id: entity.id,
            activity_id: entity.activity_id,
            name: entity.name,
            school: entity.school,
            phone: entity.phone,
            email: entity.email,
            status: RegistrantStatus::parse_or_pending(&entity.status),
            check_in_code: entity.check_in_code,
            attended_at: entity.attended_at,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_registrant_entity() -> RegistrantEntity {
        RegistrantEntity {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            name: "Siti Rahma".to_string(),
            school: "SMA Negeri 1".to_string(),
            phone: Some("+628123456789".to_string()),
            email: "siti@example.com".to_string(),
            status: "verified".to_string(),
            check_in_code: Some("AbCdEfGh23456789".to_string()),
            attended_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_registrant_entity_to_domain() {
        let entity = create_test_registrant_entity();
        let registrant: Registrant = entity.clone().into();

        assert_eq!(registrant.id, entity.id);
        assert_eq!(registrant.school, entity.school);
        assert_eq!(registrant.status, RegistrantStatus::Verified);
        assert_eq!(registrant.check_in_code, entity.check_in_code);
    }

    #[test]
    fn test_unknown_status_coerces_to_pending() {
        let mut entity = create_test_registrant_entity();
        entity.status = "cancelled".to_string();

        let registrant: Registrant = entity.into();
        assert_eq!(registrant.status, RegistrantStatus::Pending);
    }
}
