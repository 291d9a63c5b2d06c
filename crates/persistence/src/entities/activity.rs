//! Activity entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{Activity, ActivityKind, ActivityStatus};

/// Database row mapping for the activities table.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub year_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: String,
    pub status: String,
    pub quota: Option<i32>,
    pub guideline_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ActivityEntity> for Activity {
    fn from(entity: ActivityEntity) -> Self {
        Self {
            id: entity.id,
            year_id: entity.year_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            kind: ActivityKind::from_str(&entity.kind).unwrap_or(ActivityKind::Competition), // Default fallback
            status: ActivityStatus::from_str(&entity.status).unwrap_or(ActivityStatus::Upcoming), // Default fallback
            quota: entity.quota,
            guideline_file: entity.guideline_file,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for an activity joined with its registrant count.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityWithCountEntity {
    pub id: Uuid,
    pub year_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: String,
    pub status: String,
    pub quota: Option<i32>,
    pub guideline_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub registrant_count: i64,
}

impl ActivityWithCountEntity {
    /// Split into the activity and its registrant count.
    pub fn into_parts(self) -> (Activity, i64) {
        let count = self.registrant_count;
        let activity = Activity::from(ActivityEntity {
            id: self.id,
            year_id: self.year_id,
            title: self.title,
            description: self.description,
            date: self.date,
            kind: self.kind,
            status: self.status,
            quota: self.quota,
            guideline_file: self.guideline_file,
            created_at: self.created_at,
        });
        (activity, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_activity_entity() -> ActivityEntity {
        ActivityEntity {
            id: Uuid::new_v4(),
            year_id: Uuid::new_v4(),
            title: "Speech Contest".to_string(),
            description: Some("Inter-school speech contest".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 9, 20),
            kind: "competition".to_string(),
            status: "open".to_string(),
            quota: Some(50),
            guideline_file: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_activity_entity_to_domain() {
        let entity = create_test_activity_entity();
        let activity: Activity = entity.clone().into();

        assert_eq!(activity.id, entity.id);
        assert_eq!(activity.title, entity.title);
        assert_eq!(activity.kind, ActivityKind::Competition);
        assert_eq!(activity.status, ActivityStatus::Open);
        assert_eq!(activity.quota, Some(50));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_competition() {
        let mut entity = create_test_activity_entity();
        entity.kind = "unknown-kind".to_string();

        let activity: Activity = entity.into();
        assert_eq!(activity.kind, ActivityKind::Competition);
    }

    #[test]
    fn test_unknown_status_falls_back_to_upcoming() {
        let mut entity = create_test_activity_entity();
        entity.status = "bogus".to_string();

        let activity: Activity = entity.into();
        assert_eq!(activity.status, ActivityStatus::Upcoming);
    }

    #[test]
    fn test_with_count_into_parts() {
        let base = create_test_activity_entity();
        let entity = ActivityWithCountEntity {
            id: base.id,
            year_id: base.year_id,
            title: base.title.clone(),
            description: base.description.clone(),
            date: base.date,
            kind: base.kind.clone(),
            status: base.status.clone(),
            quota: base.quota,
            guideline_file: base.guideline_file.clone(),
            created_at: base.created_at,
            registrant_count: 17,
        };

        let (activity, count) = entity.into_parts();
        assert_eq!(activity.id, base.id);
        assert_eq!(count, 17);
    }
}
