//! Activity domain models and the quota/status state machine.
//!
//! An Activity belongs to a Year and moves through `upcoming → open → closed`.
//! Opening and reopening are always explicit admin actions; closing happens
//! either by admin action or automatically when the registrant count reaches
//! the quota.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Activity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Competition,
    NonCompetition,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Competition => "competition",
            ActivityKind::NonCompetition => "non_competition",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "competition" => Ok(ActivityKind::Competition),
            "non_competition" => Ok(ActivityKind::NonCompetition),
            _ => Err(format!("Invalid activity kind: {}", s)),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Activity lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Upcoming,
    Open,
    Closed,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Upcoming => "upcoming",
            ActivityStatus::Open => "open",
            ActivityStatus::Closed => "closed",
        }
    }
}

impl FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(ActivityStatus::Upcoming),
            "open" => Ok(ActivityStatus::Open),
            "closed" => Ok(ActivityStatus::Closed),
            _ => Err(format!("Invalid activity status: {}", s)),
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A competition or non-competition event belonging to a Year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub year_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    /// Maximum registrant count. `None` means unlimited.
    pub quota: Option<i32>,
    pub guideline_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Whether the quota is reached given the current registrant count.
    pub fn is_full(&self, registrant_count: i64) -> bool {
        match self.quota {
            None => false,
            Some(quota) => registrant_count >= i64::from(quota),
        }
    }

    /// Whether a new registration would be accepted right now.
    pub fn can_register(&self, registrant_count: i64) -> bool {
        self.status == ActivityStatus::Open && !self.is_full(registrant_count)
    }
}

/// Request to create an activity under a year.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: ActivityKind,
    #[serde(default)]
    pub status: Option<ActivityStatus>,
    #[validate(range(min = 0, message = "Quota must not be negative"))]
    pub quota: Option<i32>,
}

/// Request to update an activity. Full replace: absent date or quota clears
/// the field (quota back to unlimited).
///
/// `status` here is the manual override path: an admin may set any status at
/// any time, including reopening a closed activity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    #[validate(range(min = 0, message = "Quota must not be negative"))]
    pub quota: Option<i32>,
}

/// Activity payload for API responses, with the derived registration flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Uuid,
    pub year_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub kind: ActivityKind,
    pub status: ActivityStatus,
    pub quota: Option<i32>,
    pub registered_count: i64,
    pub is_full: bool,
    pub can_register: bool,
    pub has_guideline: bool,
    pub created_at: DateTime<Utc>,
}

impl ActivityResponse {
    /// Build a response from an activity and its current registrant count.
    pub fn from_activity(activity: Activity, registrant_count: i64) -> Self {
        let is_full = activity.is_full(registrant_count);
        let can_register = activity.can_register(registrant_count);
        Self {
            id: activity.id,
            year_id: activity.year_id,
            title: activity.title,
            description: activity.description,
            date: activity.date,
            kind: activity.kind,
            status: activity.status,
            quota: activity.quota,
            registered_count: registrant_count,
            is_full,
            can_register,
            has_guideline: activity.guideline_file.is_some(),
            created_at: activity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(status: ActivityStatus, quota: Option<i32>) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            year_id: Uuid::new_v4(),
            title: "Slide Design Sprint".to_string(),
            description: None,
            date: None,
            kind: ActivityKind::Competition,
            status,
            quota,
            guideline_file: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_activity_kind_round_trip() {
        assert_eq!(
            ActivityKind::from_str("competition").unwrap(),
            ActivityKind::Competition
        );
        assert_eq!(
            ActivityKind::from_str("NON_COMPETITION").unwrap(),
            ActivityKind::NonCompetition
        );
        assert!(ActivityKind::from_str("workshop").is_err());
        assert_eq!(ActivityKind::NonCompetition.to_string(), "non_competition");
    }

    #[test]
    fn test_activity_status_round_trip() {
        assert_eq!(
            ActivityStatus::from_str("upcoming").unwrap(),
            ActivityStatus::Upcoming
        );
        assert_eq!(ActivityStatus::from_str("OPEN").unwrap(), ActivityStatus::Open);
        assert_eq!(
            ActivityStatus::from_str("closed").unwrap(),
            ActivityStatus::Closed
        );
        assert!(ActivityStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_is_full_without_quota() {
        let activity = activity(ActivityStatus::Open, None);
        assert!(!activity.is_full(0));
        assert!(!activity.is_full(10_000));
    }

    #[test]
    fn test_is_full_with_quota() {
        let activity = activity(ActivityStatus::Open, Some(3));
        assert!(!activity.is_full(2));
        assert!(activity.is_full(3));
        assert!(activity.is_full(4));
    }

    #[test]
    fn test_zero_quota_is_always_full() {
        let activity = activity(ActivityStatus::Open, Some(0));
        assert!(activity.is_full(0));
        assert!(!activity.can_register(0));
    }

    #[test]
    fn test_can_register_requires_open_status() {
        for status in [ActivityStatus::Upcoming, ActivityStatus::Closed] {
            let activity = activity(status, None);
            assert!(!activity.can_register(0));
        }

        let activity = activity(ActivityStatus::Open, Some(5));
        assert!(activity.can_register(4));
        assert!(!activity.can_register(5));
    }

    #[test]
    fn test_response_derived_flags() {
        let mut a = activity(ActivityStatus::Open, Some(2));
        a.guideline_file = Some("abc123.pdf".to_string());

        let response = ActivityResponse::from_activity(a, 2);
        assert!(response.is_full);
        assert!(!response.can_register);
        assert!(response.has_guideline);
        assert_eq!(response.registered_count, 2);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("canRegister"));
        assert!(json.contains("isFull"));
        assert!(json.contains("hasGuideline"));
    }
}
