//! Activity log domain models.
//!
//! Every admin mutation is recorded as a log entry. Entries keep a
//! `user_id` reference that is nulled out when the user is deleted, so the
//! trail survives account removal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default page size when listing log entries.
pub const DEFAULT_LOG_LIMIT: i64 = 50;

/// Hard cap on the log page size.
pub const MAX_LOG_LIMIT: i64 = 100;

/// Logged actions following the format: entity.operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Login,

    YearCreate,
    YearUpdate,
    YearDelete,
    YearActivate,

    ActivityCreate,
    ActivityUpdate,
    ActivityDelete,
    GuidelineUpload,

    RegistrantStatusChange,
    RegistrantAttend,

    GalleryUpload,
    GalleryFeature,
    GalleryDelete,

    SponsorCreate,
    SponsorUpdate,
    SponsorDelete,

    AboutUpdate,

    UserCreate,
}

impl FromStr for LogAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth.login" => Ok(LogAction::Login),
            "year.create" => Ok(LogAction::YearCreate),
            "year.update" => Ok(LogAction::YearUpdate),
            "year.delete" => Ok(LogAction::YearDelete),
            "year.activate" => Ok(LogAction::YearActivate),
            "activity.create" => Ok(LogAction::ActivityCreate),
            "activity.update" => Ok(LogAction::ActivityUpdate),
            "activity.delete" => Ok(LogAction::ActivityDelete),
            "activity.guideline_upload" => Ok(LogAction::GuidelineUpload),
            "registrant.status_change" => Ok(LogAction::RegistrantStatusChange),
            "registrant.attend" => Ok(LogAction::RegistrantAttend),
            "gallery.upload" => Ok(LogAction::GalleryUpload),
            "gallery.feature" => Ok(LogAction::GalleryFeature),
            "gallery.delete" => Ok(LogAction::GalleryDelete),
            "sponsor.create" => Ok(LogAction::SponsorCreate),
            "sponsor.update" => Ok(LogAction::SponsorUpdate),
            "sponsor.delete" => Ok(LogAction::SponsorDelete),
            "about.update" => Ok(LogAction::AboutUpdate),
            "user.create" => Ok(LogAction::UserCreate),
            _ => Err(format!("Unknown log action: {}", s)),
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogAction::Login => "auth.login",
            LogAction::YearCreate => "year.create",
            LogAction::YearUpdate => "year.update",
            LogAction::YearDelete => "year.delete",
            LogAction::YearActivate => "year.activate",
            LogAction::ActivityCreate => "activity.create",
            LogAction::ActivityUpdate => "activity.update",
            LogAction::ActivityDelete => "activity.delete",
            LogAction::GuidelineUpload => "activity.guideline_upload",
            LogAction::RegistrantStatusChange => "registrant.status_change",
            LogAction::RegistrantAttend => "registrant.attend",
            LogAction::GalleryUpload => "gallery.upload",
            LogAction::GalleryFeature => "gallery.feature",
            LogAction::GalleryDelete => "gallery.delete",
            LogAction::SponsorCreate => "sponsor.create",
            LogAction::SponsorUpdate => "sponsor.update",
            LogAction::SponsorDelete => "sponsor.delete",
            LogAction::AboutUpdate => "about.update",
            LogAction::UserCreate => "user.create",
        };
        write!(f, "{}", s)
    }
}

/// A stored activity log entry, joined with the acting user's name when the
/// account still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new log entry.
#[derive(Debug, Clone)]
pub struct CreateLogEntry {
    pub user_id: Option<Uuid>,
    pub action: LogAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
}

impl CreateLogEntry {
    pub fn new(user_id: Option<Uuid>, action: LogAction) -> Self {
        Self {
            user_id,
            action,
            entity_type: None,
            entity_id: None,
            details: None,
        }
    }

    /// Set the entity being acted upon.
    pub fn on_entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Attach a human-readable detail line.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Query parameters for listing log entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

impl ListLogsQuery {
    /// Effective page size: default 50, capped at 100, floor 1.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LOG_LIMIT)
            .clamp(1, MAX_LOG_LIMIT)
    }
}

/// One page of log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogPage {
    pub entries: Vec<ActivityLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
