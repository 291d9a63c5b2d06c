//! Event year domain models.
//!
//! A Year is the top-level container for one event cycle. At most one Year
//! is active at a time; activating one deactivates all others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use uuid::Uuid;

/// Fallback theme shown publicly when the active year has none stored.
pub const DEFAULT_THEME: &str = "Dari Acara ke Prestasi";

/// A yearly edition of the event, e.g. "2025" or "2025/2026".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Year {
    pub id: Uuid,
    pub name: String,
    pub theme: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create a year.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateYearRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Theme must be at most 255 characters"))]
    pub theme: Option<String>,
}

/// Request to update a year. Full replace: an absent theme clears it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateYearRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,
    #[validate(length(max = 255, message = "Theme must be at most 255 characters"))]
    pub theme: Option<String>,
}
