//! Dashboard metrics domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How many characters of an activity title survive into a chart label.
pub const CHART_LABEL_MAX_CHARS: usize = 20;

/// How many days the registration trend covers.
pub const REGISTRATION_TREND_DAYS: i64 = 14;

/// Registrant counts by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrantTotals {
    pub total: i64,
    pub verified: i64,
    pub attended: i64,
}

/// Catalog entity counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogTotals {
    pub years: i64,
    pub activities: i64,
}

/// Registrant count for a single activity, labelled for chart rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ActivityRegistrationCount {
    pub activity_id: uuid::Uuid,
    pub label: String,
    pub count: i64,
}

/// Registrations created on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyRegistrationCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Complete dashboard metrics response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardMetrics {
    pub registrants: RegistrantTotals,
    pub catalog: CatalogTotals,
    pub per_activity: Vec<ActivityRegistrationCount>,
    pub daily_registrations: Vec<DailyRegistrationCount>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardMetrics {
    /// Create a new DashboardMetrics with the current timestamp.
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            ..Default::default()
        }
    }
}

/// Shorten an activity title for chart axes. Longer titles are cut at
/// [`CHART_LABEL_MAX_CHARS`] characters and suffixed with an ellipsis.
pub fn chart_label(title: &str) -> String {
    if title.chars().count() <= CHART_LABEL_MAX_CHARS {
        return title.to_string();
    }
    let truncated: String = title.chars().take(CHART_LABEL_MAX_CHARS).collect();
    format!("{}...", truncated)
}
