//! Sponsor domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A sponsor shown on the public site for one Year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: Uuid,
    pub year_id: Uuid,
    pub name: String,
    pub logo: String,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metadata accompanying a sponsor create/update (the logo arrives as a
/// multipart file part and is optional on update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SponsorRequest {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: String,
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 255, message = "Link must be at most 255 characters"))]
    pub link: Option<String>,
    pub year_id: Option<Uuid>,
}
