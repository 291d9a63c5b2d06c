//! About page content.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Default title used when the singleton row is first created.
pub const DEFAULT_ABOUT_TITLE: &str = "About Go Slides";

/// Singleton About page content, created on first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub location: Option<String>,
}

/// Request to update the About page. Full replace: absent optional fields
/// are cleared.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAboutRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub goals: Option<String>,
    #[validate(length(max = 512, message = "Location must be at most 512 characters"))]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title() {
        assert_eq!(DEFAULT_ABOUT_TITLE, "About Go Slides");
    }

    #[test]
    fn test_update_request_requires_title() {
        let request = UpdateAboutRequest {
            title: String::new(),
            description: None,
            goals: Some("Grow presentation literacy in high schools".to_string()),
            location: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateAboutRequest {
            title: "About the Festival".to_string(),
            description: Some("Annual student presentation festival".to_string()),
            goals: None,
            location: None,
        };
        assert!(request.validate().is_ok());
    }
}
