//! Gallery image domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How many featured images the public gallery endpoint returns at most.
pub const FEATURED_LIMIT: i64 = 8;

/// An uploaded gallery image. Belongs to a Year, optionally pinned to one
/// of its Activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: Uuid,
    pub year_id: Uuid,
    pub activity_id: Option<Uuid>,
    pub file: String,
    pub caption: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Metadata accompanying a gallery upload. The image itself arrives as a
/// multipart file part and the owning activity comes from the URL.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadGalleryImageRequest {
    #[validate(length(max = 512, message = "Caption must be at most 512 characters"))]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Request to toggle the featured flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFeaturedRequest {
    pub is_featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_image_serializes_camel_case() {
        let image = GalleryImage {
            id: Uuid::new_v4(),
            year_id: Uuid::new_v4(),
            activity_id: None,
            file: "9f8a7b6c.jpg".to_string(),
            caption: Some("Opening ceremony".to_string()),
            is_featured: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&image).unwrap();
        assert!(json.contains("isFeatured"));
        assert!(json.contains("yearId"));
        assert!(json.contains(r#""activityId":null"#));
    }
}
