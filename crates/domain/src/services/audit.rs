//! Activity logging service.
//!
//! Provides convenient constructors for log entries created from route
//! handlers. Insertion itself lives in the persistence layer and never
//! blocks the response on failure.

/// Convenience functions for common log entry patterns.
pub mod log_helpers {
    use crate::models::activity_log::{CreateLogEntry, LogAction};
    use uuid::Uuid;

    /// Log entry for a successful admin login.
    pub fn login(user_id: Uuid, email: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::Login)
            .on_entity("user", user_id.to_string())
            .with_details(format!("Signed in as {}", email))
    }

    /// Log entry for year creation.
    pub fn year_created(user_id: Uuid, year_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::YearCreate)
            .on_entity("year", year_id.to_string())
            .with_details(format!("Created year '{}'", name))
    }

    /// Log entry for year update.
    pub fn year_updated(user_id: Uuid, year_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::YearUpdate)
            .on_entity("year", year_id.to_string())
            .with_details(format!("Updated year '{}'", name))
    }

    /// Log entry for year deletion.
    pub fn year_deleted(user_id: Uuid, year_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::YearDelete)
            .on_entity("year", year_id.to_string())
            .with_details(format!("Deleted year '{}'", name))
    }

    /// Log entry for activating a year.
    pub fn year_activated(user_id: Uuid, year_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::YearActivate)
            .on_entity("year", year_id.to_string())
            .with_details(format!("Activated year '{}'", name))
    }

    /// Log entry for activity creation.
    pub fn activity_created(user_id: Uuid, activity_id: Uuid, title: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::ActivityCreate)
            .on_entity("activity", activity_id.to_string())
            .with_details(format!("Created activity '{}'", title))
    }

    /// Log entry for activity update.
    pub fn activity_updated(user_id: Uuid, activity_id: Uuid, title: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::ActivityUpdate)
            .on_entity("activity", activity_id.to_string())
            .with_details(format!("Updated activity '{}'", title))
    }

    /// Log entry for activity deletion.
    pub fn activity_deleted(user_id: Uuid, activity_id: Uuid, title: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::ActivityDelete)
            .on_entity("activity", activity_id.to_string())
            .with_details(format!("Deleted activity '{}'", title))
    }

    /// Log entry for a guideline PDF upload.
    pub fn guideline_uploaded(user_id: Uuid, activity_id: Uuid, title: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::GuidelineUpload)
            .on_entity("activity", activity_id.to_string())
            .with_details(format!("Uploaded guideline for '{}'", title))
    }

    /// Log entry for a registrant status change.
    pub fn registrant_status_changed(
        user_id: Uuid,
        registrant_id: Uuid,
        status: &str,
    ) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::RegistrantStatusChange)
            .on_entity("registrant", registrant_id.to_string())
            .with_details(format!("Status set to {}", status))
    }

    /// Log entry for marking attendance. `user_id` is absent when attendance
    /// came in through a public QR scan rather than an admin action.
    pub fn registrant_attended(
        user_id: Option<Uuid>,
        registrant_id: Uuid,
        name: &str,
    ) -> CreateLogEntry {
        CreateLogEntry::new(user_id, LogAction::RegistrantAttend)
            .on_entity("registrant", registrant_id.to_string())
            .with_details(format!("Marked {} as attended", name))
    }

    /// Log entry for a gallery upload.
    pub fn gallery_uploaded(user_id: Uuid, image_id: Uuid) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::GalleryUpload)
            .on_entity("gallery_image", image_id.to_string())
    }

    /// Log entry for toggling an image's featured flag.
    pub fn gallery_featured(user_id: Uuid, image_id: Uuid, featured: bool) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::GalleryFeature)
            .on_entity("gallery_image", image_id.to_string())
            .with_details(if featured { "Featured" } else { "Unfeatured" })
    }

    /// Log entry for deleting a gallery image.
    pub fn gallery_deleted(user_id: Uuid, image_id: Uuid) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::GalleryDelete)
            .on_entity("gallery_image", image_id.to_string())
    }

    /// Log entry for sponsor creation.
    pub fn sponsor_created(user_id: Uuid, sponsor_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::SponsorCreate)
            .on_entity("sponsor", sponsor_id.to_string())
            .with_details(format!("Created sponsor '{}'", name))
    }

    /// Log entry for sponsor update.
    pub fn sponsor_updated(user_id: Uuid, sponsor_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::SponsorUpdate)
            .on_entity("sponsor", sponsor_id.to_string())
            .with_details(format!("Updated sponsor '{}'", name))
    }

    /// Log entry for sponsor deletion.
    pub fn sponsor_deleted(user_id: Uuid, sponsor_id: Uuid, name: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::SponsorDelete)
            .on_entity("sponsor", sponsor_id.to_string())
            .with_details(format!("Deleted sponsor '{}'", name))
    }

    /// Log entry for About page edits.
    pub fn about_updated(user_id: Uuid) -> CreateLogEntry {
        CreateLogEntry::new(Some(user_id), LogAction::AboutUpdate).on_entity("about", "1")
    }

    /// Log entry for admin user creation.
    pub fn user_created(actor_id: Uuid, new_user_id: Uuid, email: &str) -> CreateLogEntry {
        CreateLogEntry::new(Some(actor_id), LogAction::UserCreate)
            .on_entity("user", new_user_id.to_string())
            .with_details(format!("Created account {}", email))
    }
}
