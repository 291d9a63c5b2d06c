//! Public registration workflow.
//!
//! Ties the quota gate, check-in code allocation and WhatsApp confirmation
//! together. The confirmation is fired on a background task so a slow or
//! broken gateway never delays the registrant's response.

use std::sync::Arc;

use domain::models::{RegisterRequest, Registrant};
use domain::services::{NotificationResult, NotificationService, WhatsAppMessage};
use persistence::repositories::{ActivityRepository, RegistrantRepository};
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::metrics::{record_registration_created, record_whatsapp_message};

/// Error type for registration attempts.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Activity not found")]
    ActivityNotFound,

    #[error("Registration for this activity is closed")]
    Closed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registration workflow service.
pub struct RegistrationService {
    activities: ActivityRepository,
    registrants: RegistrantRepository,
    notifier: Arc<dyn NotificationService>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(pool: PgPool, notifier: Arc<dyn NotificationService>) -> Self {
        Self {
            activities: ActivityRepository::new(pool.clone()),
            registrants: RegistrantRepository::new(pool),
            notifier,
        }
    }

    /// Register a participant for an activity.
    ///
    /// The quota check here is advisory; `close_if_full` afterwards flips
    /// the activity to closed against the real count, so concurrent
    /// registrations can briefly overshoot the quota but the activity
    /// always ends up closed.
    pub async fn register(
        &self,
        activity_id: Uuid,
        request: &RegisterRequest,
    ) -> Result<Registrant, RegistrationError> {
        let (activity, registrant_count) = self
            .activities
            .find_with_count(activity_id)
            .await?
            .ok_or(RegistrationError::ActivityNotFound)?
            .into_parts();

        if !activity.can_register(registrant_count) {
            return Err(RegistrationError::Closed);
        }

        let registrant: Registrant = self
            .registrants
            .create(
                activity_id,
                &request.name,
                &request.school,
                request.phone.as_deref(),
                &request.email,
            )
            .await?
            .into();

        if self.activities.close_if_full(activity_id).await? {
            tracing::info!(
                activity_id = %activity_id,
                "Activity quota reached - registration closed"
            );
        }

        record_registration_created();
        tracing::info!(
            registrant_id = %registrant.id,
            activity_id = %activity_id,
            school = %registrant.school,
            "Registrant created"
        );

        match confirmation_for(&registrant, &activity.title) {
            Some(message) => {
                let notifier = Arc::clone(&self.notifier);
                tokio::spawn(async move {
                    if let NotificationResult::Failed(error) =
                        notifier.send_registration_confirmation(message).await
                    {
                        tracing::warn!(
                            error = %error,
                            "Registration confirmation not delivered"
                        );
                    }
                });
            }
            None => {
                record_whatsapp_message("skipped");
                tracing::debug!(
                    registrant_id = %registrant.id,
                    "No phone number - skipping WhatsApp confirmation"
                );
            }
        }

        Ok(registrant)
    }
}

/// Confirmation message for a registrant, when they left a phone number.
fn confirmation_for(registrant: &Registrant, activity_title: &str) -> Option<WhatsAppMessage> {
    let phone = registrant.phone.as_deref()?;
    Some(WhatsAppMessage::registration_confirmation(
        phone,
        &registrant.name,
        activity_title,
    ))
}
