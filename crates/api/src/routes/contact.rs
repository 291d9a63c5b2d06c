//! Contact message API routes.
//!
//! The public form stores messages; admins read them. There is no reply
//! machinery, follow-up happens over email.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::{ContactMessage, CreateContactMessageRequest};
use persistence::repositories::ContactRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/v1/public/contact
///
/// Store a contact form submission. Rate limited alongside registration.
pub async fn submit_contact_message(
    State(state): State<AppState>,
    Json(request): Json<CreateContactMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = ContactRepository::new(state.pool.clone());
    let entity = repo
        .create(&request.name, &request.email, &request.message)
        .await?;

    info!(message_id = %entity.id, "Contact message received");

    let message: ContactMessage = entity.into();
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/v1/admin/messages
///
/// All contact messages, newest first.
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ContactRepository::new(state.pool.clone());
    let messages: Vec<ContactMessage> = repo.list().await?.into_iter().map(Into::into).collect();
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_request_validation() {
        let json = r#"{
            "name": "Rina",
            "email": "rina@example.com",
            "message": "When does registration for the quiz bowl open?"
        }"#;

        let request: CreateContactMessageRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_contact_request_rejects_empty_message() {
        let request = CreateContactMessageRequest {
            name: "Rina".to_string(),
            email: "rina@example.com".to_string(),
            message: String::new(),
        };
        assert!(request.validate().is_err());

        let request = CreateContactMessageRequest {
            name: "Rina".to_string(),
            email: "rina@example.com".to_string(),
            message: "x".repeat(5001),
        };
        assert!(request.validate().is_err());
    }
}
