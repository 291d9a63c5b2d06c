//! Notification service for registration confirmations.
//!
//! Abstracts the WhatsApp gateway webhook so the registration flow never
//! depends on a live gateway. Delivery is best-effort: a failure is logged
//! and swallowed, never surfaced to the registrant.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Outgoing WhatsApp message payload, as posted to the gateway webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppMessage {
    pub phone: String,
    pub message: String,
}

impl WhatsAppMessage {
    /// Build the confirmation sent right after a successful registration.
    pub fn registration_confirmation(
        phone: impl Into<String>,
        registrant_name: &str,
        activity_title: &str,
    ) -> Self {
        Self {
            phone: phone.into(),
            message: format!(
                "Hi {}! You have registered for *{}* (Go Slides). We will verify your registration shortly.",
                registrant_name, activity_title
            ),
        }
    }
}

/// Return the gateway-ready form of a phone number, or None when it is
/// not deliverable.
///
/// Stored numbers predate today's validation rules, so the sender re-checks
/// the format (optional leading `+`, 7 to 15 digits) instead of trusting it.
pub fn deliverable_phone(raw: &str) -> Option<String> {
    let normalized = shared::validation::normalize_phone(raw)?;

    let digits = normalized.strip_prefix('+').unwrap_or(&normalized);
    if digits.len() < 7 || digits.len() > 15 {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(normalized)
}

/// Result of a notification send attempt.
#[derive(Debug, Clone)]
pub enum NotificationResult {
    /// Message was accepted by the gateway.
    Sent,
    /// Registrant has no usable phone number; nothing to send.
    Skipped,
    /// Delivery failed (non-blocking, logged only).
    Failed(String),
}

/// Notification service trait for sending registration confirmations.
#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Send a registration confirmation message.
    async fn send_registration_confirmation(&self, message: WhatsAppMessage)
        -> NotificationResult;
}

/// Mock notification service for development and testing.
///
/// Records every attempted message instead of sending it. Clones share the
/// recorded list, so a test can keep a handle while the app owns another.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationService {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Arc<Mutex<Vec<WhatsAppMessage>>>,
}

impl MockNotificationService {
    /// Create a new mock notification service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages attempted so far, in order.
    pub fn sent_messages(&self) -> Vec<WhatsAppMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationService for MockNotificationService {
    async fn send_registration_confirmation(
        &self,
        message: WhatsAppMessage,
    ) -> NotificationResult {
        self.sent.lock().unwrap().push(message.clone());

        if self.simulate_failure {
            tracing::warn!(
                phone = %message.phone,
                "Mock notification service simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            phone = %message.phone,
            message = %message.message,
            "Mock: Would send WhatsApp confirmation"
        );

        NotificationResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_confirmation_message_text() {
        let message = WhatsAppMessage::registration_confirmation(
            "+6281234567890",
            "Siti Rahma",
            "Slide Design Sprint",
        );

        assert_eq!(message.phone, "+6281234567890");
        assert_eq!(
            message.message,
            "Hi Siti Rahma! You have registered for *Slide Design Sprint* (Go Slides). \
             We will verify your registration shortly."
        );
    }

    #[test]
    fn test_deliverable_phone_strips_formatting() {
        assert_eq!(
            deliverable_phone("+62 812-3456-7890"),
            Some("+6281234567890".to_string())
        );
        assert_eq!(deliverable_phone("0812 345 678"), Some("0812345678".to_string()));
    }

    #[test]
    fn test_deliverable_phone_rejects_bad_input() {
        assert_eq!(deliverable_phone(""), None);
        assert_eq!(deliverable_phone("1234"), None); // too short
        assert_eq!(deliverable_phone("1234567890123456"), None); // too long
        assert_eq!(deliverable_phone("+62abc1234567"), None);
        assert_eq!(deliverable_phone("not a phone"), None);
    }

    #[test]
    fn test_message_serializes_expected_keys() {
        let message = WhatsAppMessage::registration_confirmation("+628111", "Budi", "Quiz Bowl");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["phone"], "+628111");
        assert!(json["message"].as_str().unwrap().contains("*Quiz Bowl*"));
    }

    #[tokio::test]
    async fn test_mock_notification_service_records_sends() {
        let service = MockNotificationService::new();
        let message = WhatsAppMessage::registration_confirmation("+6281112222", "Budi", "Quiz Bowl");

        let result = service.send_registration_confirmation(message.clone()).await;
        assert!(matches!(result, NotificationResult::Sent));
        assert_eq!(service.sent_messages(), vec![message]);
    }

    #[tokio::test]
    async fn test_mock_notification_service_failure_still_records() {
        let service = MockNotificationService::failing();
        let message = WhatsAppMessage::registration_confirmation("+6281112222", "Budi", "Quiz Bowl");

        let result = service.send_registration_confirmation(message).await;
        assert!(matches!(result, NotificationResult::Failed(_)));
        assert_eq!(service.sent_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_clones_share_recorded_messages() {
        let service = MockNotificationService::new();
        let handle = service.clone();

        let message = WhatsAppMessage::registration_confirmation("+6281112222", "Budi", "Quiz Bowl");
        service.send_registration_confirmation(message).await;

        assert_eq!(handle.sent_messages().len(), 1);
    }
}
