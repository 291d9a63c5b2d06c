//! WhatsApp gateway notification service.
//!
//! Implements the NotificationService trait by posting registration
//! confirmations to a WhatsApp HTTP gateway webhook.

use std::time::Duration;

use domain::services::{deliverable_phone, NotificationResult, NotificationService, WhatsAppMessage};
use reqwest::Client;

use crate::config::WhatsAppConfig;
use crate::middleware::metrics::record_whatsapp_message;

/// Error type for WhatsApp gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Gateway error: {0}")]
    GatewayError(String),

    #[error("WhatsApp sending is not enabled")]
    NotEnabled,
}

/// WhatsApp notification service posting to the configured gateway.
pub struct WhatsAppNotificationService {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppNotificationService {
    /// Create a new WhatsApp notification service.
    ///
    /// # Errors
    /// Returns an error if sending is disabled in the configuration or the
    /// HTTP client cannot be constructed.
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        if !config.enabled {
            return Err(WhatsAppError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Post a message to the gateway webhook.
    async fn post_message(&self, message: &WhatsAppMessage) -> Result<(), WhatsAppError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WhatsAppError::GatewayError(format!(
                "{}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Stand-in notifier used when the gateway is disabled or misconfigured.
/// Every send is recorded as skipped.
pub struct DisabledNotificationService;

#[async_trait::async_trait]
impl NotificationService for DisabledNotificationService {
    async fn send_registration_confirmation(
        &self,
        message: WhatsAppMessage,
    ) -> NotificationResult {
        tracing::debug!(
            phone = %message.phone,
            "WhatsApp sending disabled; confirmation skipped"
        );
        record_whatsapp_message("skipped");
        NotificationResult::Skipped
    }
}

#[async_trait::async_trait]
impl NotificationService for WhatsAppNotificationService {
    async fn send_registration_confirmation(
        &self,
        mut message: WhatsAppMessage,
    ) -> NotificationResult {
        match deliverable_phone(&message.phone) {
            Some(phone) => message.phone = phone,
            None => {
                tracing::debug!(
                    phone = %message.phone,
                    "Skipping WhatsApp confirmation for unusable phone number"
                );
                record_whatsapp_message("skipped");
                return NotificationResult::Skipped;
            }
        }

        match self.post_message(&message).await {
            Ok(()) => {
                tracing::info!(
                    phone = %message.phone,
                    "WhatsApp confirmation sent"
                );
                record_whatsapp_message("sent");
                NotificationResult::Sent
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    phone = %message.phone,
                    "Failed to send WhatsApp confirmation"
                );
                record_whatsapp_message("failed");
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_not_enabled_error() {
        let config = WhatsAppConfig {
            enabled: false,
            ..Default::default()
        };
        let result = WhatsAppNotificationService::new(config);
        assert!(matches!(result, Err(WhatsAppError::NotEnabled)));
    }

    #[test]
    fn test_whatsapp_enabled_builds_client() {
        let config = WhatsAppConfig {
            enabled: true,
            api_url: "http://localhost:9999/send".to_string(),
            api_token: "secret".to_string(),
            timeout_secs: 5,
        };
        assert!(WhatsAppNotificationService::new(config).is_ok());
    }

    #[tokio::test]
    async fn test_unusable_phone_is_skipped_without_network() {
        let config = WhatsAppConfig {
            enabled: true,
            api_url: "http://localhost:9999/send".to_string(),
            api_token: "secret".to_string(),
            timeout_secs: 1,
        };
        let service = WhatsAppNotificationService::new(config).unwrap();

        for phone in ["", "1234", "not a phone"] {
            let message = WhatsAppMessage {
                phone: phone.to_string(),
                message: "hello".to_string(),
            };
            let result = service.send_registration_confirmation(message).await;
            assert!(matches!(result, NotificationResult::Skipped));
        }
    }

    #[test]
    fn test_whatsapp_error_display() {
        let error = WhatsAppError::GatewayError("503: unavailable".to_string());
        assert_eq!(format!("{}", error), "Gateway error: 503: unavailable");
    }

    #[tokio::test]
    async fn test_disabled_service_skips_everything() {
        let message = WhatsAppMessage {
            phone: "+6281234567890".to_string(),
            message: "hello".to_string(),
        };
        let result = DisabledNotificationService
            .send_registration_confirmation(message)
            .await;
        assert!(matches!(result, NotificationResult::Skipped));
    }
}
