//! Domain services for Go Slides.
//!
//! Services contain business logic that operates on domain models.

pub mod audit;
pub mod notification;

pub use audit::log_helpers;
pub use notification::{
    deliverable_phone, MockNotificationService, NotificationResult, NotificationService,
    WhatsAppMessage,
};
