//! Application services.

pub mod auth;
pub mod bootstrap;
pub mod export;
pub mod qr;
pub mod registration;
pub mod storage;
pub mod whatsapp;

#[allow(unused_imports)] // Used in routes
pub use auth::AuthService;
#[allow(unused_imports)] // Used in routes
pub use registration::{RegistrationError, RegistrationService};
#[allow(unused_imports)] // Used in routes
pub use storage::FileStorage;
#[allow(unused_imports)] // Used at startup
pub use whatsapp::{DisabledNotificationService, WhatsAppNotificationService};
