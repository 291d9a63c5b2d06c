//! Repository implementations for database operations.

pub mod about;
pub mod activity;
pub mod activity_log;
pub mod contact;
pub mod dashboard;
pub mod gallery;
pub mod registrant;
pub mod sponsor;
pub mod user;
pub mod year;

pub use about::AboutRepository;
pub use activity::ActivityRepository;
pub use activity_log::ActivityLogRepository;
pub use contact::ContactRepository;
pub use dashboard::DashboardRepository;
pub use gallery::GalleryRepository;
pub use registrant::{MarkAttendedOutcome, RegistrantRepository};
pub use sponsor::SponsorRepository;
pub use user::UserRepository;
pub use year::YearRepository;
