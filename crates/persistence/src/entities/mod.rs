//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod about;
pub mod activity;
pub mod activity_log;
pub mod contact;
pub mod gallery;
pub mod registrant;
pub mod sponsor;
pub mod user;
pub mod year;

pub use about::AboutEntity;
pub use activity::{ActivityEntity, ActivityWithCountEntity};
pub use activity_log::ActivityLogEntity;
pub use contact::ContactMessageEntity;
pub use gallery::GalleryImageEntity;
pub use registrant::RegistrantEntity;
pub use sponsor::SponsorEntity;
pub use user::{UserEntity, UserSessionEntity};
pub use year::YearEntity;
