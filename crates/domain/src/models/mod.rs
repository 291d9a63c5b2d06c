//! Domain models for Go Slides.

pub mod about;
pub mod activity;
pub mod activity_log;
pub mod check_in;
pub mod contact;
pub mod dashboard;
pub mod gallery;
pub mod registrant;
pub mod sponsor;
pub mod user;
pub mod year;

pub use about::{About, UpdateAboutRequest, DEFAULT_ABOUT_TITLE};
pub use activity::{
    Activity, ActivityKind, ActivityResponse, ActivityStatus, CreateActivityRequest,
    UpdateActivityRequest,
};
pub use activity_log::{
    ActivityLog, ActivityLogPage, CreateLogEntry, ListLogsQuery, LogAction, DEFAULT_LOG_LIMIT,
    MAX_LOG_LIMIT,
};
pub use check_in::CheckInResult;
pub use contact::{ContactMessage, CreateContactMessageRequest};
pub use dashboard::{
    chart_label, ActivityRegistrationCount, CatalogTotals, DailyRegistrationCount,
    DashboardMetrics, RegistrantTotals, CHART_LABEL_MAX_CHARS, REGISTRATION_TREND_DAYS,
};
pub use gallery::{GalleryImage, SetFeaturedRequest, UploadGalleryImageRequest, FEATURED_LIMIT};
pub use registrant::{
    generate_check_in_code, RegisterRequest, Registrant, RegistrantResponse, RegistrantStatus,
    UpdateRegistrantStatusRequest, CHECK_IN_CODE_LENGTH,
};
pub use sponsor::{Sponsor, SponsorRequest};
pub use user::{CreateUserRequest, LoginRequest, Role, User, UserResponse, UserSession};
pub use year::{CreateYearRequest, UpdateYearRequest, Year, DEFAULT_THEME};
