//! Registrant domain models and check-in code allocation.
//!
//! A Registrant is created in `pending` status with a freshly allocated
//! check-in code. The code is unique across the whole store; the database
//! constraint is the authority and callers retry generation on collision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Length of a generated check-in code.
pub const CHECK_IN_CODE_LENGTH: usize = 16;

/// Registrant verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrantStatus {
    Pending,
    Verified,
}

impl RegistrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrantStatus::Pending => "pending",
            RegistrantStatus::Verified => "verified",
        }
    }

    /// Parse a status string, coercing anything unrecognized to `pending`.
    ///
    /// Status updates accept free-form input and fall back to `pending`
    /// instead of rejecting. Callers that want strict parsing use
    /// [`FromStr`] instead.
    pub fn parse_or_pending(s: &str) -> Self {
        s.parse().unwrap_or(RegistrantStatus::Pending)
    }
}

impl FromStr for RegistrantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RegistrantStatus::Pending),
            "verified" => Ok(RegistrantStatus::Verified),
            _ => Err(format!("Invalid registrant status: {}", s)),
        }
    }
}

impl fmt::Display for RegistrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person signed up for an Activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub school: String,
    pub phone: Option<String>,
    pub email: String,
    pub status: RegistrantStatus,
    /// Nullable only for rows that predate code allocation; backfilled on
    /// first access.
    pub check_in_code: Option<String>,
    pub attended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Registrant {
    pub fn is_attended(&self) -> bool {
        self.attended_at.is_some()
    }
}

/// Generate a check-in code.
///
/// The charset omits characters that misread easily when printed next to a
/// QR fallback (0/O, 1/l/I).
pub fn generate_check_in_code() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";
    let mut rng = rand::thread_rng();

    (0..CHECK_IN_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Public registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "School must be 1-255 characters"))]
    pub school: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
}

/// Admin request to set a registrant's status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrantStatusRequest {
    /// Free-form on purpose; unrecognized values coerce to `pending`.
    pub status: String,
}

/// Registrant payload for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantResponse {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub name: String,
    pub school: String,
    pub phone: Option<String>,
    pub email: String,
    pub status: RegistrantStatus,
    pub check_in_code: Option<String>,
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Registrant> for RegistrantResponse {
    fn from(registrant: Registrant) -> Self {
        let attended = registrant.is_attended();
        Self {
            id: registrant.id,
            activity_id: registrant.activity_id,
            name: registrant.name,
            school: registrant.school,
            phone: registrant.phone,
            email: registrant.email,
            status: registrant.status,
            check_in_code: registrant.check_in_code,
            attended,
            attended_at: registrant.attended_at,
            created_at: registrant.created_at,
        }
    }
}
