//! Common validation and normalization utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    // Optional leading +, then 7 to 15 digits (E.164 upper bound).
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

/// Normalizes a phone number for storage and delivery: trims whitespace and
/// strips interior spaces and dashes. Returns `None` when nothing is left.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Validates a phone number after normalization.
///
/// Accepts the empty string so optional phone fields can reuse this check;
/// presence is enforced separately where required.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Ok(());
    }

    let normalized = match normalize_phone(phone) {
        Some(p) => p,
        None => return Ok(()),
    };

    if PHONE_REGEX.is_match(&normalized) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone must be 7-15 digits, optionally prefixed with +".into());
        Err(err)
    }
}
