//! Check-in resolution result.

use serde::{Deserialize, Serialize};

use super::registrant::RegistrantResponse;

/// Outcome of resolving a check-in code, returned to the scanner UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrant: Option<RegistrantResponse>,
    /// Whether the registrant had already been marked attended before this
    /// scan. Absent when the code did not resolve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_attended: Option<bool>,
}

impl CheckInResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            registrant: None,
            already_attended: None,
        }
    }

    pub fn resolved(registrant: RegistrantResponse, already_attended: bool) -> Self {
        Self {
            found: true,
            registrant: Some(registrant),
            already_attended: Some(already_attended),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registrant::{Registrant, RegistrantStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_registrant() -> RegistrantResponse {
        Registrant {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            name: "Dewi".to_string(),
            school: "SMAN 3".to_string(),
            phone: None,
            email: "dewi@example.com".to_string(),
            status: RegistrantStatus::Verified,
            check_in_code: Some("XyZw23456789AbCd".to_string()),
            attended_at: None,
            created_at: Utc::now(),
        }
        .into()
    }

    #[test]
    fn test_not_found_omits_optional_fields() {
        let json = serde_json::to_string(&CheckInResult::not_found()).unwrap();
        assert_eq!(json, r#"{"found":false}"#);
    }

    #[test]
    fn test_resolved_includes_registrant() {
        let result = CheckInResult::resolved(sample_registrant(), false);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""found":true"#));
        assert!(json.contains(r#""alreadyAttended":false"#));
        assert!(json.contains("Dewi"));
    }
}
