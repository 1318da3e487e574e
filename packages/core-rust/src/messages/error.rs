//! Structured error payload returned by the party service.

use serde::{Deserialize, Serialize};

/// Error code for a patch submitted with an out-of-date revision. The
/// authoritative revision rides in the second positional message variable.
pub const STALE_REVISION: &str = "errors.com.epicgames.social.party.stale_revision";

/// Error code for a mutation the caller is not permitted to make.
pub const CHANGE_FORBIDDEN: &str = "errors.com.epicgames.social.party.party_change_forbidden";

/// A structured service error payload.
///
/// Only [`STALE_REVISION`] and [`CHANGE_FORBIDDEN`] are semantically
/// significant to this crate; every other code is opaque and passes through
/// to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{error_code}")]
pub struct ApiError {
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub message_vars: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numeric_error_code: Option<i64>,
}

impl ApiError {
    /// Builds a bare error from a code, for tests and synthetic payloads.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self {
            error_code: code.to_string(),
            error_message: None,
            message_vars: Vec::new(),
            numeric_error_code: None,
        }
    }

    /// Whether this is the stale-revision conflict code.
    #[must_use]
    pub fn is_stale_revision(&self) -> bool {
        self.error_code == STALE_REVISION
    }

    /// Whether this is the change-forbidden (permission) code.
    #[must_use]
    pub fn is_change_forbidden(&self) -> bool {
        self.error_code == CHANGE_FORBIDDEN
    }

    /// The authoritative revision carried by a stale-revision payload.
    ///
    /// Returns `None` when the second message variable is missing or does
    /// not parse; callers must then propagate the error verbatim rather than
    /// retry blind.
    #[must_use]
    pub fn authoritative_revision(&self) -> Option<u64> {
        self.message_vars.get(1)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_payload_carries_revision_in_second_var() {
        let err = ApiError {
            error_code: STALE_REVISION.to_string(),
            error_message: Some("stale revision".to_string()),
            message_vars: vec!["party-1".to_string(), "8".to_string()],
            numeric_error_code: Some(51021),
        };
        assert!(err.is_stale_revision());
        assert_eq!(err.authoritative_revision(), Some(8));
    }

    #[test]
    fn missing_or_unparsable_revision_is_none() {
        let mut err = ApiError::from_code(STALE_REVISION);
        assert_eq!(err.authoritative_revision(), None);

        err.message_vars = vec!["party-1".to_string(), "not-a-number".to_string()];
        assert_eq!(err.authoritative_revision(), None);
    }

    #[test]
    fn payload_deserializes_from_camel_case() {
        let err: ApiError = serde_json::from_str(
            r#"{
                "errorCode": "errors.com.epicgames.social.party.party_change_forbidden",
                "errorMessage": "forbidden",
                "messageVars": [],
                "numericErrorCode": 51015
            }"#,
        )
        .unwrap();
        assert!(err.is_change_forbidden());
        assert_eq!(err.numeric_error_code, Some(51015));
    }
}
