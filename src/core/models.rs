use crate::core::error::CycleError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Body of a successful login response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub token: String,
    #[allow(dead_code)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub scope: serde_json::Value,
}

/// Result of one login + fetch cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub result: Result<Vec<u8>, CycleError>,
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Payload as text, lossily decoded. `None` for failed cycles.
    pub fn payload_text(&self) -> Option<String> {
        self.result
            .as_ref()
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_result() {
        let result: LoginResult =
            serde_json::from_str(r#"{"token":"abc123","refreshToken":"r1","scope":null}"#)
                .unwrap();
        assert_eq!(result.token, "abc123");
        assert_eq!(result.refresh_token.as_deref(), Some("r1"));
        assert!(result.scope.is_null());
    }

    #[test]
    fn test_optional_fields_default() {
        let result: LoginResult = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert_eq!(result.token, "t");
        assert!(result.refresh_token.is_none());
        assert!(result.scope.is_null());
    }

    #[test]
    fn test_token_is_required() {
        assert!(serde_json::from_str::<LoginResult>(r#"{"refreshToken":"r1"}"#).is_err());
    }

    #[test]
    fn test_payload_text() {
        let outcome = CycleOutcome {
            started_at: Utc::now(),
            elapsed: Duration::from_millis(5),
            result: Ok(br#"[{"id":1}]"#.to_vec()),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.payload_text().as_deref(), Some(r#"[{"id":1}]"#));
    }
}
