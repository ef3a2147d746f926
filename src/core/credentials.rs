use serde::Serialize;
use std::fmt;

pub const USERNAME_VAR: &str = "USERNAME";
pub const PASSWORD_VAR: &str = "PASSWORD";

/// Login credentials, serialized as the login request body.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[cfg(test)]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials from a variable lookup. Unset variables become empty
    /// strings and are sent as-is.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: lookup(USERNAME_VAR).unwrap_or_default(),
            password: lookup(PASSWORD_VAR).unwrap_or_default(),
        }
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push(USERNAME_VAR);
        }
        if self.password.is_empty() {
            missing.push(PASSWORD_VAR);
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where a cycle gets its credentials from. Queried once per cycle.
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> Credentials;
}

/// Reads `USERNAME` and `PASSWORD` from the process environment on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credentials(&self) -> Credentials {
        Credentials::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
impl CredentialSource for Credentials {
    fn credentials(&self) -> Credentials {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, String> = [
            ("USERNAME", "u".to_string()),
            ("PASSWORD", "p".to_string()),
        ]
        .into_iter()
        .collect();

        let creds = Credentials::from_lookup(|k| vars.get(k).cloned());
        assert_eq!(creds, Credentials::new("u", "p"));
        assert!(creds.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_vars_become_empty() {
        let creds = Credentials::from_lookup(|_| None);
        assert_eq!(creds.username, "");
        assert_eq!(creds.password, "");
        assert_eq!(creds.missing_fields(), vec!["USERNAME", "PASSWORD"]);
    }

    #[test]
    fn test_serializes_as_login_body() {
        let body = serde_json::to_value(Credentials::new("u", "p")).unwrap();
        assert_eq!(body, serde_json::json!({"username": "u", "password": "p"}));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
