use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid API URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Failure of the login call.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("failed to make login request: {0}")]
    Request(#[source] reqwest::Error),

    /// Server answered with anything other than 200; `body` is the raw response text.
    #[error("login failed ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("failed to parse login response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of the protected resource call.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch customer data: {0}")]
    Request(#[source] reqwest::Error),

    #[error("customer API failed ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CycleError {
    pub fn stage(&self) -> &'static str {
        match self {
            CycleError::Auth(_) => "login",
            CycleError::Fetch(_) => "fetch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_messages_carry_body() {
        let auth = AuthError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid credentials".to_string(),
        };
        assert!(auth.to_string().contains("invalid credentials"));
        assert!(auth.to_string().contains("401"));

        let fetch = FetchError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "server error".to_string(),
        };
        assert!(fetch.to_string().contains("server error"));
    }

    #[test]
    fn test_cycle_error_is_transparent() {
        let err: CycleError = AuthError::Rejected {
            status: StatusCode::FORBIDDEN,
            body: "nope".to_string(),
        }
        .into();
        assert_eq!(err.stage(), "login");
        assert_eq!(err.to_string(), "login failed (403 Forbidden): nope");
    }

    #[test]
    fn test_parse_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AuthError = parse_err.into();
        assert!(matches!(err, AuthError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse login response"));
    }
}
