//! Error types for the Lumos store

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network error (request never produced a response)
    #[error("Network error: {0}")]
    Network(String),

    /// Session missing or expired (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Server returned a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Durable storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether this failure means the session is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Unauthorized)
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
            return StoreError::Unauthorized;
        }
        if err.is_decode() {
            return StoreError::Serialization(err.to_string());
        }
        StoreError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Failure recorded in a slice when a remote fetch is rejected.
///
/// Kept apart from [`StoreError`] because it lives inside persisted state
/// and must be cheap to clone and compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FetchError {
    /// The remote rejected the session
    Unauthorized,
    /// Any other transport or server failure
    Failed(String),
}

impl FetchError {
    /// Classify a store error, prefixing generic failures with `context`
    /// (e.g. "Failed to fetch events").
    pub fn from_store(err: &StoreError, context: &str) -> Self {
        match err {
            StoreError::Unauthorized => FetchError::Unauthorized,
            StoreError::Server { status, .. } => {
                FetchError::Failed(format!("{} (HTTP {})", context, status))
            }
            other => FetchError::Failed(format!("{}: {}", context, other)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }

    /// Human-readable message shown to the user
    pub fn message(&self) -> &str {
        match self {
            FetchError::Unauthorized => "Unauthorized",
            FetchError::Failed(message) => message,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_classified_distinctly() {
        let err = FetchError::from_store(&StoreError::Unauthorized, "Failed to fetch surveys");
        assert_eq!(err, FetchError::Unauthorized);
        assert_eq!(err.message(), "Unauthorized");
    }

    #[test]
    fn test_server_error_message_names_the_fetch() {
        let err = FetchError::from_store(
            &StoreError::Server { status: 500, message: "boom".into() },
            "Failed to fetch events",
        );
        assert_eq!(err.message(), "Failed to fetch events (HTTP 500)");
        assert!(!err.is_unauthorized());
    }
}
