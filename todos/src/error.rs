//! Error types for the todo domain.

use thiserror::Error;

/// Validation failures detected by the reducer before any remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// Title is empty after trimming
    #[error("Title should not be empty")]
    EmptyTitle,
}

/// Failures reported by a [`TodoService`](crate::service::TodoService)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("Request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("Service returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body could not be decoded
    #[error("Response decoding failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Invalid or missing configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// An environment variable is set but cannot be used
    #[error("Invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}
