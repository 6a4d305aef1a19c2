//! Error type shared by the admin API clients.
//!
//! Errors only ever carry a human-readable message upward: the controller
//! surfaces `err.to_string()` verbatim through the notifier and never branches
//! on a structured code.

use thiserror::Error;

/// Failure of a remote admin call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminApiError {
    /// The request never produced an HTTP response (DNS, TLS, timeout...).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to parse {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// The request body could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Encode(String),

    /// Client configuration is unusable (empty or malformed base URL).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AdminApiError {
    /// Build a server error, falling back to a generic status message when the
    /// server did not provide one.
    pub fn server(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("API returned status: {status}"));
        Self::Server { status, message }
    }

    /// HTTP status code, when the failure came from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A typed API result.
pub type ApiResult<T> = Result<T, AdminApiError>;
