//! Client error types

use thiserror::Error;

/// Client error type
///
/// `Clone` so a settled read can be handed to every caller that joined the
/// same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A protected call was attempted without a session token
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The server answered with a non-success status
    #[error("{message}")]
    RemoteRejected { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Payload rejected before sending
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Build a rejection from a status code and an optional server message
    ///
    /// Falls back to `"<operation> failed: <status>"` when the server sent
    /// no usable message.
    pub fn rejected(operation: &str, status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{} failed: {}", operation, status));
        Self::RemoteRejected { status, message }
    }

    /// HTTP status of a remote rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Missing token locally or 401 from the server
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationRequired) || self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether a read failing with this error may be attempted again
    ///
    /// Only transient failures qualify: no response at all, or a 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkFailure(_) => true,
            Self::RemoteRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
