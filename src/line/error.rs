//! LINE API error types

use thiserror::Error;

/// Messaging API error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LineError {
    pub kind: LineErrorKind,
    pub message: String,
}

impl LineError {
    pub fn new(kind: LineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::RateLimit, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::ServerError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::Auth, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::InvalidRequest, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LineErrorKind::Unknown, message)
    }

    /// Whether a fresh send could plausibly succeed.
    ///
    /// Reply tokens are single-use, so nothing here drives an automatic
    /// retry. The hint feeds log severity and lets operators tell a bad
    /// token from a LINE outage at a glance.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            LineErrorKind::Network | LineErrorKind::RateLimit | LineErrorKind::ServerError
        )
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineErrorKind {
    /// Network issues, timeouts
    Network,
    /// Rate limited (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Authentication failed (401, 403)
    Auth,
    /// Bad request (400), including expired reply tokens
    InvalidRequest,
    /// Unknown error
    Unknown,
}
