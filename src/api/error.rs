//! API error types for the YouTrack client.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Errors that can occur when interacting with the YouTrack API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - missing, expired or revoked token.
    #[error("Authentication failed: check your permanent token")]
    Unauthorized,

    /// Permission denied - the token's user lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state of the resource.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited by the server.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// YouTrack server error, or any other unexpected status.
    #[error("YouTrack server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// The response decoded, but does not have the expected shape.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The response body is not valid JSON (or not the expected JSON).
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A value supplied to or received from the domain layer is invalid.
    #[error(transparent)]
    InvalidValue(#[from] InvalidValueError),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            409 => ApiError::Conflict(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }
}

/// An invalid value was supplied to, or received from, the domain layer.
///
/// Carries a message, an optional numeric code and an optional underlying
/// cause, reported through [`std::error::Error::source`].
#[derive(Debug)]
pub struct InvalidValueError {
    message: String,
    code: Option<i64>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl InvalidValueError {
    /// Create an error with a message and no code or cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Attach a numeric code.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }
}

impl fmt::Display for InvalidValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "Invalid value ({}): {}", code, self.message),
            None => write!(f, "Invalid value: {}", self.message),
        }
    }
}

impl StdError for InvalidValueError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}
