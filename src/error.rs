//! Crate-level error type.
//!
//! Operations that span configuration and the API (building a client from a
//! profile) report through [`Error`]. Everything else returns the layer's own
//! error type.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// Errors from operations that touch both configuration and the API.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Whether the error points at the user's setup (configuration, token,
    /// permissions) rather than at a single failed request.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Api(ApiError::Unauthorized)
                | Error::Api(ApiError::Forbidden)
                | Error::Api(ApiError::Keyring(_))
                | Error::Api(ApiError::InvalidUrl(_))
        )
    }
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
