//! Authentication handling for the YouTrack API.
//!
//! YouTrack authenticates REST calls with a permanent token sent as a
//! bearer credential. This module defines the capability the client needs
//! from an authentication provider and a concrete provider backed by explicit
//! values, environment variables, or the OS keyring.

use std::fmt;

use super::error::{ApiError, InvalidValueError, Result};

/// The keyring service name for YouTrack tokens.
const KEYRING_SERVICE: &str = "youtrack-sdk";

/// Environment variable holding the permanent token.
pub const TOKEN_ENV: &str = "YOUTRACK_TOKEN";

/// Environment variable holding the REST API URL.
pub const API_URL_ENV: &str = "YOUTRACK_API_URL";

/// A source of bearer credentials and the REST API location.
pub trait TokenAuthentication {
    /// The permanent token sent as `Authorization: Bearer <token>`.
    fn token(&self) -> &str;

    /// The REST API URL every request is resolved against
    /// (e.g. `https://tracker.example/api/`).
    fn api_url(&self) -> &str;
}

/// Token credentials for a YouTrack instance.
#[derive(Clone)]
pub struct TokenAuth {
    token: String,
    api_url: String,
}

impl TokenAuth {
    pub fn new(token: &str, api_url: &str) -> Self {
        Self {
            token: token.to_string(),
            api_url: api_url.to_string(),
        }
    }

    /// Create authentication from the OS keyring.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be retrieved from the keyring.
    pub fn from_keyring(profile_name: &str, api_url: &str) -> Result<Self> {
        let token = get_token(profile_name)?;
        Ok(Self::new(&token, api_url))
    }

    /// Create authentication from `YOUTRACK_TOKEN` and `YOUTRACK_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidValue` naming the first variable that is
    /// missing or empty.
    pub fn from_env() -> Result<Self> {
        let token = read_env(TOKEN_ENV)?;
        let api_url = read_env(API_URL_ENV)?;
        Ok(Self { token, api_url })
    }
}

impl TokenAuthentication for TokenAuth {
    fn token(&self) -> &str {
        &self.token
    }

    fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(InvalidValueError::new(format!("{} is empty", name)).into()),
        Err(e) => Err(InvalidValueError::new(format!("{} is not set", name))
            .with_source(e)
            .into()),
    }
}

/// Read the permanent token stored for `profile_name`.
///
/// Tokens are written to the keyring by whatever tool manages credentials;
/// the client only reads them.
fn get_token(profile_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}
