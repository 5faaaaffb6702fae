//! YouTrack profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// A YouTrack profile configuration.
///
/// Profiles store connection details for a YouTrack instance.
/// Permanent tokens are stored separately in the OS keychain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles. Also the keyring
    /// user the token is stored under.
    pub name: String,

    /// The tracker URL used for human-facing links
    /// (e.g. "https://company.youtrack.cloud").
    pub url: String,

    /// The REST API URL. Defaults to `<url>/api/` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Profile {
    /// Create a new profile whose API lives under `<url>/api/`.
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            api_url: None,
        }
    }

    /// Use an explicit REST API URL.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = Some(api_url);
        self
    }

    /// The REST API URL requests are resolved against.
    pub fn api_url(&self) -> String {
        match &self.api_url {
            Some(api_url) => api_url.clone(),
            None => format!("{}/api/", self.url.trim_end_matches('/')),
        }
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - The URL (and API URL, when set) is non-empty and uses http(s)
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}' cannot contain whitespace",
                self.name
            )));
        }

        validate_url(&self.name, "URL", &self.url)?;
        if let Some(api_url) = &self.api_url {
            validate_url(&self.name, "API URL", api_url)?;
        }

        Ok(())
    }
}

fn validate_url(profile: &str, label: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "profile '{}': {} cannot be empty",
            profile, label
        )));
    }

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ConfigError::ValidationError(format!(
            "profile '{}': {} must start with http:// or https://",
            profile, label
        )));
    }

    Ok(())
}
