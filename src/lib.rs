//! youtrack-sdk - a client library for the YouTrack REST API.
//!
//! Authenticates requests with a permanent token, maps projects, issues,
//! custom fields and enum bundles to REST calls, and decodes the responses.
//!
//! ```no_run
//! use youtrack_sdk::{ClientConfig, Issue, TokenAuth, YouTrackApi, YouTrackClient};
//!
//! # async fn run() -> Result<(), youtrack_sdk::ApiError> {
//! let auth = TokenAuth::new("perm:...", "https://company.youtrack.cloud/api/");
//! let client = YouTrackClient::new(&auth, "https://company.youtrack.cloud", ClientConfig::default())?;
//!
//! if let Some(project) = client.get_project_info_by_name("Demo").await? {
//!     let mut issue = Issue::new("Crash on start", "Steps to reproduce...");
//!     client.create_issue(&project, &mut issue).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{
    normalize_type_keys, ApiError, ClientConfig, CustomField, EnumValue, InvalidValueError,
    Issue, ProjectInfo, RequestOptions, TokenAuth, TokenAuthentication, Transport, YouTrackApi,
    YouTrackClient,
};
pub use config::{Config, Profile, Settings};
pub use error::{Error, Result};
