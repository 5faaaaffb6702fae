//! YouTrack API client and types.
//!
//! This module provides the interface for communicating with the YouTrack
//! REST API.

pub mod auth;
mod client;
pub mod error;
mod normalize;
mod transport;
mod types;

pub use auth::{TokenAuth, TokenAuthentication};
pub use client::{RequestOptions, YouTrackApi, YouTrackClient, ISSUE_FIELDS};
pub use error::{ApiError, InvalidValueError};
pub use normalize::{normalize_type_keys, DISCRIMINATOR_KEY, PLAIN_TYPE_KEY};
pub use transport::{
    ApiRequest, ApiResponse, ClientConfig, ReqwestTransport, Transport, TransportConfig,
};
pub use types::{CustomField, EnumValue, Issue, ProjectInfo};
