//! YouTrack entities and wire types.
//!
//! `ProjectInfo`, `Issue` and `CustomField` are the domain entities callers
//! build and receive. The remaining types model the sparse JSON projections
//! the client requests.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::InvalidValueError;

/// Identifies a project for issue creation and field lookups.
///
/// Both `id` and `name` are non-empty; deserialization applies the same
/// check as [`ProjectInfo::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProjectRecord")]
pub struct ProjectInfo {
    id: String,
    name: String,
}

impl ProjectInfo {
    /// Create project info, rejecting an empty id or name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidValueError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(InvalidValueError::new("project id cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(InvalidValueError::new(format!(
                "project '{}': name cannot be empty",
                id
            )));
        }

        Ok(Self { id, name })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ProjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A project as returned by `admin/projects`; `shortName` and `$type` are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectRecord {
    pub id: String,
    pub name: String,
}

impl TryFrom<ProjectRecord> for ProjectInfo {
    type Error = InvalidValueError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        ProjectInfo::new(record.id, record.name)
    }
}

/// A custom field value attached to an issue.
///
/// `field_type` is the server-side discriminator (e.g.
/// `SingleEnumIssueCustomField`) and travels as `$type` on the wire. It is not
/// validated here; the server is the authority on which types exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    name: String,
    #[serde(rename = "$type", alias = "type")]
    field_type: String,
    value: Value,
}

impl CustomField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// An issue built client-side for submission.
///
/// The id is unset until the server assigns one on creation. It can be set
/// exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    id: Option<String>,
    summary: String,
    description: String,
    custom_fields: Vec<CustomField>,
}

impl Issue {
    pub fn new(summary: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            summary: summary.into(),
            description: description.into(),
            custom_fields: Vec::new(),
        }
    }

    /// Add a custom field, keeping insertion order.
    pub fn with_custom_field(mut self, field: CustomField) -> Self {
        self.custom_fields.push(field);
        self
    }

    pub fn add_custom_field(&mut self, field: CustomField) {
        self.custom_fields.push(field);
    }

    /// The server-assigned id, once the issue has been created.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn custom_fields(&self) -> &[CustomField] {
        &self.custom_fields
    }

    /// Record the server-assigned id.
    ///
    /// # Errors
    ///
    /// Fails without modifying the issue if the id is empty or one is
    /// already set.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), InvalidValueError> {
        let id = id.into();

        if let Some(existing) = &self.id {
            return Err(InvalidValueError::new(format!(
                "issue already has id '{}'",
                existing
            )));
        }
        if id.trim().is_empty() {
            return Err(InvalidValueError::new("issue id cannot be empty"));
        }

        self.id = Some(id);
        Ok(())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}: {}", id, self.summary),
            None => write!(f, "(new): {}", self.summary),
        }
    }
}

/// An allowed value of an enumeration-typed custom field.
///
/// Every field is optional: the server omits keys it has no value for. Keys
/// outside the requested projection, such as `$type`, are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Body of `POST issues`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIssueRequest<'a> {
    pub project: ProjectRef<'a>,
    pub summary: &'a str,
    pub description: &'a str,
    pub custom_fields: &'a [CustomField],
}

impl<'a> CreateIssueRequest<'a> {
    pub fn new(project: &'a ProjectInfo, issue: &'a Issue) -> Self {
        Self {
            project: ProjectRef { id: project.id() },
            summary: issue.summary(),
            description: issue.description(),
            custom_fields: issue.custom_fields(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectRef<'a> {
    pub id: &'a str,
}

/// Response of `POST issues`; only the id is needed.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedIssue {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response of `admin/projects/{id}/customFields/{id}/bundle/`.
#[derive(Debug, Deserialize)]
pub(crate) struct Bundle {
    pub values: Vec<EnumValue>,
}

/// Response of `admin/projects/{id}?fields=customFields(id, name)`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectCustomFields {
    #[serde(default)]
    pub custom_fields: Vec<FieldRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldRef {
    pub id: String,
}

/// Response of `admin/projects/{id}/customFields/{id}?fields=field(name)`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProjectCustomField {
    pub field: FieldName,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldName {
    pub name: String,
}
