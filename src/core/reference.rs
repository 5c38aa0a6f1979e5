//! References - typed, optionally versioned edges between components.

use serde::{Deserialize, Serialize};

use crate::core::Relationship;

/// A reference that already exists in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingReference {
    /// Remote reference identifier
    pub id: String,

    /// Target component identifier, when the listing returned it
    pub target: Option<String>,

    /// `version` custom field
    pub version: Option<String>,

    /// `name` custom field
    pub name: Option<String>,
}

impl ExistingReference {
    /// Create an existing reference with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        ExistingReference {
            id: id.into(),
            target: None,
            version: None,
            name: None,
        }
    }

    /// Set the version custom field.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Custom fields attached to a reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ReferenceFields {
    /// True when neither field is set.
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.name.is_none()
    }
}

/// Body of a reference create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceBody {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<ReferenceFields>,
}

impl ReferenceBody {
    /// Create a reference body; empty custom fields are omitted.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: Relationship,
        fields: ReferenceFields,
    ) -> Self {
        ReferenceBody {
            source: source.into(),
            target: target.into(),
            relationship,
            custom_fields: (!fields.is_empty()).then_some(fields),
        }
    }
}
