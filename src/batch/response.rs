//! Batch response model.

use std::fmt;

use serde::Deserialize;

/// Which entity group a batch result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchType {
    Component,
    Reference,
}

impl fmt::Display for BatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchType::Component => write!(f, "components"),
            BatchType::Reference => write!(f, "references"),
        }
    }
}

/// One item in a result list; the API returns either a bare id or an
/// object carrying one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Id(String),
    Entity { id: String },
}

impl BatchItem {
    pub fn id(&self) -> &str {
        match self {
            BatchItem::Id(id) | BatchItem::Entity { id } => id,
        }
    }
}

/// Result lists for one entity group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchResult {
    pub created: Vec<BatchItem>,
    pub updated: Vec<BatchItem>,
    pub deleted: Vec<BatchItem>,
}

/// Successful batch response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchResponse {
    pub components: Option<BatchResult>,
    pub references: Option<BatchResult>,
}
