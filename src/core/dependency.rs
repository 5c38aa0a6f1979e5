//! Dependency value type.
//!
//! A Dependency is one normalized manifest entry: a fully-qualified package
//! name plus the version the manifest pins it to. Identity is the name alone,
//! so a version bump is seen as "the same dependency, changed" and results in
//! an update of the existing reference rather than a new entity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A normalized, versioned dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Fully-qualified package name (e.g. `org.slf4j:slf4j-api`, `@types/node`)
    name: String,

    /// Version as written in the manifest
    version: String,

    /// Remote component identifier, set once resolution succeeds
    #[serde(skip)]
    component_id: OnceLock<String>,
}

impl Dependency {
    /// Create a new unresolved dependency.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            version: version.into(),
            component_id: OnceLock::new(),
        }
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name and version joined for display, e.g. `serde 1.0.200`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Remote component identifier, if resolved.
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.get().map(String::as_str)
    }

    /// Record the remote component identifier.
    ///
    /// Returns `false` (and keeps the first value) if the dependency was
    /// already resolved.
    pub fn set_component_id(&self, id: impl Into<String>) -> bool {
        self.component_id.set(id.into()).is_ok()
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.version)
    }
}
