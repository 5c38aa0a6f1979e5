//! Workspaces - partitions of the remote component namespace.
//!
//! Every component lives in exactly one workspace. Each workspace maps to a
//! remote container identifier and a component type tag used when creating
//! components there. The mapping is held in a [`WorkspaceTable`], which has
//! one slot per [`Workspace`] variant, so an unconfigured workspace is a
//! construction-time error rather than a lookup that silently misses.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A logical partition of the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workspace {
    /// Hosting platforms (e.g. a GitHub organisation)
    VcsHosting,
    /// Source code repositories
    CodeRepository,
    /// Internal applications that maintain repositories
    Applications,
    /// Third-party software packages (dependencies, languages)
    SoftwarePackages,
}

impl Workspace {
    /// All workspaces, in table order.
    pub const ALL: [Workspace; 4] = [
        Workspace::VcsHosting,
        Workspace::CodeRepository,
        Workspace::Applications,
        Workspace::SoftwarePackages,
    ];

    /// Key used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Workspace::VcsHosting => "vcs_hosting",
            Workspace::CodeRepository => "code_repository",
            Workspace::Applications => "applications",
            Workspace::SoftwarePackages => "software_packages",
        }
    }

    fn index(self) -> usize {
        match self {
            Workspace::VcsHosting => 0,
            Workspace::CodeRepository => 1,
            Workspace::Applications => 2,
            Workspace::SoftwarePackages => 3,
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value for every workspace, indexed by [`Workspace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceTable<T> {
    slots: [T; 4],
}

impl<T> WorkspaceTable<T> {
    /// Build a table by computing the value for each workspace.
    pub fn from_fn(mut f: impl FnMut(Workspace) -> T) -> Self {
        WorkspaceTable {
            slots: Workspace::ALL.map(&mut f),
        }
    }

    /// Fallible variant of [`WorkspaceTable::from_fn`].
    pub fn try_from_fn<E>(mut f: impl FnMut(Workspace) -> Result<T, E>) -> Result<Self, E> {
        let [a, b, c, d] = Workspace::ALL;
        Ok(WorkspaceTable {
            slots: [f(a)?, f(b)?, f(c)?, f(d)?],
        })
    }

    /// Iterate over `(workspace, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Workspace, &T)> {
        Workspace::ALL.into_iter().zip(self.slots.iter())
    }

    /// Iterate mutably over all values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}

impl<T> Index<Workspace> for WorkspaceTable<T> {
    type Output = T;

    fn index(&self, workspace: Workspace) -> &T {
        &self.slots[workspace.index()]
    }
}

impl<T> IndexMut<Workspace> for WorkspaceTable<T> {
    fn index_mut(&mut self, workspace: Workspace) -> &mut T {
        &mut self.slots[workspace.index()]
    }
}

/// Remote settings for one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Remote container identifier (`rootWorkspace`)
    pub id: String,

    /// Component type tag used when creating components (`typeId`)
    pub type_id: String,
}

impl WorkspaceSettings {
    /// Create workspace settings.
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        WorkspaceSettings {
            id: id.into(),
            type_id: type_id.into(),
        }
    }
}
