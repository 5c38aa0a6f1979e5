//! Process-wide component identifier cache.
//!
//! Entries map `(workspace, name)` to a remote identifier. Component
//! identifiers are durable, so entries never expire; the whole cache is
//! dropped with [`ComponentCache::clear`] when a bulk source (the dependency
//! report) is known to be stale.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::core::{Workspace, WorkspaceTable};

/// Shared `(workspace, name) -> identifier` cache.
#[derive(Debug, Default)]
pub struct ComponentCache {
    entries: RwLock<WorkspaceTable<HashMap<String, String>>>,
    /// Whether a priming pass ran since the last clear
    primed: Mutex<bool>,
}

impl ComponentCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a component identifier.
    pub fn get(&self, workspace: Workspace, name: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries[workspace].get(name).cloned()
    }

    /// Record a component identifier.
    ///
    /// The first identifier recorded for a key wins; returns `false` if the
    /// key was already present.
    pub fn set(
        &self,
        workspace: Workspace,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let slot = &mut entries[workspace];
        let name = name.into();
        if slot.contains_key(&name) {
            return false;
        }
        slot.insert(name, id.into());
        true
    }

    /// Number of entries cached for a workspace.
    pub fn item_count(&self, workspace: Workspace) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries[workspace].len()
    }

    /// Drop every entry in every workspace.
    pub fn clear(&self) {
        let mut primed = self.primed.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for slot in entries.values_mut() {
            slot.clear();
        }
        *primed = false;
    }

    /// Populate `workspace` from a bulk source once.
    ///
    /// Concurrent callers serialize on the priming lock; only the first one
    /// to find the workspace empty and unprimed runs `load`. Returns `true`
    /// if this call ran `load`.
    pub fn prime_with<I, F>(&self, workspace: Workspace, load: F) -> bool
    where
        F: FnOnce() -> I,
        I: IntoIterator<Item = (String, String)>,
    {
        let mut primed = self.primed.lock().unwrap_or_else(|e| e.into_inner());
        if *primed || self.item_count(workspace) > 0 {
            return false;
        }

        let loaded = load();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        for (name, id) in loaded {
            entries[workspace].entry(name).or_insert(id);
        }
        *primed = true;
        true
    }
}
