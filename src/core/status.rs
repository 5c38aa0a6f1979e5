//! Per-outcome counters for a reconciliation run.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Outcome of resolving or writing a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentStatus {
    /// Already present (or brought in sync by an update)
    Existing,
    /// Newly created
    Created,
    /// A remote call for this entity failed
    Error,
    /// Staged in a batch, not yet written
    Pending,
    /// Removed from the remote store
    Deleted,
}

impl ComponentStatus {
    /// All statuses, in reporting order.
    pub const ALL: [ComponentStatus; 5] = [
        ComponentStatus::Existing,
        ComponentStatus::Created,
        ComponentStatus::Error,
        ComponentStatus::Pending,
        ComponentStatus::Deleted,
    ];

    /// Label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentStatus::Existing => "EXISTING",
            ComponentStatus::Created => "CREATED",
            ComponentStatus::Error => "ERROR",
            ComponentStatus::Pending => "PENDING",
            ComponentStatus::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts keyed by [`ComponentStatus`].
///
/// Counts only ever grow. Merging is pointwise addition, so it is
/// commutative and associative; zero counts are not stored, which makes
/// two count sets with the same non-zero entries compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: BTreeMap<ComponentStatus, usize>,
}

impl StatusCounts {
    /// Create an empty set of counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(status, count)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ComponentStatus, usize)>) -> Self {
        let mut counts = StatusCounts::new();
        for (status, n) in pairs {
            counts.add(status, n);
        }
        counts
    }

    /// Add `n` to a status.
    pub fn add(&mut self, status: ComponentStatus, n: usize) -> &mut Self {
        if n > 0 {
            *self.counts.entry(status).or_insert(0) += n;
        }
        self
    }

    /// Add one to a status.
    pub fn incr(&mut self, status: ComponentStatus) -> &mut Self {
        self.add(status, 1)
    }

    /// Merge another set of counts into this one.
    pub fn merge(&mut self, other: &StatusCounts) -> &mut Self {
        for (status, n) in &other.counts {
            self.add(*status, *n);
        }
        self
    }

    /// Count for a status (zero if never incremented).
    pub fn get(&self, status: ComponentStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Sum over all statuses.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// True when nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over non-zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentStatus, usize)> + '_ {
        self.counts.iter().map(|(s, n)| (*s, *n))
    }
}

impl Serialize for StatusCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ComponentStatus::ALL.len()))?;
        for status in ComponentStatus::ALL {
            map.serialize_entry(status.as_str(), &self.get(status))?;
        }
        map.end()
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = ComponentStatus::ALL
            .iter()
            .map(|s| format!("{}={}", s.as_str().to_lowercase(), self.get(*s)))
            .collect();
        f.write_str(&parts.join(" "))
    }
}
