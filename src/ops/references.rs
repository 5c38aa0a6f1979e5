//! Reference resolution and write planning.

use std::collections::HashMap;
use std::sync::Arc;

use crate::batch::{BatchCreate, BatchUpdate, ReferenceModel, VersionMatch};
use crate::core::{
    ExistingReference, ReferenceBody, ReferenceFields, Relationship, WorkspaceSettings,
};
use crate::error::RemoteError;
use crate::remote::{ReferenceRepository, Transport};

/// Looks up existing references.
pub struct ReferenceResolver {
    references: ReferenceRepository,
}

impl ReferenceResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ReferenceResolver {
            references: ReferenceRepository::new(transport),
        }
    }

    /// The reference between an exact source/target pair, if any.
    pub fn search(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Option<ExistingReference>, RemoteError> {
        self.references.search(source, target)
    }

    /// Every reference from `source` into `to`, keyed by target identifier.
    pub fn get_all_references(
        &self,
        source: &str,
        from: &WorkspaceSettings,
        to: &WorkspaceSettings,
    ) -> Result<HashMap<String, ExistingReference>, RemoteError> {
        self.references.list(source, &from.id, &to.id)
    }
}

/// Plan the write that brings one reference in line with the desired state.
///
/// No existing reference gives a create. An existing reference whose
/// version or name differs from a supplied value gives an update guarded by
/// [`VersionMatch::Latest`]. Anything else is already consistent and gives
/// `None`.
pub fn build_create_or_update_model(
    existing: Option<&ExistingReference>,
    source: &str,
    target: &str,
    relationship: Relationship,
    version: Option<&str>,
    name: Option<&str>,
) -> Option<ReferenceModel> {
    let body = ReferenceBody::new(
        source,
        target,
        relationship,
        ReferenceFields {
            version: version.map(str::to_string),
            name: name.map(str::to_string),
        },
    );

    let Some(existing) = existing else {
        return Some(ReferenceModel::Create(BatchCreate::new(body)));
    };

    if !version.is_some_and(|v| existing.version.as_deref() != Some(v)) {
        return None;
    }

    Some(ReferenceModel::Update(BatchUpdate {
        id: existing.id.clone(),
        if_version_match: VersionMatch::Latest,
        body,
    }))
}
