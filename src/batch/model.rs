//! Batch request model.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize, Serializer};

use crate::core::{ExistingReference, ReferenceBody};

/// Body of a component create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentBody {
    pub root_workspace: String,
    pub name: String,
    pub type_id: String,
}

/// Optimistic-concurrency guard on an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMatch {
    /// Apply only if the entity is still at its latest version
    Latest,
    /// Apply only if the entity is at exactly this version
    Exact(u64),
}

impl Serialize for VersionMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VersionMatch::Latest => serializer.serialize_str("latest"),
            VersionMatch::Exact(v) => serializer.serialize_u64(*v),
        }
    }
}

/// Create an entity. `batch_id` lets other operations in the same batch
/// refer to the entity before it has a remote identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreate<B> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub body: B,
}

impl<B> BatchCreate<B> {
    pub fn new(body: B) -> Self {
        BatchCreate {
            batch_id: None,
            body,
        }
    }

    pub fn with_batch_id(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }
}

/// Update an existing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate<B> {
    pub id: String,
    pub if_version_match: VersionMatch,
    pub body: B,
}

/// Delete an existing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDelete {
    pub id: String,
}

/// Create/update/delete lists for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchModel<B> {
    create: Vec<BatchCreate<B>>,
    update: Vec<BatchUpdate<B>>,
    delete: Vec<BatchDelete>,
}

impl<B> Default for BatchModel<B> {
    fn default() -> Self {
        BatchModel {
            create: Vec::new(),
            update: Vec::new(),
            delete: Vec::new(),
        }
    }
}

impl<B> BatchModel<B> {
    pub fn add_create(&mut self, model: BatchCreate<B>) -> &mut Self {
        self.create.push(model);
        self
    }

    pub fn add_update(&mut self, model: BatchUpdate<B>) -> &mut Self {
        self.update.push(model);
        self
    }

    pub fn add_delete(&mut self, id: impl Into<String>) -> &mut Self {
        self.delete.push(BatchDelete { id: id.into() });
        self
    }

    pub fn creates(&self) -> &[BatchCreate<B>] {
        &self.create
    }

    pub fn updates(&self) -> &[BatchUpdate<B>] {
        &self.update
    }

    pub fn deletes(&self) -> &[BatchDelete] {
        &self.delete
    }

    /// Identifiers of all updates.
    pub fn update_ids(&self) -> impl Iterator<Item = &str> {
        self.update.iter().map(|u| u.id.as_str())
    }

    /// Number of operations in all three lists.
    pub fn len(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reference write produced by the reference resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceModel {
    Create(BatchCreate<ReferenceBody>),
    Update(BatchUpdate<ReferenceBody>),
}

impl ReferenceModel {
    /// The body being written.
    pub fn body(&self) -> &ReferenceBody {
        match self {
            ReferenceModel::Create(c) => &c.body,
            ReferenceModel::Update(u) => &u.body,
        }
    }
}

/// Batch-wide options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptions {
    pub respond_with_entities: bool,
}

/// One atomic batch of component and reference operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRequest {
    pub components: BatchModel<ComponentBody>,
    pub references: BatchModel<ReferenceBody>,
    pub options: BatchOptions,

    /// Existing references found already consistent; never deleted.
    #[serde(skip)]
    retained: HashSet<String>,
}

impl BatchRequest {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a reference create or update.
    pub fn add_reference(&mut self, model: ReferenceModel) -> &mut Self {
        match model {
            ReferenceModel::Create(c) => self.references.add_create(c),
            ReferenceModel::Update(u) => self.references.add_update(u),
        };
        self
    }

    /// Mark an existing reference as kept even though it needs no write.
    pub fn retain_reference(&mut self, id: impl Into<String>) -> &mut Self {
        self.retained.insert(id.into());
        self
    }

    /// Stage deletion of every snapshot reference that is neither updated
    /// nor retained by this batch. Returns the number of deletions staged.
    pub fn stage_deletions(&mut self, snapshot: &HashMap<String, ExistingReference>) -> usize {
        let keep: HashSet<&str> = self
            .references
            .update_ids()
            .chain(self.retained.iter().map(String::as_str))
            .collect();

        let mut doomed: Vec<String> = snapshot
            .values()
            .map(|r| r.id.as_str())
            .filter(|id| !keep.contains(id))
            .map(str::to_string)
            .collect();
        doomed.sort();
        doomed.dedup();

        let n = doomed.len();
        for id in doomed {
            self.references.add_delete(id);
        }
        n
    }

    /// Total number of operations across components and references.
    pub fn total_operations(&self) -> usize {
        self.components.len() + self.references.len()
    }

    /// True when submitting would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.total_operations() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ReferenceFields, Relationship};

    fn component(n: u32) -> ComponentBody {
        ComponentBody {
            root_workspace: format!("componentWS{}", n),
            name: format!("componentName{}", n),
            type_id: "componentType".to_string(),
        }
    }

    fn reference(n: u32, relationship: Relationship, version: Option<&str>) -> ReferenceBody {
        ReferenceBody::new(
            format!("referencesSource{}", n),
            "referencesTarget",
            relationship,
            ReferenceFields {
                version: version.map(str::to_string),
                name: None,
            },
        )
    }

    #[test]
    fn test_wire_format() {
        let mut r = BatchRequest::new();
        r.components
            .add_create(BatchCreate::new(component(1)).with_batch_id("1"))
            .add_create(BatchCreate::new(component(2)).with_batch_id("2"))
            .add_update(BatchUpdate {
                id: "3".into(),
                if_version_match: VersionMatch::Exact(1),
                body: component(3),
            });
        r.add_reference(ReferenceModel::Create(
            BatchCreate::new(reference(1, Relationship::Hosts, None)).with_batch_id("1"),
        ))
        .add_reference(ReferenceModel::Create(
            BatchCreate::new(reference(2, Relationship::DependsOnVersion, Some("1.1.1")))
                .with_batch_id("2"),
        ))
        .add_reference(ReferenceModel::Update(BatchUpdate {
            id: "4".into(),
            if_version_match: VersionMatch::Latest,
            body: reference(4, Relationship::DependsOnVersion, Some("2.2.2")),
        }));

        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"components":{"create":["#,
                r#"{"batchId":"1","body":{"rootWorkspace":"componentWS1","name":"componentName1","typeId":"componentType"}},"#,
                r#"{"batchId":"2","body":{"rootWorkspace":"componentWS2","name":"componentName2","typeId":"componentType"}}],"#,
                r#""update":[{"id":"3","ifVersionMatch":1,"body":{"rootWorkspace":"componentWS3","name":"componentName3","typeId":"componentType"}}],"#,
                r#""delete":[]},"#,
                r#""references":{"create":["#,
                r#"{"batchId":"1","body":{"source":"referencesSource1","target":"referencesTarget","type":5}},"#,
                r#"{"batchId":"2","body":{"source":"referencesSource2","target":"referencesTarget","type":3,"customFields":{"version":"1.1.1"}}}],"#,
                r#""update":[{"id":"4","ifVersionMatch":"latest","body":{"source":"referencesSource4","target":"referencesTarget","type":3,"customFields":{"version":"2.2.2"}}}],"#,
                r#""delete":[]},"#,
                r#""options":{"respondWithEntities":false}}"#
            )
        );
        assert_eq!(r.total_operations(), 6);
    }

    fn snapshot(ids: &[&str]) -> HashMap<String, ExistingReference> {
        ids.iter()
            .map(|id| (format!("target-{}", id), ExistingReference::new(*id)))
            .collect()
    }

    #[test]
    fn test_deletion_by_absence() {
        let mut r = BatchRequest::new();
        r.add_reference(ReferenceModel::Update(BatchUpdate {
            id: "A".into(),
            if_version_match: VersionMatch::Latest,
            body: reference(1, Relationship::DependsOnVersion, Some("2.0.0")),
        }));

        let staged = r.stage_deletions(&snapshot(&["A", "B", "C"]));
        assert_eq!(staged, 2);

        let deleted: Vec<&str> = r.references.deletes().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(deleted, vec!["B", "C"]);
    }

    #[test]
    fn test_retained_references_are_not_deleted() {
        let mut r = BatchRequest::new();
        r.retain_reference("B");

        r.stage_deletions(&snapshot(&["A", "B"]));

        let deleted: Vec<&str> = r.references.deletes().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(deleted, vec!["A"]);
    }

    #[test]
    fn test_empty_batch() {
        let mut r = BatchRequest::new();
        assert!(r.is_empty());
        assert_eq!(r.stage_deletions(&HashMap::new()), 0);
        assert!(r.is_empty());
    }
}
