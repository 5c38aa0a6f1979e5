//! Reconciliation of one repository's dependencies.
//!
//! A run resolves the structural components (hosting platform, repository,
//! application, language), snapshots the repository's existing dependency
//! references, diffs the desired dependency set against that snapshot and
//! submits the resulting creates, updates and deletes as a single batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::batch::{BatchCreate, BatchRequest};
use crate::core::{
    Dependency, ExistingReference, Relationship, StatusCounts, SyncRequest, Workspace,
    WorkspaceSettings, WorkspaceTable,
};
use crate::error::{SubmitError, SyncError};
use crate::ops::references::{build_create_or_update_model, ReferenceResolver};
use crate::ops::resolve::{ComponentResolver, Resolution};
use crate::parsers;
use crate::remote::{BatchRepository, ComponentCache, HttpTransport, Transport};
use crate::util::config::Config;

/// Existing dependency references of a repository, keyed by target.
type Snapshot = HashMap<String, ExistingReference>;

/// Drives a reconciliation run.
pub struct Reconciler {
    components: ComponentResolver,
    references: ReferenceResolver,
    batches: BatchRepository,
}

impl Reconciler {
    /// Create a reconciler over a transport and a shared cache.
    pub fn new(
        transport: Arc<dyn Transport>,
        workspaces: WorkspaceTable<WorkspaceSettings>,
        cache: Arc<ComponentCache>,
        report_id: Option<String>,
    ) -> Self {
        Reconciler {
            components: ComponentResolver::new(
                Arc::clone(&transport),
                workspaces,
                cache,
                report_id,
            ),
            references: ReferenceResolver::new(Arc::clone(&transport)),
            batches: BatchRepository::new(transport),
        }
    }

    /// Create a reconciler talking HTTP to the configured store.
    pub fn from_config(config: &Config, cache: Arc<ComponentCache>) -> Result<Self> {
        let workspaces = config.workspaces()?;
        let transport = HttpTransport::new(
            config.base_url()?,
            config.api_key()?,
            config.requests_per_second()?,
            config.timeout(),
        )
        .context("failed to set up the inventory client")?;
        let report_id = config.report_id().map(str::to_string);
        if report_id.is_none() {
            tracing::debug!("No dependency report configured; packages are searched one by one");
        }

        Ok(Reconciler::new(
            Arc::new(transport),
            workspaces,
            cache,
            report_id,
        ))
    }

    /// Normalize a request's manifests and reconcile them.
    pub fn process_request(&self, request: &SyncRequest) -> Result<StatusCounts, SyncError> {
        let dependencies = parsers::normalize(
            request.format,
            &request.manifest,
            request.manifest_other.as_deref(),
        )?;

        tracing::info!(
            "Reconciling {} {} dependencies for {}",
            dependencies.len(),
            request.format,
            request.code_repository
        );

        let counts = self.reconcile(request, &dependencies)?;
        tracing::info!("{}: {}", request.code_repository, counts);
        Ok(counts)
    }

    /// Bring the remote graph in line with `dependencies`.
    ///
    /// Individual lookup failures are counted, not returned. The only error
    /// is a batch that cannot be serialized.
    pub fn reconcile(
        &self,
        request: &SyncRequest,
        dependencies: &[Dependency],
    ) -> Result<StatusCounts, SubmitError> {
        let mut counts = StatusCounts::new();
        let mut batch = BatchRequest::new();

        let host = self
            .components
            .resolve_or_create(&request.vcs_host, Workspace::VcsHosting);
        let repository = self
            .components
            .resolve_or_create(&request.code_repository, Workspace::CodeRepository);
        let application = request
            .application
            .as_deref()
            .and_then(|name| self.components.find(name, Workspace::Applications));
        let language = request
            .language
            .as_deref()
            .map(|name| self.components.resolve_or_create(name, Workspace::SoftwarePackages));

        // Deletion by absence needs the full desired target set.
        let mut targets_known = !matches!(language, Some(Resolution::Error));

        let repo_id = repository.id();
        if repo_id.is_none() {
            tracing::warn!(
                "Repository '{}' could not be resolved; no references will be written",
                request.code_repository
            );
        }

        if let Some(repo_id) = repo_id {
            if let Some(host_id) = host.id() {
                self.stage_structural(&mut batch, host_id, repo_id, Relationship::Hosts);
            }
            if let Some(app_id) = application.as_deref() {
                self.stage_structural(&mut batch, app_id, repo_id, Relationship::Maintains);
            }
        }

        let snapshot = repo_id.and_then(|id| self.snapshot(id));

        if let (Some(repo_id), Some(name), Some(lang_id)) = (
            repo_id,
            request.language.as_deref(),
            language.as_ref().and_then(Resolution::id),
        ) {
            let version = request.language_version.as_deref();
            let display = match version {
                Some(v) => format!("{} {}", name, v),
                None => name.to_string(),
            };
            self.stage_dependency(
                &mut batch,
                snapshot.as_ref(),
                repo_id,
                lang_id,
                version,
                &display,
            );
        }

        let mut seen = HashSet::new();
        let unique: Vec<&Dependency> = dependencies
            .iter()
            .filter(|d| seen.insert(d.name()))
            .collect();

        let resolved: Vec<(&Dependency, Resolution)> = unique
            .par_iter()
            .map(|dep| (*dep, self.components.resolve_dependency(dep)))
            .collect();

        for (dep, resolution) in &resolved {
            counts.incr(resolution.status());
            match resolution {
                Resolution::Pending => {
                    self.stage_pending(&mut batch, repo_id, dep);
                }
                Resolution::Existing(target) | Resolution::Created(target) => {
                    if let Some(repo_id) = repo_id {
                        self.stage_dependency(
                            &mut batch,
                            snapshot.as_ref(),
                            repo_id,
                            target,
                            Some(dep.version()),
                            &dep.full_name(),
                        );
                    }
                }
                Resolution::Error => {
                    tracing::warn!("Skipping {}: package could not be resolved", dep);
                    targets_known = false;
                }
            }
        }

        match &snapshot {
            Some(snapshot) if targets_known => {
                let removed = batch.stage_deletions(snapshot);
                if removed > 0 {
                    tracing::info!("Removing {} stale dependency references", removed);
                }
            }
            Some(_) => {
                tracing::warn!("Some packages could not be resolved; keeping existing references");
            }
            None => {}
        }

        if batch.is_empty() {
            tracing::info!("{} is already in sync", request.code_repository);
            return Ok(counts);
        }

        let creates_components = !batch.components.creates().is_empty();
        let outcome = self.batches.submit(&batch)?;
        counts.merge(&outcome);

        if creates_components {
            self.components.invalidate();
        }

        Ok(counts)
    }

    /// Existing dependency references of the repository, or `None` if the
    /// listing failed (references are then searched one by one and nothing
    /// is deleted).
    fn snapshot(&self, repo_id: &str) -> Option<Snapshot> {
        let from = self.components.settings(Workspace::CodeRepository);
        let to = self.components.settings(Workspace::SoftwarePackages);

        match self.references.get_all_references(repo_id, from, to) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Could not list references of {}: {}", repo_id, e);
                None
            }
        }
    }

    fn stage_structural(
        &self,
        batch: &mut BatchRequest,
        source: &str,
        target: &str,
        relationship: Relationship,
    ) {
        match self.references.search(source, target) {
            Ok(existing) => {
                if let Some(model) = build_create_or_update_model(
                    existing.as_ref(),
                    source,
                    target,
                    relationship,
                    None,
                    None,
                ) {
                    batch.add_reference(model);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping {} reference {} -> {}: {}",
                    relationship,
                    source,
                    target,
                    e
                );
            }
        }
    }

    fn stage_dependency(
        &self,
        batch: &mut BatchRequest,
        snapshot: Option<&Snapshot>,
        repo_id: &str,
        target: &str,
        version: Option<&str>,
        name: &str,
    ) {
        let existing = match snapshot {
            Some(snapshot) => snapshot.get(target).cloned(),
            None => match self.references.search(repo_id, target) {
                Ok(existing) => existing,
                Err(e) => {
                    tracing::warn!("Skipping reference to {}: {}", name, e);
                    return;
                }
            },
        };

        match build_create_or_update_model(
            existing.as_ref(),
            repo_id,
            target,
            Relationship::DependsOnVersion,
            version,
            Some(name),
        ) {
            Some(model) => {
                batch.add_reference(model);
            }
            None => {
                if let Some(existing) = existing {
                    batch.retain_reference(existing.id);
                }
            }
        }
    }

    /// Stage a new package component and, when the repository is known, its
    /// dependency reference. The reference targets the component's batch id.
    fn stage_pending(&self, batch: &mut BatchRequest, repo_id: Option<&str>, dep: &Dependency) {
        let batch_id = dep.name();
        let body = self
            .components
            .component_body(Workspace::SoftwarePackages, dep.name());
        batch
            .components
            .add_create(BatchCreate::new(body).with_batch_id(batch_id));

        if let Some(repo_id) = repo_id {
            if let Some(model) = build_create_or_update_model(
                None,
                repo_id,
                batch_id,
                Relationship::DependsOnVersion,
                Some(dep.version()),
                Some(&dep.full_name()),
            ) {
                batch.add_reference(model);
            }
        }
    }
}
