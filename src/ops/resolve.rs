//! Component resolution.
//!
//! Maps `(workspace, name)` to a remote component identifier with as few
//! remote calls as possible: the shared cache first, then a search, then
//! (for structural components) a create. Software packages are primed in
//! bulk from the dependency report before the first lookup.

use std::sync::Arc;

use crate::batch::ComponentBody;
use crate::core::{ComponentStatus, Dependency, Workspace, WorkspaceSettings, WorkspaceTable};
use crate::error::RemoteError;
use crate::remote::{ComponentCache, ComponentRepository, ReportRepository, Transport};

/// Outcome of resolving one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Found in the cache or by search
    Existing(String),
    /// Created by this call
    Created(String),
    /// Not found; creation must be staged in a batch
    Pending,
    /// A remote call failed
    Error,
}

impl Resolution {
    /// The status this outcome is counted under.
    pub fn status(&self) -> ComponentStatus {
        match self {
            Resolution::Existing(_) => ComponentStatus::Existing,
            Resolution::Created(_) => ComponentStatus::Created,
            Resolution::Pending => ComponentStatus::Pending,
            Resolution::Error => ComponentStatus::Error,
        }
    }

    /// The component identifier, when known.
    pub fn id(&self) -> Option<&str> {
        match self {
            Resolution::Existing(id) | Resolution::Created(id) => Some(id),
            Resolution::Pending | Resolution::Error => None,
        }
    }
}

/// Resolves component names to remote identifiers.
pub struct ComponentResolver {
    components: ComponentRepository,
    reports: ReportRepository,
    cache: Arc<ComponentCache>,
    workspaces: WorkspaceTable<WorkspaceSettings>,
    report_id: Option<String>,
}

impl ComponentResolver {
    /// Create a resolver. Without a `report_id` no priming happens and every
    /// package is searched individually.
    pub fn new(
        transport: Arc<dyn Transport>,
        workspaces: WorkspaceTable<WorkspaceSettings>,
        cache: Arc<ComponentCache>,
        report_id: Option<String>,
    ) -> Self {
        ComponentResolver {
            components: ComponentRepository::new(Arc::clone(&transport)),
            reports: ReportRepository::new(transport),
            cache,
            workspaces,
            report_id,
        }
    }

    /// Settings for a workspace.
    pub fn settings(&self, workspace: Workspace) -> &WorkspaceSettings {
        &self.workspaces[workspace]
    }

    /// Body for creating `name` in `workspace`.
    pub fn component_body(&self, workspace: Workspace, name: &str) -> ComponentBody {
        let settings = self.settings(workspace);
        ComponentBody {
            root_workspace: settings.id.clone(),
            name: name.to_string(),
            type_id: settings.type_id.clone(),
        }
    }

    /// Populate the software-package cache from the dependency report.
    ///
    /// Runs at most once until the cache is cleared, even when the report
    /// fails or is empty. Returns `true` if this call fetched the report.
    pub fn prime(&self) -> bool {
        let Some(report_id) = self.report_id.as_deref() else {
            return false;
        };

        self.cache.prime_with(Workspace::SoftwarePackages, || {
            match self.reports.export(report_id) {
                Ok(rows) => {
                    tracing::info!("Primed {} packages from report {}", rows.len(), report_id);
                    rows.into_iter().map(|r| (r.name, r.id)).collect()
                }
                Err(e) => {
                    tracing::warn!("Could not load dependency report {}: {}", report_id, e);
                    Vec::new()
                }
            }
        })
    }

    /// Drop all cached identifiers so the next package lookup re-primes.
    pub fn invalidate(&self) {
        tracing::debug!("Clearing component cache");
        self.cache.clear();
    }

    /// Cache an identifier, returning whichever identifier won the key.
    fn remember(&self, workspace: Workspace, name: &str, id: String) -> String {
        if self.cache.set(workspace, name, id.as_str()) {
            id
        } else {
            self.cache.get(workspace, name).unwrap_or(id)
        }
    }

    /// Cache, then search. Search failures are logged here.
    fn lookup(&self, workspace: Workspace, name: &str) -> Result<Option<String>, RemoteError> {
        if workspace == Workspace::SoftwarePackages {
            self.prime();
        }

        if let Some(id) = self.cache.get(workspace, name) {
            tracing::debug!("Cache hit for {} '{}'", workspace, name);
            return Ok(Some(id));
        }

        match self.components.search(self.settings(workspace), name) {
            Ok(Some(id)) => Ok(Some(self.remember(workspace, name, id))),
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::warn!("Search for {} '{}' failed: {}", workspace, name, e);
                Err(e)
            }
        }
    }

    /// Find a component, creating it if the search comes back empty.
    pub fn resolve_or_create(&self, name: &str, workspace: Workspace) -> Resolution {
        match self.lookup(workspace, name) {
            Ok(Some(id)) => Resolution::Existing(id),
            Ok(None) => {
                let body = self.component_body(workspace, name);
                match self.components.create(&body) {
                    Ok(id) => {
                        tracing::info!("Created {} component '{}'", workspace, name);
                        Resolution::Created(self.remember(workspace, name, id))
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to create {} component '{}': {}",
                            workspace,
                            name,
                            e
                        );
                        Resolution::Error
                    }
                }
            }
            Err(_) => Resolution::Error,
        }
    }

    /// Resolve a dependency's package component without creating it.
    ///
    /// A package that does not exist yet comes back [`Resolution::Pending`];
    /// the caller stages its creation in the batch. On success the
    /// dependency's component id is recorded.
    pub fn resolve_dependency(&self, dependency: &Dependency) -> Resolution {
        let resolution = match self.lookup(Workspace::SoftwarePackages, dependency.name()) {
            Ok(Some(id)) => Resolution::Existing(id),
            Ok(None) => Resolution::Pending,
            Err(_) => Resolution::Error,
        };
        if let Some(id) = resolution.id() {
            dependency.set_component_id(id);
        }
        resolution
    }

    /// Find a component by search only.
    pub fn find(&self, name: &str, workspace: Workspace) -> Option<String> {
        let found = self.lookup(workspace, name).ok().flatten();
        if found.is_none() {
            tracing::debug!("No {} component named '{}'", workspace, name);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{workspaces, Method, MockTransport, StoreFixture};

    fn resolver(store: StoreFixture) -> (ComponentResolver, Arc<MockTransport>) {
        let mock = Arc::new(store.into_transport());
        let resolver = ComponentResolver::new(
            mock.clone(),
            workspaces(),
            Arc::new(ComponentCache::new()),
            Some("rep-1".to_string()),
        );
        (resolver, mock)
    }

    #[test]
    fn test_resolve_existing_then_cached() {
        let store = StoreFixture::new().component(Workspace::CodeRepository, "api", "repo-1");
        let (resolver, mock) = resolver(store);

        let first = resolver.resolve_or_create("api", Workspace::CodeRepository);
        let second = resolver.resolve_or_create("api", Workspace::CodeRepository);

        assert_eq!(first, Resolution::Existing("repo-1".into()));
        assert_eq!(second, first);
        assert_eq!(mock.count(Method::Get, "api/v2/components"), 1);
    }

    #[test]
    fn test_resolve_creates_missing() {
        let (resolver, mock) = resolver(StoreFixture::new());

        let created = resolver.resolve_or_create("github.com/acme", Workspace::VcsHosting);
        assert_eq!(created, Resolution::Created("new-github.com/acme".into()));
        assert_eq!(created.status(), ComponentStatus::Created);

        // Created ids are cached like found ones
        let again = resolver.resolve_or_create("github.com/acme", Workspace::VcsHosting);
        assert_eq!(again, Resolution::Existing("new-github.com/acme".into()));
        assert_eq!(mock.count(Method::Post, "api/v2/components"), 1);
        assert_eq!(mock.count(Method::Get, "api/v2/components"), 1);
    }

    #[test]
    fn test_failed_create_is_not_cached() {
        let store = StoreFixture {
            create_status: 500,
            ..StoreFixture::new()
        };
        let (resolver, mock) = resolver(store);

        assert_eq!(resolver.resolve_or_create("api", Workspace::CodeRepository), Resolution::Error);
        assert_eq!(resolver.resolve_or_create("api", Workspace::CodeRepository), Resolution::Error);
        assert_eq!(mock.count(Method::Post, "api/v2/components"), 2);
    }

    #[test]
    fn test_failed_search_is_error() {
        let store = StoreFixture {
            fail_search: true,
            ..StoreFixture::new()
        };
        let (resolver, mock) = resolver(store);

        assert_eq!(resolver.resolve_or_create("api", Workspace::CodeRepository), Resolution::Error);
        assert_eq!(mock.count(Method::Post, "api/v2/components"), 0);
    }

    #[test]
    fn test_priming_replaces_searches() {
        let store = StoreFixture::new()
            .report_row("serde", "pkg-serde")
            .report_row("tokio", "pkg-tokio");
        let (resolver, mock) = resolver(store);

        for (name, id) in [("serde", "pkg-serde"), ("tokio", "pkg-tokio")] {
            let dep = Dependency::new(name, "1.0.0");
            assert_eq!(resolver.resolve_dependency(&dep), Resolution::Existing(id.into()));
            assert_eq!(dep.component_id(), Some(id));
        }

        assert_eq!(mock.count(Method::Get, "api/report/"), 1);
        assert_eq!(mock.count(Method::Get, "api/v2/components"), 0);
    }

    #[test]
    fn test_without_report_packages_are_searched() {
        let store = StoreFixture::new()
            .report_row("serde", "pkg-serde")
            .component(Workspace::SoftwarePackages, "serde", "pkg-serde");
        let mock = Arc::new(store.into_transport());
        let resolver = ComponentResolver::new(
            mock.clone(),
            workspaces(),
            Arc::new(ComponentCache::new()),
            None,
        );

        let dep = Dependency::new("serde", "1.0.0");
        assert_eq!(resolver.resolve_dependency(&dep), Resolution::Existing("pkg-serde".into()));
        assert_eq!(mock.count(Method::Get, "api/report/"), 0);
        assert_eq!(mock.count(Method::Get, "api/v2/components"), 1);
    }

    #[test]
    fn test_unknown_dependency_is_pending() {
        let (resolver, mock) = resolver(StoreFixture::new());

        let dep = Dependency::new("left-pad", "1.3.0");
        assert_eq!(resolver.resolve_dependency(&dep), Resolution::Pending);
        assert!(dep.component_id().is_none());
        assert_eq!(mock.count(Method::Post, "api/v2/components"), 0);
    }

    #[test]
    fn test_failed_report_primes_once() {
        let store = StoreFixture {
            report: None,
            ..StoreFixture::new()
        }
        .component(Workspace::SoftwarePackages, "serde", "pkg-serde");
        let (resolver, mock) = resolver(store);

        let dep = Dependency::new("serde", "1.0.0");
        assert_eq!(resolver.resolve_dependency(&dep), Resolution::Existing("pkg-serde".into()));
        resolver.resolve_dependency(&Dependency::new("tokio", "1.0.0"));

        assert_eq!(mock.count(Method::Get, "api/report/"), 1);
    }

    #[test]
    fn test_invalidate_forces_reprime() {
        let store = StoreFixture::new().report_row("serde", "pkg-serde");
        let (resolver, mock) = resolver(store);

        resolver.resolve_dependency(&Dependency::new("serde", "1.0.0"));
        resolver.invalidate();
        resolver.resolve_dependency(&Dependency::new("serde", "1.0.0"));

        assert_eq!(mock.count(Method::Get, "api/report/"), 2);
    }

    #[test]
    fn test_find_does_not_create() {
        let store = StoreFixture::new().component(Workspace::Applications, "billing", "app-1");
        let (resolver, mock) = resolver(store);

        assert_eq!(resolver.find("billing", Workspace::Applications).as_deref(), Some("app-1"));
        assert_eq!(resolver.find("ghost", Workspace::Applications), None);
        assert_eq!(mock.count(Method::Post, ""), 0);
    }

    #[test]
    fn test_component_body_uses_workspace_settings() {
        let (resolver, _) = resolver(StoreFixture::new());
        let body = resolver.component_body(Workspace::SoftwarePackages, "serde");
        assert_eq!(body.root_workspace, "ws-software_packages");
        assert_eq!(body.type_id, "type-software_packages");
        assert_eq!(body.name, "serde");
    }
}
