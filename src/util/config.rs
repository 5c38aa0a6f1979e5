//! Configuration file support for depsync.
//!
//! depsync supports two configuration file locations:
//! - Global: `~/.depsync/config.toml` - User-wide defaults
//! - Project: `./depsync.toml` - Per-checkout overrides
//!
//! Project config takes precedence over global config. An explicit
//! `--config` path replaces both. Environment variables are applied last:
//! `DEPSYNC_API_URL`, `DEPSYNC_API_KEY` and `DEPSYNC_REPORT_ID`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Workspace, WorkspaceSettings, WorkspaceTable};
use crate::error::ConfigError;

/// Default requests-per-second ceiling for the remote store.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `remote.base_url`.
pub const ENV_API_URL: &str = "DEPSYNC_API_URL";
/// Environment variable overriding `remote.api_key`.
pub const ENV_API_KEY: &str = "DEPSYNC_API_KEY";
/// Environment variable overriding `report.dependency_report_id`.
pub const ENV_REPORT_ID: &str = "DEPSYNC_REPORT_ID";

/// depsync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote store connection
    pub remote: RemoteConfig,

    /// Bulk report settings
    pub report: ReportConfig,

    /// Run settings
    pub sync: SyncConfig,

    /// Workspace mapping
    pub workspaces: WorkspacesConfig,
}

/// Remote store connection settings.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the inventory API
    pub base_url: Option<String>,

    /// Bearer token
    pub api_key: Option<String>,

    /// Request ceiling
    pub requests_per_second: Option<u32>,

    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("requests_per_second", &self.requests_per_second)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Dependency report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report listing every software package component
    pub dependency_report_id: Option<String>,
}

/// Run settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of parallel resolution threads (None = auto-detect)
    pub jobs: Option<usize>,
}

/// One optional table per workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacesConfig {
    pub vcs_hosting: Option<WorkspaceSettings>,
    pub code_repository: Option<WorkspaceSettings>,
    pub applications: Option<WorkspaceSettings>,
    pub software_packages: Option<WorkspaceSettings>,
}

impl WorkspacesConfig {
    fn slot(&mut self, workspace: Workspace) -> &mut Option<WorkspaceSettings> {
        match workspace {
            Workspace::VcsHosting => &mut self.vcs_hosting,
            Workspace::CodeRepository => &mut self.code_repository,
            Workspace::Applications => &mut self.applications,
            Workspace::SoftwarePackages => &mut self.software_packages,
        }
    }

    /// Settings for a workspace, if configured.
    pub fn get(&self, workspace: Workspace) -> Option<&WorkspaceSettings> {
        match workspace {
            Workspace::VcsHosting => self.vcs_hosting.as_ref(),
            Workspace::CodeRepository => self.code_repository.as_ref(),
            Workspace::Applications => self.applications.as_ref(),
            Workspace::SoftwarePackages => self.software_packages.as_ref(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Remote settings
        if other.remote.base_url.is_some() {
            self.remote.base_url = other.remote.base_url;
        }
        if other.remote.api_key.is_some() {
            self.remote.api_key = other.remote.api_key;
        }
        if other.remote.requests_per_second.is_some() {
            self.remote.requests_per_second = other.remote.requests_per_second;
        }
        if other.remote.timeout_secs.is_some() {
            self.remote.timeout_secs = other.remote.timeout_secs;
        }

        if other.report.dependency_report_id.is_some() {
            self.report.dependency_report_id = other.report.dependency_report_id;
        }
        if other.sync.jobs.is_some() {
            self.sync.jobs = other.sync.jobs;
        }

        // Workspaces are replaced table by table
        let mut other_workspaces = other.workspaces;
        for ws in Workspace::ALL {
            if let Some(settings) = other_workspaces.slot(ws).take() {
                *self.workspaces.slot(ws) = Some(settings);
            }
        }
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            self.remote.base_url = Some(url);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.remote.api_key = Some(key);
        }
        if let Some(report) = lookup(ENV_REPORT_ID) {
            self.report.dependency_report_id = Some(report);
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    /// The workspace table.
    ///
    /// Every workspace must be configured with a non-empty id and type id.
    pub fn workspaces(&self) -> Result<WorkspaceTable<WorkspaceSettings>, ConfigError> {
        WorkspaceTable::try_from_fn(|ws| {
            let settings = self
                .workspaces
                .get(ws)
                .ok_or(ConfigError::MissingWorkspace(ws))?;
            if settings.id.trim().is_empty() || settings.type_id.trim().is_empty() {
                return Err(ConfigError::IncompleteWorkspace(ws));
            }
            Ok(settings.clone())
        })
    }

    /// Base URL of the remote store.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.remote
            .base_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)
    }

    /// API key for the remote store.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.remote
            .api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Dependency report identifier, if priming is configured.
    pub fn report_id(&self) -> Option<&str> {
        self.report
            .dependency_report_id
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    /// Request ceiling, defaulting to [`DEFAULT_REQUESTS_PER_SECOND`].
    pub fn requests_per_second(&self) -> Result<u32, ConfigError> {
        match self.remote.requests_per_second {
            Some(0) => Err(ConfigError::InvalidRate),
            Some(n) => Ok(n),
            None => Ok(DEFAULT_REQUESTS_PER_SECOND),
        }
    }

    /// HTTP timeout, defaulting to [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (./depsync.toml)
/// 2. Global config (~/.depsync/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global depsync config directory (~/.depsync).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".depsync"))
}

/// Get the global config path (~/.depsync/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (./depsync.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join("depsync.toml")
}
