//! Inbound synchronization request.

use serde::{Deserialize, Serialize};

use crate::parsers::ManifestFormat;

/// Everything needed to reconcile one repository's dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Manifest format of `manifest` (and `manifest_other`)
    pub format: ManifestFormat,

    /// Raw manifest text
    pub manifest: String,

    /// Optional secondary manifest merged into the first
    #[serde(default)]
    pub manifest_other: Option<String>,

    /// Hosting platform component name (e.g. `github.com/acme`)
    pub vcs_host: String,

    /// Code repository component name
    pub code_repository: String,

    /// Application that maintains the repository
    #[serde(default)]
    pub application: Option<String>,

    /// Implementation language component name
    #[serde(default)]
    pub language: Option<String>,

    /// Language version, recorded on the repository -> language reference
    #[serde(default)]
    pub language_version: Option<String>,
}

impl SyncRequest {
    /// Create a request with the required fields.
    pub fn new(
        format: ManifestFormat,
        manifest: impl Into<String>,
        vcs_host: impl Into<String>,
        code_repository: impl Into<String>,
    ) -> Self {
        SyncRequest {
            format,
            manifest: manifest.into(),
            manifest_other: None,
            vcs_host: vcs_host.into(),
            code_repository: code_repository.into(),
            application: None,
            language: None,
            language_version: None,
        }
    }

    /// Attach a secondary manifest.
    pub fn with_manifest_other(mut self, manifest: impl Into<String>) -> Self {
        self.manifest_other = Some(manifest.into());
        self
    }

    /// Set the maintaining application.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    /// Set the language and its version.
    pub fn with_language(mut self, language: impl Into<String>, version: Option<String>) -> Self {
        self.language = Some(language.into());
        self.language_version = version;
        self
    }
}
