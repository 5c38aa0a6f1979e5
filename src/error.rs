//! Error types.
//!
//! Only failures a caller has to act on are errors. A failed search or
//! create for a single component, or a failed reference lookup, is folded
//! into the run's status counts instead (see `ops::reconcile`).

use thiserror::Error;

use crate::core::Workspace;
use crate::parsers::ManifestFormat;

/// Failure talking to the inventory API.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to `{path}` failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} from `{path}`")]
    Status { status: u16, path: String },

    #[error("could not decode response from `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid url `{url}`: {message}")]
    InvalidUrl { url: String, message: String },
}

impl RemoteError {
    /// Build a decode error for a path.
    pub fn decode(path: impl Into<String>, source: serde_json::Error) -> Self {
        RemoteError::Decode {
            path: path.into(),
            source,
        }
    }
}

/// Failure normalizing a manifest into dependencies.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no dependencies found in {format} manifest")]
    NoDependencies { format: ManifestFormat },

    #[error("failed to parse {format} manifest: {message}")]
    Malformed {
        format: ManifestFormat,
        message: String,
    },
}

/// Invalid or incomplete configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("workspace `{0}` is not configured")]
    MissingWorkspace(Workspace),

    #[error("workspace `{0}` has an empty id or type_id")]
    IncompleteWorkspace(Workspace),

    #[error("`remote.base_url` is not set")]
    MissingBaseUrl,

    #[error("`remote.api_key` is not set")]
    MissingApiKey,

    #[error("`remote.requests_per_second` must be greater than zero")]
    InvalidRate,
}

/// A batch could not be submitted at all.
///
/// Raised before any network attempt; network failures during submission
/// are reported as error counts instead.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to serialize batch: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal failure of a whole synchronization request.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl SyncError {
    /// True if the request itself was bad (not worth retrying).
    pub fn is_client_error(&self) -> bool {
        matches!(self, SyncError::Parse(_))
    }
}
