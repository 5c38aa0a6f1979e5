//! depsync - keeps a component inventory in sync with build manifests
//!
//! This crate normalizes dependency manifests (Gradle, Maven, npm, Yarn,
//! pip, .NET), resolves every package to a component in a remote inventory
//! store and reconciles the repository's dependency references with a
//! single atomic batch per run.

pub mod batch;
pub mod core;
pub mod error;
pub mod ops;
pub mod parsers;
pub mod remote;
pub mod util;

/// Test utilities and mocks for depsync unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted transport and a fake inventory
/// store.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ComponentStatus, Dependency, StatusCounts, SyncRequest, Workspace};
pub use error::{ConfigError, ParseError, RemoteError, SubmitError, SyncError};
pub use ops::Reconciler;
pub use parsers::ManifestFormat;
pub use remote::ComponentCache;
pub use util::config::Config;
