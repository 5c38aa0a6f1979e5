//! Command implementations

pub mod completions;
pub mod parse;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};

/// Read a manifest file.
pub fn read_manifest(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))
}
