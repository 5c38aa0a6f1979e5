//! `package-lock.json`.

use serde_json::Value;

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{malformed, ManifestFormat, Normalizer};

/// Reads the `packages` map of an npm lockfile (v2/v3), falling back to the
/// v1 `dependencies` map.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpmParser;

fn package_name(key: &str) -> &str {
    match key.rfind("node_modules/") {
        Some(idx) => &key[idx + "node_modules/".len()..],
        None => key,
    }
}

impl Normalizer for NpmParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Npm
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        if manifest.trim().is_empty() {
            return Ok(Vec::new());
        }

        let lock: Value =
            serde_json::from_str(manifest).map_err(|e| malformed(ManifestFormat::Npm, e))?;

        let entries = lock
            .get("packages")
            .and_then(Value::as_object)
            .or_else(|| lock.get("dependencies").and_then(Value::as_object));

        let Some(entries) = entries else {
            return Ok(Vec::new());
        };

        Ok(entries
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .filter_map(|(key, value)| {
                let version = value.get("version")?.as_str()?;
                Some(Dependency::new(package_name(key), version))
            })
            .collect())
    }
}
