//! Yarn berry `yarn.lock` (YAML).

use serde_yaml::Value;

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{malformed, ManifestFormat, Normalizer};

/// Reads resolved package versions from a Yarn berry lockfile.
#[derive(Debug, Default, Clone, Copy)]
pub struct YarnParser;

/// Reduce a descriptor key such as `"@babel/core@npm:^7.0.0, @babel/core@npm:^7.1.0"`
/// to the package name.
fn package_name(key: &str) -> &str {
    let first = key.split(", ").next().unwrap_or(key).trim_matches('"');
    let search_from = usize::from(first.starts_with('@'));
    match first[search_from..].find('@') {
        Some(idx) => &first[..idx + search_from],
        None => first,
    }
}

/// Versions like `1.0` load as YAML floats.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Normalizer for YarnParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Yarn
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        let doc: Value =
            serde_yaml::from_str(manifest).map_err(|e| malformed(ManifestFormat::Yarn, e))?;

        let Some(entries) = doc.as_mapping() else {
            return Ok(Vec::new());
        };

        Ok(entries
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                if key == "__metadata" {
                    return None;
                }
                let Some(version) = value.get("version").and_then(scalar) else {
                    tracing::warn!("Skipping yarn.lock entry without a version: {}", key);
                    return None;
                };
                Some(Dependency::new(package_name(key), version))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lockfile_entries() {
        let lock = r#"
__metadata:
  version: 6
  cacheKey: 8

"@babel/core@npm:^7.0.0, @babel/core@npm:^7.12.3":
  version: 7.23.7
  resolution: "@babel/core@npm:7.23.7"

"lodash@npm:^4.17.21":
  version: 4.17.21
  resolution: "lodash@npm:4.17.21"

"broken@npm:1":
  resolution: "broken@npm:1"
"#;
        let deps = YarnParser.parse(lock).unwrap();
        let pairs: Vec<_> = deps.iter().map(|d| (d.name(), d.version())).collect();
        assert_eq!(pairs, vec![("@babel/core", "7.23.7"), ("lodash", "4.17.21")]);
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("react@npm:18.2.0"), "react");
        assert_eq!(package_name("@scope/pkg@npm:1.0.0"), "@scope/pkg");
        assert_eq!(package_name("plain"), "plain");
    }

    #[test]
    fn test_empty_document() {
        assert!(YarnParser.parse("").unwrap().is_empty());
    }
}
