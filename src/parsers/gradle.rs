//! `gradle dependencies` tree output.

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{ManifestFormat, Normalizer};

/// Reads top-level entries of a Gradle dependency tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradleParser;

const MARKERS: [&str; 3] = [" (*)", " (c)", " (n)"];

impl GradleParser {
    fn parse_entry(entry: &str) -> Option<Dependency> {
        let mut entry = entry.trim();
        while let Some(stripped) = MARKERS.iter().find_map(|m| entry.strip_suffix(m)) {
            entry = stripped.trim_end();
        }

        if entry.starts_with("project ") {
            return None;
        }

        let (coords, resolved) = match entry.split_once(" -> ") {
            Some((coords, resolved)) => (coords.trim(), Some(resolved.trim())),
            None => (entry, None),
        };

        let parts: Vec<&str> = coords.split(':').collect();
        let (name, version) = match parts.as_slice() {
            [group, artifact, declared] => {
                (format!("{}:{}", group, artifact), resolved.unwrap_or(declared))
            }
            [group, artifact] => (format!("{}:{}", group, artifact), resolved?),
            _ => return None,
        };

        if version.is_empty() || version == "unspecified" {
            return None;
        }

        Some(Dependency::new(name, version))
    }
}

impl Normalizer for GradleParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Gradle
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        Ok(manifest
            .lines()
            .filter_map(|line| {
                line.strip_prefix("+--- ")
                    .or_else(|| line.strip_prefix("\\--- "))
            })
            .filter_map(GradleParser::parse_entry)
            .collect())
    }
}
