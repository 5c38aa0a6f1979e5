//! `dotnet list package --format json`.

use serde::Deserialize;

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{malformed, ManifestFormat, Normalizer};

/// Reads top-level packages from the .NET CLI's JSON package listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotnetParser;

#[derive(Deserialize, Default)]
#[serde(default)]
struct Listing {
    projects: Vec<Project>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    frameworks: Vec<Framework>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Framework {
    top_level_packages: Vec<Package>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    id: String,
    resolved_version: String,
}

impl Normalizer for DotnetParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Dotnet
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        if manifest.trim().is_empty() {
            return Ok(Vec::new());
        }

        let listing: Listing =
            serde_json::from_str(manifest).map_err(|e| malformed(ManifestFormat::Dotnet, e))?;

        Ok(listing
            .projects
            .into_iter()
            .flat_map(|p| p.frameworks)
            .flat_map(|f| f.top_level_packages)
            .map(|p| Dependency::new(p.id, p.resolved_version))
            .collect())
    }
}
