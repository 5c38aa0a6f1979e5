//! Manifest normalizers.
//!
//! Each build tool's dependency output is turned into a flat list of
//! [`Dependency`] values. The reconciler only sees that list, so adding a
//! format means adding one [`Normalizer`] implementation.

pub mod dotnet;
pub mod gradle;
pub mod maven;
pub mod npm;
pub mod pip;
pub mod yarn;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Dependency;
use crate::error::ParseError;

pub use dotnet::DotnetParser;
pub use gradle::GradleParser;
pub use maven::MavenParser;
pub use npm::NpmParser;
pub use pip::PipParser;
pub use yarn::YarnParser;

/// Supported manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// `gradle dependencies` output
    Gradle,
    /// `mvn dependency:tree` output
    Maven,
    /// `package-lock.json`
    Npm,
    /// Yarn berry `yarn.lock`
    Yarn,
    /// `requirements.txt`
    Pip,
    /// `dotnet list package --format json`
    Dotnet,
}

impl ManifestFormat {
    /// All formats.
    pub const ALL: [ManifestFormat; 6] = [
        ManifestFormat::Gradle,
        ManifestFormat::Maven,
        ManifestFormat::Npm,
        ManifestFormat::Yarn,
        ManifestFormat::Pip,
        ManifestFormat::Dotnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Gradle => "gradle",
            ManifestFormat::Maven => "maven",
            ManifestFormat::Npm => "npm",
            ManifestFormat::Yarn => "yarn",
            ManifestFormat::Pip => "pip",
            ManifestFormat::Dotnet => "dotnet",
        }
    }

    /// The normalizer for this format.
    pub fn normalizer(self) -> Box<dyn Normalizer> {
        match self {
            ManifestFormat::Gradle => Box::new(GradleParser),
            ManifestFormat::Maven => Box::new(MavenParser),
            ManifestFormat::Npm => Box::new(NpmParser),
            ManifestFormat::Yarn => Box::new(YarnParser),
            ManifestFormat::Pip => Box::new(PipParser),
            ManifestFormat::Dotnet => Box::new(DotnetParser),
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManifestFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = ManifestFormat::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown manifest format '{}'; expected one of: {}", s, names.join(", "))
            })
    }
}

/// Turns raw manifest text into dependencies.
pub trait Normalizer: Send + Sync {
    /// The format this normalizer reads.
    fn format(&self) -> ManifestFormat;

    /// Parse one manifest. An unrecognized but well-formed manifest yields
    /// an empty list; structurally broken input is an error.
    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError>;

    /// Parse a manifest and an optional secondary manifest, in that order.
    fn extract_dependencies(
        &self,
        manifest: &str,
        secondary: Option<&str>,
    ) -> Result<Vec<Dependency>, ParseError> {
        let mut deps = self.parse(manifest)?;
        if let Some(other) = secondary {
            deps.extend(self.parse(other)?);
        }
        Ok(deps)
    }
}

/// Normalize manifests into a name-unique dependency list.
///
/// The first occurrence of a name wins. Zero dependencies is an error.
pub fn normalize(
    format: ManifestFormat,
    manifest: &str,
    secondary: Option<&str>,
) -> Result<Vec<Dependency>, ParseError> {
    let deps = format.normalizer().extract_dependencies(manifest, secondary)?;

    let mut seen = HashSet::new();
    let deps: Vec<Dependency> = deps
        .into_iter()
        .filter(|d| seen.insert(d.name().to_string()))
        .collect();

    if deps.is_empty() {
        return Err(ParseError::NoDependencies { format });
    }

    tracing::debug!("Parsed {} {} dependencies", deps.len(), format);
    Ok(deps)
}

pub(crate) fn malformed(format: ManifestFormat, e: impl fmt::Display) -> ParseError {
    ParseError::Malformed {
        format,
        message: e.to_string(),
    }
}
