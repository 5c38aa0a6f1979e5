//! `requirements.txt`.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{ManifestFormat, Normalizer};

/// Reads pinned `name==version` requirements.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipParser;

static PINNED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*([A-Za-z][A-Za-z0-9._-]*)(?:\[[^\]]*\])?\s*==\s*([^\s;#,]+)")
        .expect("pinned requirement pattern is valid")
});

impl Normalizer for PipParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Pip
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        Ok(PINNED
            .captures_iter(manifest)
            .map(|c| Dependency::new(&c[1], &c[2]))
            .collect())
    }
}
