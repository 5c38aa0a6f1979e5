//! `mvn dependency:tree` output.

use crate::core::Dependency;
use crate::error::ParseError;
use crate::parsers::{ManifestFormat, Normalizer};

/// Reads top-level entries of a Maven dependency tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct MavenParser;

impl MavenParser {
    fn parse_entry(entry: &str) -> Option<Dependency> {
        // `group:artifact:type[:classifier]:version:scope`, optionally
        // followed by an annotation such as ` (optional)`
        let coords = entry.split_whitespace().next()?;
        let parts: Vec<&str> = coords.split(':').collect();
        let version = match parts.len() {
            5 => parts[3],
            6 => parts[4],
            _ => return None,
        };
        Some(Dependency::new(format!("{}:{}", parts[0], parts[1]), version))
    }
}

impl Normalizer for MavenParser {
    fn format(&self) -> ManifestFormat {
        ManifestFormat::Maven
    }

    fn parse(&self, manifest: &str) -> Result<Vec<Dependency>, ParseError> {
        Ok(manifest
            .lines()
            .filter_map(|line| line.strip_prefix("[INFO] "))
            .filter_map(|line| line.strip_prefix("+- ").or_else(|| line.strip_prefix("\\- ")))
            .filter_map(MavenParser::parse_entry)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_tier_dependencies() {
        let tree = "\
[INFO] uk.gov.example:service:jar:0.0.1
[INFO] +- org.springframework.boot:spring-boot-starter-web:jar:2.7.2:compile
[INFO] |  +- org.springframework.boot:spring-boot-starter-json:jar:2.7.2:compile
[INFO] +- io.netty:netty-resolver-dns-native-macos:jar:osx-x86_64:4.1.79.Final:runtime
[INFO] \\- org.projectlombok:lombok:jar:1.18.24:provided (optional)
[INFO] BUILD SUCCESS
";
        let deps = MavenParser.parse(tree).unwrap();
        let pairs: Vec<_> = deps.iter().map(|d| (d.name(), d.version())).collect();
        assert_eq!(
            pairs,
            vec![
                ("org.springframework.boot:spring-boot-starter-web", "2.7.2"),
                ("io.netty:netty-resolver-dns-native-macos", "4.1.79.Final"),
                ("org.projectlombok:lombok", "1.18.24"),
            ]
        );
    }
}
