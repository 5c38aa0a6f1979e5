//! Reference search and listing.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::core::{ExistingReference, ReferenceFields};
use crate::error::RemoteError;
use crate::remote::Transport;

const REFERENCES_PATH: &str = "api/v2/references";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceEntity {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    custom_fields: Option<ReferenceFields>,
}

impl From<ReferenceEntity> for ExistingReference {
    fn from(entity: ReferenceEntity) -> Self {
        let fields = entity.custom_fields.unwrap_or_default();
        ExistingReference {
            id: entity.id,
            target: entity.target,
            version: fields.version,
            name: fields.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    next: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct ReferencePage {
    #[serde(default)]
    values: Vec<ReferenceEntity>,
    #[serde(rename = "_links", default)]
    links: Links,
}

/// Reference lookups against the remote store.
#[derive(Clone)]
pub struct ReferenceRepository {
    transport: Arc<dyn Transport>,
}

impl ReferenceRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ReferenceRepository { transport }
    }

    fn fetch_page(&self, path: &str, query: &[(&str, &str)]) -> Result<ReferencePage, RemoteError> {
        let response = self.transport.get(path, query)?;
        if response.status != 200 {
            return Err(RemoteError::Status {
                status: response.status,
                path: path.to_string(),
            });
        }
        serde_json::from_value(response.body).map_err(|e| RemoteError::decode(path, e))
    }

    /// Find the reference between an exact source/target pair.
    pub fn search(
        &self,
        source: &str,
        target: &str,
    ) -> Result<Option<ExistingReference>, RemoteError> {
        tracing::debug!("Searching for reference {} -> {}", source, target);

        let page = self.fetch_page(REFERENCES_PATH, &[("source", source), ("target", target)])?;
        Ok(page.values.into_iter().next().map(ExistingReference::from))
    }

    /// List every reference from `source` into `target_workspace`, keyed by
    /// target component identifier.
    ///
    /// Follows `_links.next.href` page by page. Any failing page fails the
    /// whole listing, so callers never diff against a partial snapshot.
    pub fn list(
        &self,
        source: &str,
        root_workspace: &str,
        target_workspace: &str,
    ) -> Result<HashMap<String, ExistingReference>, RemoteError> {
        let mut references = HashMap::new();
        let mut page = self.fetch_page(
            REFERENCES_PATH,
            &[
                ("source", source),
                ("rootWorkspace", root_workspace),
                ("targetWorkspace", target_workspace),
            ],
        )?;
        let mut seen_links = Vec::new();
        let mut pages = 1;

        loop {
            for entity in page.values {
                let reference = ExistingReference::from(entity);
                let key = reference.target.clone().unwrap_or_else(|| reference.id.clone());
                references.insert(key, reference);
            }

            let Some(next) = page.links.next.map(|l| l.href) else {
                break;
            };
            if seen_links.contains(&next) {
                tracing::warn!("Reference listing repeated page link {}, stopping", next);
                break;
            }

            page = self.fetch_page(&next, &[])?;
            seen_links.push(next);
            pages += 1;
        }

        tracing::debug!(
            "Listed {} references from {} over {} page(s)",
            references.len(),
            source,
            pages
        );
        Ok(references)
    }
}
