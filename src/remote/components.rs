//! Component search and create.

use std::sync::Arc;

use serde::Deserialize;

use crate::batch::ComponentBody;
use crate::core::WorkspaceSettings;
use crate::error::RemoteError;
use crate::remote::Transport;

const COMPONENTS_PATH: &str = "api/v2/components";

/// Any entity carrying a remote identifier.
#[derive(Debug, Deserialize)]
pub(crate) struct Entity {
    #[serde(rename = "_id")]
    pub id: String,
}

/// A list response.
#[derive(Debug, Deserialize)]
pub(crate) struct Values<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

/// Component lookups against the remote store.
#[derive(Clone)]
pub struct ComponentRepository {
    transport: Arc<dyn Transport>,
}

impl ComponentRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ComponentRepository { transport }
    }

    /// Search a workspace for a component by exact name.
    ///
    /// Returns the first match's identifier.
    pub fn search(
        &self,
        workspace: &WorkspaceSettings,
        name: &str,
    ) -> Result<Option<String>, RemoteError> {
        tracing::debug!("Searching for component '{}'", name);

        let response = self.transport.get(
            COMPONENTS_PATH,
            &[("rootWorkspace", workspace.id.as_str()), ("name", name)],
        )?;
        if response.status != 200 {
            return Err(RemoteError::Status {
                status: response.status,
                path: COMPONENTS_PATH.to_string(),
            });
        }

        let found: Values<Entity> = serde_json::from_value(response.body)
            .map_err(|e| RemoteError::decode(COMPONENTS_PATH, e))?;
        Ok(found.values.into_iter().next().map(|e| e.id))
    }

    /// Create a component and return its identifier.
    pub fn create(&self, body: &ComponentBody) -> Result<String, RemoteError> {
        tracing::debug!("Creating component '{}'", body.name);

        let payload =
            serde_json::to_value(body).map_err(|e| RemoteError::decode(COMPONENTS_PATH, e))?;
        let response = self.transport.post(COMPONENTS_PATH, &payload)?;
        if !matches!(response.status, 200 | 201) {
            return Err(RemoteError::Status {
                status: response.status,
                path: COMPONENTS_PATH.to_string(),
            });
        }

        let created: Entity = serde_json::from_value(response.body)
            .map_err(|e| RemoteError::decode(COMPONENTS_PATH, e))?;
        Ok(created.id)
    }
}
