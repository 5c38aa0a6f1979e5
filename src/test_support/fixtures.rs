//! Fixtures for reconciliation tests.
//!
//! [`StoreFixture`] describes the state of a fake inventory store and turns
//! it into a [`MockTransport`] that answers the API calls the reconciler
//! makes.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::core::{Workspace, WorkspaceSettings, WorkspaceTable};
use crate::remote::RemoteResponse;
use crate::test_support::{Method, MockRequest, MockTransport};

/// Workspace settings with predictable ids: `ws-<workspace>` and
/// `type-<workspace>`.
pub fn workspaces() -> WorkspaceTable<WorkspaceSettings> {
    WorkspaceTable::from_fn(|ws| {
        WorkspaceSettings::new(format!("ws-{}", ws), format!("type-{}", ws))
    })
}

/// State of a fake remote store.
#[derive(Debug, Clone)]
pub struct StoreFixture {
    /// Dependency report rows (`None` makes the report fail)
    pub report: Option<Vec<(String, String)>>,
    /// Components by `(workspace, name)`
    pub components: HashMap<(Workspace, String), String>,
    /// References returned when listing from the code repository
    pub snapshot: Vec<Value>,
    /// References returned for exact `(source, target)` searches
    pub pairs: HashMap<(String, String), Value>,
    /// Fail reference listing
    pub fail_snapshot: bool,
    /// Fail every component search
    pub fail_search: bool,
    /// Status returned by component create
    pub create_status: u16,
    /// Status returned by batch submit
    pub batch_status: u16,
}

impl Default for StoreFixture {
    fn default() -> Self {
        StoreFixture {
            report: Some(Vec::new()),
            components: HashMap::new(),
            snapshot: Vec::new(),
            pairs: HashMap::new(),
            fail_snapshot: false,
            fail_search: false,
            create_status: 201,
            batch_status: 200,
        }
    }
}

impl StoreFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component.
    pub fn component(mut self, workspace: Workspace, name: &str, id: &str) -> Self {
        self.components
            .insert((workspace, name.to_string()), id.to_string());
        self
    }

    /// Add a dependency report row.
    pub fn report_row(mut self, name: &str, id: &str) -> Self {
        self.report
            .get_or_insert_with(Vec::new)
            .push((name.to_string(), id.to_string()));
        self
    }

    /// Add a reference to the repository's dependency snapshot.
    pub fn snapshot_ref(mut self, id: &str, target: &str, version: &str, name: &str) -> Self {
        self.snapshot.push(json!({
            "_id": id,
            "target": target,
            "customFields": { "version": version, "name": name }
        }));
        self
    }

    /// Add a reference found by an exact source/target search.
    pub fn pair_ref(mut self, source: &str, target: &str, id: &str) -> Self {
        self.pairs.insert(
            (source.to_string(), target.to_string()),
            json!({ "_id": id }),
        );
        self
    }

    fn workspace_of(root: &str) -> Option<Workspace> {
        let settings = workspaces();
        let found = settings
            .iter()
            .find(|(_, s)| s.id == root)
            .map(|(ws, _)| ws);
        found
    }

    fn respond(&self, req: &MockRequest) -> RemoteResponse {
        let path = req.path.as_str();
        match req.method {
            Method::Get if path.starts_with("api/report/") => match &self.report {
                Some(rows) => RemoteResponse::new(
                    200,
                    Value::Array(
                        rows.iter()
                            .map(|(name, id)| json!({ "_id": id, "name": name }))
                            .collect(),
                    ),
                ),
                None => RemoteResponse::new(500, Value::Null),
            },
            Method::Get if path == "api/v2/components" => {
                if self.fail_search {
                    return RemoteResponse::new(500, Value::Null);
                }
                let found = req
                    .query_value("rootWorkspace")
                    .and_then(Self::workspace_of)
                    .zip(req.query_value("name"))
                    .and_then(|(ws, name)| self.components.get(&(ws, name.to_string())));
                let values: Vec<Value> = found.map(|id| json!({ "_id": id })).into_iter().collect();
                RemoteResponse::new(200, json!({ "values": values }))
            }
            Method::Post if path == "api/v2/components" => {
                let name = req
                    .body
                    .as_ref()
                    .and_then(|b| b["name"].as_str())
                    .unwrap_or_default();
                RemoteResponse::new(self.create_status, json!({ "_id": format!("new-{}", name) }))
            }
            Method::Get if path == "api/v2/references" => {
                if req.query_value("targetWorkspace").is_some() {
                    if self.fail_snapshot {
                        return RemoteResponse::new(500, Value::Null);
                    }
                    return RemoteResponse::new(200, json!({ "values": self.snapshot }));
                }
                let key = (
                    req.query_value("source").unwrap_or_default().to_string(),
                    req.query_value("target").unwrap_or_default().to_string(),
                );
                let values: Vec<Value> = self.pairs.get(&key).cloned().into_iter().collect();
                RemoteResponse::new(200, json!({ "values": values }))
            }
            Method::Post if path == "api/v2/batch" => {
                if self.batch_status != 200 {
                    return RemoteResponse::new(self.batch_status, Value::Null);
                }
                RemoteResponse::new(200, echo_batch(req.body.as_ref().unwrap_or(&Value::Null)))
            }
            _ => RemoteResponse::new(404, Value::Null),
        }
    }

    /// Build a transport serving this store.
    pub fn into_transport(self) -> MockTransport {
        MockTransport::new(move |req| Ok(self.respond(req)))
    }
}

/// Answer a batch as if every operation in it succeeded.
fn echo_batch(body: &Value) -> Value {
    let group = |g: &Value| {
        let len = |k: &str| g[k].as_array().map_or(0, Vec::len);
        let ids = |k: &str| -> Vec<Value> {
            g[k].as_array()
                .map(|ops| ops.iter().map(|op| op["id"].clone()).collect())
                .unwrap_or_default()
        };
        json!({
            "created": (0..len("create")).map(|i| format!("created-{}", i)).collect::<Vec<_>>(),
            "updated": ids("update"),
            "deleted": ids("delete"),
        })
    };
    json!({
        "components": group(&body["components"]),
        "references": group(&body["references"]),
    })
}
