//! Test utilities and mocks for depsync unit tests.
//!
//! The remote store is reached only through [`Transport`], so tests script
//! its responses with a [`MockTransport`] and then inspect the requests it
//! recorded.
//!
//! # Example
//!
//! ```rust,ignore
//! use depsync::test_support::MockTransport;
//!
//! let mock = MockTransport::new(|req| {
//!     Ok(RemoteResponse::new(200, json!({ "values": [] })))
//! });
//! // hand `Arc::new(mock)` to a repository, run it, then:
//! assert_eq!(mock.count(Method::Get, "api/v2/components"), 1);
//! ```

pub mod fixtures;

use std::sync::Mutex;

use serde_json::Value;

use crate::error::RemoteError;
use crate::remote::{RemoteResponse, Transport};

pub use fixtures::{workspaces, StoreFixture};

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl MockRequest {
    /// Value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

type Handler = dyn Fn(&MockRequest) -> Result<RemoteResponse, RemoteError> + Send + Sync;

/// Scripted [`Transport`] that records every request.
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockTransport {
    /// Create a mock that answers every request with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&MockRequest) -> Result<RemoteResponse, RemoteError> + Send + Sync + 'static,
    {
        MockTransport {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, request: MockRequest) -> Result<RemoteResponse, RemoteError> {
        let response = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }

    /// All requests so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of requests with `method` whose path starts with `prefix`.
    pub fn count(&self, method: Method, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }

    /// Bodies of every POST to exactly `path`.
    pub fn posted(&self, path: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == Method::Post && r.path == path)
            .filter_map(|r| r.body.clone())
            .collect()
    }

    /// Clear request history.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl Transport for MockTransport {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<RemoteResponse, RemoteError> {
        self.record(MockRequest {
            method: Method::Get,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        })
    }

    fn post(&self, path: &str, body: &Value) -> Result<RemoteResponse, RemoteError> {
        self.record(MockRequest {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
    }
}

/// A transport-level failure, as if the connection could not be made.
pub fn transport_error(path: &str) -> RemoteError {
    let source = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("relative url must not build");
    RemoteError::Transport {
        path: path.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_records_requests() {
        let mock = MockTransport::new(|req| match req.method {
            Method::Get => Ok(RemoteResponse::new(200, json!({ "values": [] }))),
            Method::Post => Ok(RemoteResponse::new(201, json!({ "_id": "x" }))),
        });

        mock.get("api/v2/components", &[("name", "serde")]).unwrap();
        let created = mock.post("api/v2/components", &json!({ "name": "serde" })).unwrap();

        assert_eq!(created.status, 201);
        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.count(Method::Get, "api/v2/"), 1);
        assert_eq!(mock.requests()[0].query_value("name"), Some("serde"));
        assert_eq!(mock.posted("api/v2/components"), vec![json!({ "name": "serde" })]);

        mock.clear_requests();
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_transport_error() {
        let mock = MockTransport::new(|req| Err(transport_error(&req.path)));
        let err = mock.get("api/v2/batch", &[]).unwrap_err();
        assert!(err.to_string().contains("api/v2/batch"));
    }
}
