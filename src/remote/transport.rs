//! HTTP transport.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

use crate::error::RemoteError;

/// A decoded response from the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body (`Null` when empty or not JSON on an error status)
    pub body: Value,
}

impl RemoteResponse {
    /// Create a response.
    pub fn new(status: u16, body: Value) -> Self {
        RemoteResponse { status, body }
    }
}

/// Authenticated access to the remote store.
///
/// `path` is either relative to the store's base URL or an absolute URL
/// (pagination links are followed verbatim).
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<RemoteResponse, RemoteError>;

    /// Issue a POST request with a JSON body.
    fn post(&self, path: &str, body: &Value) -> Result<RemoteResponse, RemoteError>;
}

/// Spaces requests at a fixed interval.
#[derive(Debug)]
struct Throttle {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl Throttle {
    fn new(requests_per_second: u32) -> Self {
        Throttle {
            interval: Duration::from_secs(1) / requests_per_second.max(1),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Block until this caller's slot comes up.
    fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock().unwrap_or_else(|e| e.into_inner());
            let slot = (*next).max(Instant::now());
            *next = slot + self.interval;
            slot
        };

        let now = Instant::now();
        if slot > now {
            thread::sleep(slot - now);
        }
    }
}

/// [`Transport`] over `reqwest`'s blocking client with bearer auth and a
/// requests-per-second ceiling.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: String,
    throttle: Throttle,
}

impl HttpTransport {
    /// Create a transport for `base_url`.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        requests_per_second: u32,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url).map_err(|e| RemoteError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("depsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RemoteError::Transport {
                path: base_url.to_string(),
                source,
            })?;

        Ok(HttpTransport {
            client,
            base_url,
            api_key: api_key.into(),
            throttle: Throttle::new(requests_per_second),
        })
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        let joined = match Url::parse(path) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url.join(path),
            Err(e) => Err(e),
        };
        joined.map_err(|e| RemoteError::InvalidUrl {
            url: path.to_string(),
            message: e.to_string(),
        })
    }

    fn send(
        &self,
        path: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<RemoteResponse, RemoteError> {
        self.throttle.wait();

        let transport = |source| RemoteError::Transport {
            path: path.to_string(),
            source,
        };

        let response = request
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(transport)?;

        let status = response.status().as_u16();
        let text = response.text().map_err(transport)?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(e) if (200..300).contains(&status) => return Err(RemoteError::decode(path, e)),
                Err(_) => Value::String(text),
            }
        };

        tracing::debug!("{} {}", status, path);
        Ok(RemoteResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<RemoteResponse, RemoteError> {
        let url = self.url(path)?;
        self.send(path, self.client.get(url).query(query))
    }

    fn post(&self, path: &str, body: &Value) -> Result<RemoteResponse, RemoteError> {
        let url = self.url(path)?;
        self.send(path, self.client.post(url).json(body))
    }
}
