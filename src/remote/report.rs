//! Bulk dependency report.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::RemoteError;
use crate::remote::Transport;

/// One row of the dependency report export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Fetches report exports.
#[derive(Clone)]
pub struct ReportRepository {
    transport: Arc<dyn Transport>,
}

impl ReportRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ReportRepository { transport }
    }

    /// Export every row of a report.
    pub fn export(&self, report_id: &str) -> Result<Vec<ReportEntry>, RemoteError> {
        let path = format!("api/report/{}/export-data", report_id);
        tracing::debug!("Fetching report {}", report_id);

        let response = self.transport.get(&path, &[])?;
        if response.status != 200 {
            return Err(RemoteError::Status {
                status: response.status,
                path,
            });
        }
        serde_json::from_value(response.body).map_err(|e| RemoteError::decode(path, e))
    }
}
