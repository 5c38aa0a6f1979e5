//! Batch submission.

use std::sync::Arc;

use crate::batch::{BatchRequest, BatchResponse, BatchResult, BatchType};
use crate::core::{ComponentStatus, StatusCounts};
use crate::error::SubmitError;
use crate::remote::Transport;

const BATCH_PATH: &str = "api/v2/batch";

/// Submits batches and turns the outcome into status counts.
#[derive(Clone)]
pub struct BatchRepository {
    transport: Arc<dyn Transport>,
}

impl BatchRepository {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        BatchRepository { transport }
    }

    /// Submit a batch as one atomic call.
    ///
    /// Only a batch that cannot be serialized is an error. A transport
    /// failure, a non-200 response or an unreadable response attributes the
    /// whole batch to [`ComponentStatus::Error`].
    pub fn submit(&self, batch: &BatchRequest) -> Result<StatusCounts, SubmitError> {
        let payload = serde_json::to_value(batch)?;
        let total = batch.total_operations();
        let failed = || StatusCounts::from_pairs([(ComponentStatus::Error, total)]);

        tracing::debug!("Submitting batch of {} operations", total);

        let response = match self.transport.post(BATCH_PATH, &payload) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Batch submission failed: {}", e);
                return Ok(failed());
            }
        };

        if response.status != 200 {
            tracing::error!("Batch rejected with status {}", response.status);
            return Ok(failed());
        }

        let outcome: BatchResponse = match serde_json::from_value(response.body) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Could not read batch response: {}", e);
                return Ok(failed());
            }
        };

        let mut counts = StatusCounts::new();
        if let Some(result) = &outcome.components {
            tally(BatchType::Component, result, &mut counts);
        }
        if let Some(result) = &outcome.references {
            tally(BatchType::Reference, result, &mut counts);
        }
        Ok(counts)
    }
}

fn tally(kind: BatchType, result: &BatchResult, counts: &mut StatusCounts) {
    let groups = [
        (ComponentStatus::Created, &result.created),
        (ComponentStatus::Existing, &result.updated),
        (ComponentStatus::Deleted, &result.deleted),
    ];
    for (status, items) in groups {
        for item in items {
            tracing::debug!("{} {}: {}", kind, status, item.id());
        }
        counts.add(status, items.len());
    }
}
