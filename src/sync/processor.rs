//! Batch processor
//!
//! Translates each queued record into one index mutation, sequentially, and
//! collects one outcome per record. A failed record never aborts the rest of
//! the batch; the caller reads retry semantics off the report.

use tracing::{debug, warn};

use crate::config::Config;
use crate::types::{BatchReport, ChangeOp, QueueEvent, QueueRecord, RecordOutcome};

use super::client::IndexClient;
use super::error::SyncError;

/// Processes one batch of queue records against the search engine
#[derive(Debug)]
pub struct BatchProcessor {
    client: IndexClient,
}

impl BatchProcessor {
    /// Create a processor with a client built once and reused for every
    /// record in the batch
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        Ok(Self {
            client: IndexClient::new(config)?,
        })
    }

    /// Apply every record in the event, in delivery order
    pub fn process(&self, event: &QueueEvent) -> BatchReport {
        let mut report = BatchReport::default();

        for record in &event.records {
            let outcome = self.process_record(record);
            match (&outcome.error, &outcome.doc_id) {
                (None, Some(doc_id)) => {
                    debug!(
                        "synced document {} ({})",
                        doc_id,
                        outcome.operation.map_or("?".to_string(), |op| op.to_string())
                    );
                }
                (Some(err), _) => {
                    warn!(
                        "record {} failed: {}",
                        outcome.message_id.as_deref().unwrap_or("<no id>"),
                        err
                    );
                }
                _ => {}
            }
            report.push(outcome);
        }

        report
    }

    /// Decode and apply a single record
    fn process_record(&self, record: &QueueRecord) -> RecordOutcome {
        let mut outcome = RecordOutcome {
            message_id: record.message_id.clone(),
            doc_id: None,
            operation: None,
            error: None,
        };

        let op = match ChangeOp::decode(&record.body) {
            Ok(op) => op,
            Err(err) => {
                outcome.error = Some(err);
                return outcome;
            }
        };

        outcome.doc_id = Some(op.doc_id.clone());
        outcome.operation = Some(op.operation);

        if let Err(err) = self.client.apply(&op) {
            outcome.error = Some(err);
        }
        outcome
    }
}

// Processor behavior is exercised end to end in tests/sync_test.rs against a
// mock engine; decode-only paths are covered in types.rs.
