//! Core types for the sync worker

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::sync::error::SyncError;

/// Unique identifier for an index document
pub type DocId = String;

/// Status string returned when every record in the batch synced
pub const SUCCESS_BODY: &str = "successfully synced the data on elasticsearch.";

/// Status string returned when any record failed (or the batch was empty)
pub const FAILURE_BODY: &str = "sync failed.";

/// Message group id shared by all sync notifications so FIFO queues
/// preserve delivery order
pub const MESSAGE_GROUP_ID: &str = "sync-elastic";

// ============================================================================
// Queue Event Types
// ============================================================================

/// A batch of queue records delivered to a single invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<QueueRecord>,
}

impl QueueEvent {
    pub fn new(records: Vec<QueueRecord>) -> Self {
        Self { records }
    }
}

/// One queued change notification
///
/// Only the fields the worker consumes are modeled; any other attributes the
/// queue attaches to a delivery are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRecord {
    /// Queue-assigned message id, carried through to the outcome for
    /// correlation
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// JSON-encoded change envelope
    pub body: String,
}

impl QueueRecord {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            body: body.into(),
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }
}

// ============================================================================
// Change Envelope
// ============================================================================

/// Index mutation kind, decoded once from the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Upsert,
    Delete,
}

impl Operation {
    /// Decode the envelope's method field.
    ///
    /// `"POST"` upserts and any other explicit method deletes. An absent
    /// method also upserts: producers that omit the field only ever publish
    /// upserts.
    pub fn from_method(method: Option<&str>) -> Self {
        match method {
            Some("POST") | None => Operation::Upsert,
            Some(_) => Operation::Delete,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Upsert => write!(f, "upsert"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Wire shape of the change envelope; every field optional so decoding can
/// report a precise per-field error instead of one opaque parse failure
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    doc: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

/// A change notification decoded into a closed operation
#[derive(Debug, Clone)]
pub struct ChangeOp {
    /// Identifier of the target document
    pub doc_id: DocId,
    /// Mutation to apply
    pub operation: Operation,
    /// Document payload; `Value::Null` for deletes that carry no doc
    pub doc: Value,
}

impl ChangeOp {
    /// Decode a record body into a change operation.
    ///
    /// The document identifier is taken from `doc.id`, falling back to a
    /// top-level `id`; it may be a JSON string or integer.
    pub fn decode(body: &str) -> Result<ChangeOp, SyncError> {
        let raw: RawEnvelope = serde_json::from_str(body)?;
        let operation = Operation::from_method(raw.method.as_deref());

        let doc_id = raw
            .doc
            .as_ref()
            .and_then(|doc| doc.get("id"))
            .and_then(json_id)
            .or_else(|| raw.id.as_ref().and_then(json_id))
            .ok_or(SyncError::MissingField("doc.id"))?;

        let doc = match operation {
            Operation::Upsert => raw.doc.ok_or(SyncError::MissingField("doc"))?,
            Operation::Delete => raw.doc.unwrap_or(Value::Null),
        };

        Ok(ChangeOp {
            doc_id,
            operation,
            doc,
        })
    }
}

/// Render a JSON value as a document id if it is a string or integer
fn json_id(value: &Value) -> Option<DocId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Producer-Side Envelope Builder
// ============================================================================

/// Change notification as published to the queue.
///
/// The producer and the worker share this one envelope definition; decoding
/// a built message always yields the operation it was built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMessage {
    pub method: String,
    pub doc: Value,
}

impl ChangeMessage {
    /// Build an upsert notification for a document (must carry an `id`)
    pub fn upsert(doc: Value) -> Self {
        Self {
            method: "POST".to_string(),
            doc,
        }
    }

    /// Build a delete notification for a document (must carry an `id`)
    pub fn delete(doc: Value) -> Self {
        Self {
            method: "DELETE".to_string(),
            doc,
        }
    }

    /// Serialize into a queue message body
    pub fn to_body(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(SyncError::from)
    }

    /// Fresh deduplication id for FIFO enqueue
    pub fn dedup_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

// ============================================================================
// Batch Outcomes
// ============================================================================

/// Result of syncing one record
#[derive(Debug, Serialize)]
pub struct RecordOutcome {
    /// Queue message id, when the delivery carried one
    pub message_id: Option<String>,
    /// Target document id, when the envelope decoded far enough to know it
    pub doc_id: Option<DocId>,
    /// Decoded operation, when known
    pub operation: Option<Operation>,
    /// Why the record failed; `None` means the mutation was applied
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<SyncError>,
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_error<S>(error: &Option<SyncError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Ordered per-record outcomes for one batch invocation
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn push(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when every outcome in the batch succeeded (vacuously true for an
    /// empty batch; the handler treats that case as a failure)
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

// ============================================================================
// Handler Response
// ============================================================================

/// Fixed-shape response returned to the queue runtime.
///
/// The status code is always 200; the body is a JSON-encoded status string.
/// Queue-level retry decisions are made from the per-record report, not from
/// this envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    /// Map a batch report onto the fixed response shape.
    ///
    /// An empty batch reports failure; the status only flips to success once
    /// every record has synced.
    pub fn from_report(report: &BatchReport) -> Self {
        let message = if report.is_empty() || !report.all_succeeded() {
            FAILURE_BODY
        } else {
            SUCCESS_BODY
        };
        Self {
            status_code: 200,
            body: Value::String(message.to_string()).to_string(),
        }
    }
}
