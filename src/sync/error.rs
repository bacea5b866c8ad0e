//! Error taxonomy for the sync worker
//!
//! Every record failure is surfaced as one of these variants so the caller
//! can decide retry/visibility semantics per record.

use thiserror::Error;

/// Errors that can occur while syncing a record to the search engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// The record body was not valid JSON
    #[error("invalid message body: {0}")]
    Parse(String),

    /// The envelope lacked a field the operation needs
    #[error("message is missing required field '{0}'")]
    MissingField(&'static str),

    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// The engine answered with a status outside 200/201
    #[error("index engine returned status {status}")]
    IndexEngine {
        /// HTTP status returned by the engine
        status: u16,
        /// Response body, for the log line
        body: String,
    },

    /// Client construction or configuration failure
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Parse(err.to_string())
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
