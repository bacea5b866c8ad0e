//! Sync Module
//!
//! Everything between the queue and the search engine: the typed error
//! taxonomy, the index client, the batch processor and the event handler.

pub mod client;
pub mod error;
pub mod handler;
pub mod processor;

pub use client::IndexClient;
pub use error::{SyncError, SyncResult};
pub use handler::SyncHandler;
pub use processor::BatchProcessor;
