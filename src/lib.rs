//! essync: Queue-to-Elasticsearch Sync Worker
//!
//! A thin adapter between a managed queue and a document search engine.
//! Each invocation consumes a batch of change notifications and applies
//! every record as an index mutation (upsert or delete) over HTTP, then
//! reports per-record outcomes alongside the fixed-shape aggregate status
//! the queue runtime expects.

pub mod config;
pub mod sync;
pub mod types;

pub use config::Config;
pub use types::*;
