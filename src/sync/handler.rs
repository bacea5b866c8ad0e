//! Event handler
//!
//! The outer contract of the worker: consume one queue event, sync every
//! record, and answer with the fixed-shape status envelope. No error ever
//! escapes to the queue runtime; failures live in the per-record report and
//! the log.

use tracing::{error, info};

use crate::config::Config;
use crate::types::{BatchReport, HandlerResponse, QueueEvent};

use super::error::SyncError;
use super::processor::BatchProcessor;

/// Handles queue events against the configured search engine
#[derive(Debug)]
pub struct SyncHandler {
    processor: BatchProcessor,
}

impl SyncHandler {
    /// Build a handler from configuration. Construction fails before any
    /// network call when the configuration cannot produce a client.
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        Ok(Self {
            processor: BatchProcessor::new(config)?,
        })
    }

    /// Wrap an existing processor
    pub fn from_processor(processor: BatchProcessor) -> Self {
        Self { processor }
    }

    /// Process the event and return the fixed-shape response
    pub fn handle(&self, event: &QueueEvent) -> HandlerResponse {
        self.handle_with_report(event).0
    }

    /// Process the event, returning the response together with the
    /// per-record report
    pub fn handle_with_report(&self, event: &QueueEvent) -> (HandlerResponse, BatchReport) {
        info!("processing batch of {} records", event.records.len());

        let report = self.processor.process(event);
        let failures = report.failure_count();
        if failures > 0 {
            error!("{} of {} records failed to sync", failures, report.len());
        } else if !report.is_empty() {
            info!("synced {} records", report.len());
        }

        (HandlerResponse::from_report(&report), report)
    }
}
