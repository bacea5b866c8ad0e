use anyhow::Result;
use std::path::Path;
use tracing::debug;

use essync::sync::SyncHandler;
use essync::types::QueueEvent;
use essync::Config;

/// Run the handler over a queue event file and print the response.
pub fn process_event(config: &Config, event_path: &Path, print_report: bool) -> Result<()> {
    let content = std::fs::read_to_string(event_path).map_err(|e| {
        anyhow::anyhow!("Failed to read event file '{}': {}", event_path.display(), e)
    })?;
    let event: QueueEvent = serde_json::from_str(&content).map_err(|e| {
        anyhow::anyhow!("Failed to parse event file '{}': {}", event_path.display(), e)
    })?;
    debug!(
        "loaded {} records from {}",
        event.records.len(),
        event_path.display()
    );

    let handler = SyncHandler::new(config)?;
    let (response, report) = handler.handle_with_report(&event);

    if print_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
