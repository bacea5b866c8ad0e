use anyhow::Result;
use serde_json::Value;

use essync::types::{ChangeMessage, ChangeOp, MESSAGE_GROUP_ID};

/// Build a change notification envelope and print its queue message body,
/// with FIFO metadata on stderr so the body can be piped to an enqueue tool.
pub fn emit_message(doc: &str, delete: bool) -> Result<()> {
    let doc: Value = serde_json::from_str(doc)
        .map_err(|e| anyhow::anyhow!("Failed to parse document JSON: {}", e))?;

    let message = if delete {
        ChangeMessage::delete(doc)
    } else {
        ChangeMessage::upsert(doc)
    };
    let body = message.to_body()?;

    // Refuse to emit an envelope the worker could not decode
    ChangeOp::decode(&body)?;

    println!("{}", body);
    eprintln!("message-group-id: {}", MESSAGE_GROUP_ID);
    eprintln!("dedup-id: {}", ChangeMessage::dedup_id());
    Ok(())
}
