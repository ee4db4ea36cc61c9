use std::path::Path;

use orgpulse_core::{InteractionEvent, OrgPulseError};
use tracing::info;

/// Read a JSON array of events.
///
/// Field names may be camelCase or the platform's snake_case
/// (`message_id`, `channel_id`, `sender_id`, `replies_to`, `user_id`).
pub fn load_events(path: &Path) -> Result<Vec<InteractionEvent>, OrgPulseError> {
    let content = std::fs::read_to_string(path)?;
    let events: Vec<InteractionEvent> = serde_json::from_str(&content).map_err(|e| {
        OrgPulseError::InvalidPayload(format!("{}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), events = events.len(), "events loaded");
    Ok(events)
}

/// Write events as a pretty-printed JSON array, creating parent directories.
pub fn save_events(path: &Path, events: &[InteractionEvent]) -> Result<(), OrgPulseError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(events)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), events = events.len(), "events saved");
    Ok(())
}
