//! Chat-platform webhook payloads to [`InteractionEvent`]s.
//!
//! Two event types are understood:
//!
//! ```text
//! {"event_type": "message_created",
//!  "data": {"message": {"id", "space_id", "sender": {"id"}, "posted_time",
//!                       "mentions": [{"id"}], "replied_to": {"id"}}}}
//!
//! {"event_type": "reaction_added",
//!  "data": {"message_id", "emoji", "user": {"id"}, "space_id", "time"}}
//! ```

use orgpulse_core::{parse_timestamp, InteractionEvent, Reaction};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub const MESSAGE_CREATED: &str = "message_created";
pub const REACTION_ADDED: &str = "reaction_added";

/// Why a webhook payload produced no event.
#[derive(Debug, Error, PartialEq)]
pub enum WebhookRejection {
    /// Well-formed, but not an event type we track.
    #[error("unsupported event type: {0}")]
    Unsupported(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Normalize a webhook payload, or `None` when it is unsupported or incomplete.
pub fn normalize_webhook(payload: Value) -> Option<InteractionEvent> {
    match parse_webhook(&payload) {
        Ok(event) => Some(event),
        Err(rejection) => {
            debug!(%rejection, "webhook payload skipped");
            None
        }
    }
}

/// Normalize a webhook payload, reporting why it was rejected.
pub fn parse_webhook(payload: &Value) -> Result<InteractionEvent, WebhookRejection> {
    let event_type = payload
        .get("event_type")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or(WebhookRejection::MissingField("event_type"))?;
    let data = payload
        .get("data")
        .filter(|d| d.is_object())
        .ok_or(WebhookRejection::MissingField("data"))?;

    match event_type {
        MESSAGE_CREATED => message_created(data),
        REACTION_ADDED => reaction_added(data),
        other => Err(WebhookRejection::Unsupported(other.to_string())),
    }
}

fn message_created(data: &Value) -> Result<InteractionEvent, WebhookRejection> {
    let message = data
        .get("message")
        .filter(|m| m.is_object())
        .ok_or(WebhookRejection::MissingField("data.message"))?;

    let id = required_id(message.get("id"), "data.message.id")?;
    let channel = required_id(message.get("space_id"), "data.message.space_id")?;
    let sender = required_id(
        message.get("sender").and_then(|s| s.get("id")),
        "data.message.sender.id",
    )?;
    let timestamp = required_time(message.get("posted_time"), "data.message.posted_time")?;

    let mentions: Vec<String> = message
        .get("mentions")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|m| m.get("id").and_then(Value::as_str))
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let reply_to = message
        .get("replied_to")
        .and_then(|r| r.get("id"))
        .and_then(id_string);

    Ok(InteractionEvent {
        id,
        channel,
        sender: Some(sender),
        mentions,
        reply_to,
        reactions: Vec::new(),
        timestamp,
    })
}

fn reaction_added(data: &Value) -> Result<InteractionEvent, WebhookRejection> {
    let id = required_id(data.get("message_id"), "data.message_id")?;
    let emoji = required_id(data.get("emoji"), "data.emoji")?;
    let user = required_id(data.get("user").and_then(|u| u.get("id")), "data.user.id")?;
    let channel = required_id(data.get("space_id"), "data.space_id")?;
    let timestamp = required_time(data.get("time"), "data.time")?;

    Ok(InteractionEvent {
        id,
        channel,
        sender: None,
        mentions: Vec::new(),
        reply_to: None,
        reactions: vec![Reaction { user, emoji }],
        timestamp,
    })
}

/// Non-empty string, or a number rendered as a string.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_id(value: Option<&Value>, field: &'static str) -> Result<String, WebhookRejection> {
    value
        .and_then(id_string)
        .ok_or(WebhookRejection::MissingField(field))
}

/// The field must be present and non-empty; an unparseable value is kept as
/// an unknown time rather than rejecting the event.
fn required_time(value: Option<&Value>, field: &'static str) -> Result<Option<i64>, WebhookRejection> {
    match value {
        Some(Value::Number(n)) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
        Some(Value::String(s)) if !s.is_empty() => Ok(parse_timestamp(s)),
        _ => Err(WebhookRejection::MissingField(field)),
    }
}
