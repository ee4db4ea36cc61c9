use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Chat platform user identifier.
pub type UserId = String;

/// Opaque message identifier assigned by the platform.
pub type EventId = String;

/// Timestamps below this value are Unix seconds; at or above it, milliseconds.
pub const SECONDS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize a raw platform timestamp to Unix milliseconds.
pub fn normalize_timestamp_millis(raw: i64) -> i64 {
    if raw < SECONDS_THRESHOLD {
        raw.saturating_mul(1000)
    } else {
        raw
    }
}

/// A single emoji reaction left on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    #[serde(alias = "user_id")]
    pub user: UserId,
    #[serde(default)]
    pub emoji: String,
}

/// One normalized interaction on the chat platform.
///
/// A message carries a sender and optional mentions, reply reference and
/// reactions. A reaction-only event has no sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    #[serde(alias = "message_id")]
    pub id: EventId,
    #[serde(default, alias = "channel_id")]
    pub channel: String,
    #[serde(default, alias = "sender_id")]
    pub sender: Option<UserId>,
    #[serde(default)]
    pub mentions: Vec<UserId>,
    #[serde(default, alias = "replies_to")]
    pub reply_to: Option<EventId>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

impl InteractionEvent {
    /// A plain message with no mentions, reply or reactions.
    pub fn message(id: impl Into<String>, channel: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel: channel.into(),
            sender: Some(sender.into()),
            mentions: Vec::new(),
            reply_to: None,
            reactions: Vec::new(),
            timestamp: None,
        }
    }

    /// A sender-less event carrying one reaction to message `id`.
    pub fn reaction(
        id: impl Into<String>,
        channel: impl Into<String>,
        user: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            channel: channel.into(),
            sender: None,
            mentions: Vec::new(),
            reply_to: None,
            reactions: vec![Reaction {
                user: user.into(),
                emoji: emoji.into(),
            }],
            timestamp: None,
        }
    }

    pub fn with_mentions<I, S>(mut self, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mentions.extend(mentions.into_iter().map(Into::into));
        self
    }

    pub fn replying_to(mut self, target: impl Into<String>) -> Self {
        self.reply_to = Some(target.into());
        self
    }

    pub fn with_reaction(mut self, user: impl Into<String>, emoji: impl Into<String>) -> Self {
        self.reactions.push(Reaction {
            user: user.into(),
            emoji: emoji.into(),
        });
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sender id, treating an empty string as absent.
    pub fn sender_id(&self) -> Option<&str> {
        self.sender.as_deref().filter(|s| !s.is_empty())
    }

    /// Event time, with the seconds/milliseconds ambiguity resolved.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .map(normalize_timestamp_millis)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Accepts a timestamp as an integer, a float or a numeric string.
/// Anything unparseable becomes `None` rather than failing the whole event.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Some(v),
        Some(Raw::Float(v)) if v.is_finite() => Some(v as i64),
        Some(Raw::Text(s)) => parse_timestamp(&s),
        _ => None,
    })
}

/// Parse a timestamp string the way the platform sends it (decimal digits).
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
