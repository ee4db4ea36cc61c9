use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use orgpulse_core::{normalize_timestamp_millis, AdminConfig, InteractionEvent, UserId};
use serde::Serialize;
use tracing::{debug, info};

/// Result of applying a retention window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionOutcome {
    pub kept: Vec<InteractionEvent>,
    pub removed: usize,
}

/// Keep events no older than `retention_days` before `now`.
///
/// Events without a timestamp are always kept. `None` keeps everything, as
/// does a window reaching past the earliest representable time.
///
/// A timestamp of `0` is a real time (the Unix epoch), so any window drops
/// it; only a missing timestamp counts as unknown.
pub fn apply_retention(
    events: &[InteractionEvent],
    retention_days: Option<u32>,
    now: DateTime<Utc>,
) -> RetentionOutcome {
    let Some(days) = retention_days else {
        return RetentionOutcome {
            kept: events.to_vec(),
            removed: 0,
        };
    };

    let Some(cutoff) = Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .map(|start| start.timestamp_millis())
    else {
        debug!(retention_days = days, "retention window exceeds time range; keeping all events");
        return RetentionOutcome {
            kept: events.to_vec(),
            removed: 0,
        };
    };
    let (kept, dropped): (Vec<&InteractionEvent>, Vec<&InteractionEvent>) =
        events.iter().partition(|event| match event.timestamp {
            Some(raw) => normalize_timestamp_millis(raw) >= cutoff,
            None => true,
        });

    info!(
        retention_days = days,
        total = events.len(),
        removed = dropped.len(),
        remaining = kept.len(),
        cutoff = %DateTime::<Utc>::from_timestamp_millis(cutoff).unwrap_or(now),
        "retention applied"
    );

    RetentionOutcome {
        kept: kept.into_iter().cloned().collect(),
        removed: dropped.len(),
    }
}

/// Drop events posted in an ignored channel. Events with no channel stay.
pub fn filter_ignored_channels(
    events: Vec<InteractionEvent>,
    ignored_channels: &[String],
) -> Vec<InteractionEvent> {
    if ignored_channels.is_empty() {
        return events;
    }

    let ignored: HashSet<&str> = ignored_channels.iter().map(String::as_str).collect();
    let total = events.len();
    let filtered: Vec<InteractionEvent> = events
        .into_iter()
        .filter(|event| event.channel.is_empty() || !ignored.contains(event.channel.as_str()))
        .collect();

    if filtered.len() < total {
        debug!(
            ignored_channels = ignored.len(),
            removed = total - filtered.len(),
            remaining = filtered.len(),
            "filtered ignored channels"
        );
    }
    filtered
}

/// Apply retention, then channel ignores. The input is left untouched.
pub fn filter_events(
    events: &[InteractionEvent],
    config: &AdminConfig,
    now: DateTime<Utc>,
) -> Vec<InteractionEvent> {
    let retained = apply_retention(events, config.retention_days, now).kept;
    filter_ignored_channels(retained, &config.ignored_channels)
}

/// Distinct senders, mentioned users and reactors, in first-seen order.
pub fn extract_user_ids(events: &[InteractionEvent]) -> Vec<UserId> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids = Vec::new();

    let participants = events.iter().flat_map(|event| {
        event
            .sender_id()
            .into_iter()
            .chain(event.mentions.iter().map(String::as_str))
            .chain(event.reactions.iter().map(|r| r.user.as_str()))
    });
    for id in participants {
        if !id.is_empty() && seen.insert(id) {
            ids.push(id.to_string());
        }
    }
    ids
}
