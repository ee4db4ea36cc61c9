use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use orgpulse_core::InteractionEvent;
use tracing::debug;

/// Where normalized events live between intake and analysis.
///
/// Passed explicitly to whatever needs the events; there is no global store.
pub trait EventRepository: Send + Sync {
    /// Store one event.
    fn record(&self, event: InteractionEvent);

    /// Copy of every stored event, in arrival order.
    fn snapshot(&self) -> Vec<InteractionEvent>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every event, returning how many were dropped.
    fn clear(&self) -> usize;
}

#[derive(Debug, Default)]
struct StoreInner {
    events: Vec<InteractionEvent>,
    /// Position of the first event with a sender, by event id.
    message_index: HashMap<String, usize>,
}

/// Process-local [`EventRepository`] behind a read-write lock.
///
/// A sender-less reaction event whose id matches a stored message is folded
/// into that message's reactions instead of being stored on its own.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `events`, recorded in order.
    pub fn with_events(events: impl IntoIterator<Item = InteractionEvent>) -> Self {
        let store = Self::new();
        store.extend(events);
        store
    }

    pub fn extend(&self, events: impl IntoIterator<Item = InteractionEvent>) {
        for event in events {
            self.record(event);
        }
    }
}

impl EventRepository for InMemoryEventStore {
    fn record(&self, event: InteractionEvent) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if event.sender_id().is_none() && !event.reactions.is_empty() {
            if let Some(&idx) = inner.message_index.get(&event.id) {
                debug!(id = %event.id, reactions = event.reactions.len(), "merged reaction into message");
                inner.events[idx].reactions.extend(event.reactions);
                return;
            }
        }

        let idx = inner.events.len();
        if event.sender_id().is_some() && !event.id.is_empty() {
            inner.message_index.entry(event.id.clone()).or_insert(idx);
        }
        inner.events.push(event);
    }

    fn snapshot(&self) -> Vec<InteractionEvent> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .clone()
    }

    fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .len()
    }

    fn clear(&self) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let count = inner.events.len();
        inner.events.clear();
        inner.message_index.clear();
        debug!(count, "event store cleared");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn records_in_arrival_order() {
        let store = InMemoryEventStore::new();
        assert!(store.is_empty());
        store.record(InteractionEvent::message("m1", "c", "alice"));
        store.record(InteractionEvent::message("m2", "c", "bob"));
        let ids: Vec<String> = store.snapshot().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn reaction_merges_into_known_message() {
        let store = InMemoryEventStore::with_events([
            InteractionEvent::message("m1", "c", "alice"),
            InteractionEvent::reaction("m1", "c", "bob", "tada"),
            InteractionEvent::reaction("m1", "c", "carol", "eyes"),
        ]);
        let events = store.snapshot();
        assert_eq!(events.len(), 1);
        let reactors: Vec<&str> = events[0].reactions.iter().map(|r| r.user.as_str()).collect();
        assert_eq!(reactors, vec!["bob", "carol"]);
    }

    #[test]
    fn orphan_reaction_stored_separately() {
        let store = InMemoryEventStore::new();
        store.record(InteractionEvent::reaction("unknown", "c", "bob", "tada"));
        store.record(InteractionEvent::message("unknown", "c", "alice"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn clear_reports_count_and_resets_index() {
        let store = InMemoryEventStore::with_events([InteractionEvent::message("m1", "c", "alice")]);
        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());

        store.record(InteractionEvent::reaction("m1", "c", "bob", "tada"));
        assert_eq!(store.len(), 1);
        assert!(store.snapshot()[0].sender.is_none());
    }

    #[test]
    fn concurrent_writers() {
        let store: Arc<dyn EventRepository> = Arc::new(InMemoryEventStore::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..25 {
                        store.record(InteractionEvent::message(format!("t{t}-{i}"), "c", "u"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 100);
    }
}
