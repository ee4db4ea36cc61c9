use std::collections::HashMap;

use indexmap::IndexSet;
use orgpulse_core::{InteractionEvent, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Edge weight contributed by one mention.
pub const MENTION_WEIGHT: u64 = 3;
/// Edge weight contributed by one reply.
pub const REPLY_WEIGHT: u64 = 2;
/// Edge weight contributed by one reaction.
pub const REACTION_WEIGHT: u64 = 1;

/// Accumulated interaction between two users. Direction is that of the first
/// contribution; the pair is otherwise treated as unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: UserId,
    pub to: UserId,
    pub weight: u64,
}

/// Users and weighted links derived from a set of interaction events.
///
/// Nodes and edges keep first-seen order, so output is stable for a given input.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    nodes: IndexSet<UserId>,
    edge_index: HashMap<(UserId, UserId), usize>,
    edges: Vec<Edge>,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a full event snapshot.
    pub fn from_events(events: &[InteractionEvent]) -> Self {
        let mut builder = GraphBuilder::new(events);
        for event in events {
            builder.ingest(event);
        }
        builder.finish()
    }

    /// Register a user as a node. Empty ids are ignored.
    pub fn register_node(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        if !self.nodes.contains(id) {
            self.nodes.insert(id.to_string());
        }
        true
    }

    /// Add `weight` to the link between `from` and `to`.
    ///
    /// Returns false (and records nothing) for empty endpoints, self-loops
    /// and zero weights.
    pub fn add_interaction(&mut self, from: &str, to: &str, weight: u64) -> bool {
        if from.is_empty() || to.is_empty() || from == to || weight == 0 {
            return false;
        }
        self.register_node(from);
        self.register_node(to);

        let key = if from < to {
            (from.to_string(), to.to_string())
        } else {
            (to.to_string(), from.to_string())
        };

        match self.edge_index.get(&key) {
            Some(&idx) => self.edges[idx].weight += weight,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(Edge {
                    from: from.to_string(),
                    to: to.to_string(),
                    weight,
                });
            }
        }
        true
    }

    pub fn nodes(&self) -> &IndexSet<UserId> {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Accumulated weight between two users, in either direction.
    pub fn weight_between(&self, a: &str, b: &str) -> Option<u64> {
        let key = if a < b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        self.edge_index.get(&key).map(|&idx| self.edges[idx].weight)
    }

    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}

/// Folds interaction events into an [`InteractionGraph`].
///
/// Reply targets are resolved against every event in the snapshot, not just
/// the ones ingested so far, so a reply may precede its parent in the input.
pub struct GraphBuilder<'a> {
    senders_by_event: HashMap<&'a str, &'a str>,
    graph: InteractionGraph,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(events: &'a [InteractionEvent]) -> Self {
        let mut senders_by_event = HashMap::new();
        for event in events {
            if event.id.is_empty() {
                continue;
            }
            if let Some(sender) = event.sender_id() {
                senders_by_event.entry(event.id.as_str()).or_insert(sender);
            }
        }
        Self {
            senders_by_event,
            graph: InteractionGraph::new(),
        }
    }

    /// Resolve a reply reference to the sender of the referenced message.
    /// Unknown references are taken to be user ids already.
    pub fn resolve_reply_target<'r>(&self, reply_to: &'r str) -> &'r str
    where
        'a: 'r,
    {
        self.senders_by_event
            .get(reply_to)
            .copied()
            .unwrap_or(reply_to)
    }

    pub fn ingest(&mut self, event: &InteractionEvent) {
        let sender = event.sender_id();
        if let Some(sender) = sender {
            self.graph.register_node(sender);
        }

        for mentioned in &event.mentions {
            self.graph.register_node(mentioned);
            if let Some(sender) = sender {
                self.graph.add_interaction(sender, mentioned, MENTION_WEIGHT);
            }
        }

        if let Some(reply_to) = event.reply_to.as_deref().filter(|r| !r.is_empty()) {
            let target = self.resolve_reply_target(reply_to).to_string();
            self.graph.register_node(&target);
            if let Some(sender) = sender {
                self.graph.add_interaction(sender, &target, REPLY_WEIGHT);
            }
        }

        for reaction in &event.reactions {
            self.graph.register_node(&reaction.user);
            if let Some(sender) = sender {
                self.graph.add_interaction(&reaction.user, sender, REACTION_WEIGHT);
            }
        }
    }

    pub fn finish(self) -> InteractionGraph {
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "interaction graph built"
        );
        self.graph
    }
}
