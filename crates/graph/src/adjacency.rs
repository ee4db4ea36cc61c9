use std::collections::HashMap;

use indexmap::IndexMap;
use orgpulse_core::UserId;

use crate::store::{Edge, InteractionGraph};

/// Symmetric, integer-indexed view of an interaction graph.
///
/// Every edge `(a, b, w)` contributes `w` to both `a -> b` and `b -> a`.
/// Neighbor lists keep insertion order so iteration is stable.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    index_to_node: Vec<UserId>,
    node_to_index: HashMap<UserId, usize>,
    neighbors: Vec<IndexMap<usize, u64>>,
}

impl Adjacency {
    pub fn from_graph(graph: &InteractionGraph) -> Self {
        Self::from_parts(graph.nodes().iter().map(String::as_str), graph.edges())
    }

    /// Build from a node list and an edge list. Edge endpoints missing from
    /// `nodes` are appended; zero-weight edges and self-loops are skipped.
    pub fn from_parts<'n>(nodes: impl IntoIterator<Item = &'n str>, edges: &[Edge]) -> Self {
        let mut adjacency = Self::default();
        for node in nodes {
            adjacency.ensure_node(node);
        }

        for edge in edges {
            if edge.weight == 0
                || edge.from.is_empty()
                || edge.to.is_empty()
                || edge.from == edge.to
            {
                continue;
            }
            let a = adjacency.ensure_node(&edge.from);
            let b = adjacency.ensure_node(&edge.to);
            *adjacency.neighbors[a].entry(b).or_insert(0) += edge.weight;
            *adjacency.neighbors[b].entry(a).or_insert(0) += edge.weight;
        }

        adjacency
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.node_to_index.get(id) {
            return idx;
        }
        let idx = self.index_to_node.len();
        self.index_to_node.push(id.to_string());
        self.node_to_index.insert(id.to_string(), idx);
        self.neighbors.push(IndexMap::new());
        idx
    }

    pub fn node_count(&self) -> usize {
        self.index_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_node.is_empty()
    }

    /// Node ids in index order.
    pub fn nodes(&self) -> &[UserId] {
        &self.index_to_node
    }

    pub fn node_id(&self, idx: usize) -> &str {
        &self.index_to_node[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_to_index.get(id).copied()
    }

    /// `(neighbor index, accumulated weight)` pairs of a node.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.neighbors[idx].iter().map(|(&n, &w)| (n, w))
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.neighbors[idx].len()
    }

    pub fn weighted_degree(&self, idx: usize) -> u64 {
        self.neighbors[idx].values().sum()
    }

    /// Weight of the `a -> b` entry, if the two users are linked.
    pub fn weight(&self, a: &str, b: &str) -> Option<u64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.neighbors[a].get(&b).copied()
    }
}
