use orgpulse_graph::Adjacency;
use serde::Serialize;

/// Degree information for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreeInfo {
    /// Distinct neighbors.
    pub degree: usize,
    /// Sum of incident edge weights.
    pub weighted_degree: u64,
}

/// Compute degree and weighted degree for every node, indexed like `adj`.
pub fn degree_centrality(adj: &Adjacency) -> Vec<DegreeInfo> {
    (0..adj.node_count())
        .map(|idx| DegreeInfo {
            degree: adj.degree(idx),
            weighted_degree: adj.weighted_degree(idx),
        })
        .collect()
}
