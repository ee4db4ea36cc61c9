use std::collections::BTreeMap;

use orgpulse_core::UserId;
use serde::{Deserialize, Serialize};

use crate::algorithms::degree::DegreeInfo;
use crate::health::HealthScore;

/// How many connectors `Stats` keeps.
pub const TOP_CONNECTOR_LIMIT: usize = 5;

/// Per-user structural metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub id: UserId,
    pub degree: usize,
    pub weighted_degree: u64,
    pub betweenness: f64,
    pub cluster_id: usize,
}

/// A highly connected user, ranked by weighted degree then degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopConnector {
    pub id: UserId,
    pub degree: usize,
    pub weighted_degree: u64,
}

impl From<&NodeMetrics> for TopConnector {
    fn from(node: &NodeMetrics) -> Self {
        Self {
            id: node.id.clone(),
            degree: node.degree,
            weighted_degree: node.weighted_degree,
        }
    }
}

/// Users sharing a community label. `nodes` is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub cluster_id: usize,
    pub size: usize,
    pub nodes: Vec<UserId>,
}

/// Aggregate view of one analysis run. This is what scoring, insights and
/// every downstream consumer see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(default)]
    pub top_connectors: Vec<TopConnector>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub org_health: HealthScore,
}

impl Stats {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }
}

/// Assemble per-user metrics from the index-aligned algorithm outputs.
pub fn assemble_nodes(
    ids: &[UserId],
    degrees: &[DegreeInfo],
    betweenness: &[f64],
    communities: &[usize],
) -> Vec<NodeMetrics> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| {
            let degree = degrees.get(idx).copied().unwrap_or(DegreeInfo {
                degree: 0,
                weighted_degree: 0,
            });
            NodeMetrics {
                id: id.clone(),
                degree: degree.degree,
                weighted_degree: degree.weighted_degree,
                betweenness: betweenness.get(idx).copied().unwrap_or(0.0),
                cluster_id: communities.get(idx).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Group users by cluster id, ordered by id, with sorted member lists.
pub fn summarize_clusters(nodes: &[NodeMetrics]) -> Vec<Cluster> {
    let mut grouped: BTreeMap<usize, Vec<UserId>> = BTreeMap::new();
    for node in nodes {
        grouped.entry(node.cluster_id).or_default().push(node.id.clone());
    }

    grouped
        .into_iter()
        .map(|(cluster_id, mut members)| {
            members.sort();
            Cluster {
                cluster_id,
                size: members.len(),
                nodes: members,
            }
        })
        .collect()
}

/// Highest weighted degree first, ties broken by degree. Equal nodes keep
/// their input order.
pub fn rank_top_connectors(nodes: &[NodeMetrics], limit: usize) -> Vec<TopConnector> {
    let mut ranked: Vec<&NodeMetrics> = nodes.iter().collect();
    ranked.sort_by(|a, b| {
        b.weighted_degree
            .cmp(&a.weighted_degree)
            .then_with(|| b.degree.cmp(&a.degree))
    });
    ranked.into_iter().take(limit).map(TopConnector::from).collect()
}
