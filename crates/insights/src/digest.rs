use orgpulse_compute::Stats;
use serde::{Deserialize, Serialize};

use crate::rules::{join_ids, plural, RuleBasedInsight};

pub const DIGEST_TITLE: &str = "Weekly Org Health Digest";
/// Recommendations carried over from the insight.
const DIGEST_RECOMMENDATIONS: usize = 5;
const CONNECTOR_MENTIONS: usize = 3;

const DEFAULT_RECOMMENDATIONS: [&str; 2] = [
    "Encourage cross-team touchpoints via recurring syncs.",
    "Distribute responsibilities away from single overloaded connectors when possible.",
];

/// Weekly summary of the collaboration graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDigest {
    pub title: String,
    pub summary_line: String,
    pub key_highlights: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn build_weekly_digest(stats: &Stats, insight: &RuleBasedInsight) -> WeeklyDigest {
    let nodes = stats.node_count;
    let edges = stats.edge_count;
    let summary_line = format!(
        "Collaboration snapshot shows {} {} and {} interaction {}.",
        nodes,
        plural(nodes, "user", "users"),
        edges,
        plural(edges, "link", "links"),
    );

    let mut key_highlights = Vec::new();

    // verb agreement follows the full connector count, not the names shown
    let connectors: Vec<&str> = stats.top_connectors.iter().map(|c| c.id.as_str()).collect();
    if !connectors.is_empty() {
        let shown = &connectors[..connectors.len().min(CONNECTOR_MENTIONS)];
        key_highlights.push(format!(
            "{} {} as key connector{}.",
            join_ids(shown),
            plural(connectors.len(), "acts", "act"),
            plural(connectors.len(), "", "s"),
        ));
    }

    let silos = &insight.meta.possible_silos;
    if silos.is_empty() {
        let clusters = stats.cluster_count();
        key_highlights.push(if clusters <= 1 {
            "Single main cluster observed.".to_string()
        } else {
            format!("Multiple clusters observed ({clusters}).")
        });
    } else {
        key_highlights.push(format!(
            "Cluster{} {} {} relatively isolated.",
            plural(silos.len(), "", "s"),
            join_ids(silos),
            plural(silos.len(), "appears", "appear"),
        ));
    }

    let recommendations = if insight.recommendations.is_empty() {
        DEFAULT_RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
    } else {
        insight
            .recommendations
            .iter()
            .take(DIGEST_RECOMMENDATIONS)
            .cloned()
            .collect()
    };

    WeeklyDigest {
        title: DIGEST_TITLE.to_string(),
        summary_line,
        key_highlights,
        recommendations,
    }
}

/// One-paragraph graph snapshot for chat commands.
pub fn snapshot_text(stats: &Stats, insight: &RuleBasedInsight) -> String {
    let nodes = stats.node_count;
    let edges = stats.edge_count;
    let mut parts = vec![format!(
        "There {} {} active {} and {} interaction {}.",
        plural(nodes, "is", "are"),
        nodes,
        plural(nodes, "user", "users"),
        edges,
        plural(edges, "link", "links"),
    )];

    let top: Vec<&str> = stats
        .top_connectors
        .iter()
        .take(CONNECTOR_MENTIONS)
        .map(|c| c.id.as_str())
        .collect();
    if !top.is_empty() {
        parts.push(format!("Top connectors: {}.", top.join(", ")));
    }

    let clusters = stats.cluster_count();
    if clusters > 0 {
        parts.push(format!(
            "Detected {} {}.",
            clusters,
            plural(clusters, "cluster", "clusters")
        ));
    }

    let silos = &insight.meta.possible_silos;
    if !silos.is_empty() {
        parts.push(format!(
            "Possible silo in cluster{} {}.",
            plural(silos.len(), "", "s"),
            join_ids(silos),
        ));
    }

    parts.join(" ")
}

/// Summary points as a dashed list, for chat replies.
pub fn insights_text(insight: &RuleBasedInsight) -> String {
    if insight.summary_points.is_empty() {
        return "No insights available yet.".to_string();
    }
    insight
        .summary_points
        .iter()
        .map(|point| format!("- {point}"))
        .collect::<Vec<_>>()
        .join("\n")
}
