use orgpulse_compute::{Assessment, Stats, TopConnector};
use orgpulse_core::UserId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Connectors named in the summary.
const CONNECTOR_MENTIONS: usize = 3;
/// Minimum weighted degree before a connector can count as overloaded.
const OVERLOAD_FLOOR: u64 = 6;
/// Minimum size of a "large" cluster.
const LARGE_CLUSTER_FLOOR: f64 = 3.0;
/// Clusters at or below this size can be silos regardless of the average.
const SILO_CEILING: f64 = 2.0;

const INSUFFICIENT_DATA: &str = "Insufficient data to compute insights at this time.";

/// Users and clusters flagged by the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMeta {
    pub possible_silos: Vec<usize>,
    pub overloaded_users: Vec<UserId>,
    pub connector_users: Vec<UserId>,
    pub large_clusters: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBasedInsight {
    pub summary_points: Vec<String>,
    pub recommendations: Vec<String>,
    pub meta: InsightMeta,
}

impl RuleBasedInsight {
    /// Minimal payload returned when `Stats` cannot be interpreted.
    pub fn insufficient_data() -> Self {
        Self {
            summary_points: vec![INSUFFICIENT_DATA.to_string()],
            recommendations: Vec::new(),
            meta: InsightMeta::default(),
        }
    }
}

pub(crate) fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

pub(crate) fn join_ids<T: ToString>(ids: &[T]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Derive insights from `stats`, keeping a fault apart from a computed result.
pub fn assess_insights(stats: &Stats) -> Assessment<RuleBasedInsight> {
    if let Err(fault) = stats.validate() {
        warn!(%fault, "insight generation degraded to minimal payload");
        return Assessment::degraded(RuleBasedInsight::insufficient_data(), fault);
    }

    let meta = InsightMeta {
        possible_silos: possible_silos(stats),
        overloaded_users: overloaded_users(&stats.top_connectors),
        connector_users: stats
            .top_connectors
            .iter()
            .take(CONNECTOR_MENTIONS)
            .map(|c| c.id.clone())
            .collect(),
        large_clusters: large_clusters(stats),
    };

    let insight = RuleBasedInsight {
        summary_points: summary_points(stats, &meta),
        recommendations: recommendations(stats, &meta),
        meta,
    };
    debug!(
        summary = insight.summary_points.len(),
        recommendations = insight.recommendations.len(),
        "rule-based insights generated"
    );
    Assessment::computed(insight)
}

/// Derive insights from `stats`; malformed input yields the minimal payload.
pub fn generate_insights(stats: &Stats) -> RuleBasedInsight {
    assess_insights(stats).into_value()
}

/// The heaviest connector, when it carries at least twice the median of
/// the rest (and never less than the floor).
fn overloaded_users(connectors: &[TopConnector]) -> Vec<UserId> {
    let mut ranked: Vec<&TopConnector> = connectors.iter().collect();
    ranked.sort_by(|a, b| b.weighted_degree.cmp(&a.weighted_degree));

    let Some((top, others)) = ranked.split_first() else {
        return Vec::new();
    };

    let mut rest: Vec<u64> = others.iter().map(|c| c.weighted_degree).collect();
    rest.sort_unstable();
    // upper median for even counts
    let median_others = rest.get(rest.len() / 2).copied().unwrap_or(0);

    if top.weighted_degree >= OVERLOAD_FLOOR.max(median_others.saturating_mul(2)) {
        vec![top.id.clone()]
    } else {
        Vec::new()
    }
}

fn average_cluster_size(stats: &Stats) -> f64 {
    if stats.clusters.is_empty() {
        return 0.0;
    }
    let total: usize = stats.clusters.iter().map(|c| c.size).sum();
    total as f64 / stats.clusters.len() as f64
}

fn large_clusters(stats: &Stats) -> Vec<usize> {
    let threshold = LARGE_CLUSTER_FLOOR.max((1.5 * average_cluster_size(stats)).ceil());
    stats
        .clusters
        .iter()
        .filter(|c| c.size as f64 >= threshold)
        .map(|c| c.cluster_id)
        .collect()
}

fn possible_silos(stats: &Stats) -> Vec<usize> {
    if stats.clusters.len() <= 1 {
        return Vec::new();
    }
    let threshold = SILO_CEILING.max((0.5 * average_cluster_size(stats)).floor());
    stats
        .clusters
        .iter()
        .filter(|c| c.size as f64 <= threshold)
        .map(|c| c.cluster_id)
        .collect()
}

fn summary_points(stats: &Stats, meta: &InsightMeta) -> Vec<String> {
    let nodes = stats.node_count;
    let edges = stats.edge_count;
    let mut points = vec![format!(
        "There {} {} active {} with {} interaction {}.",
        plural(nodes, "is", "are"),
        nodes,
        plural(nodes, "user", "users"),
        edges,
        plural(edges, "link", "links"),
    )];

    let connectors = &meta.connector_users;
    if !connectors.is_empty() {
        points.push(format!(
            "{} {} key connector{} in the network.",
            join_ids(connectors),
            plural(connectors.len(), "is", "are"),
            plural(connectors.len(), "", "s"),
        ));
    }

    let silos = &meta.possible_silos;
    if !silos.is_empty() {
        points.push(format!(
            "Cluster{} {} look{} relatively isolated compared to the rest.",
            plural(silos.len(), "", "s"),
            join_ids(silos),
            plural(silos.len(), "s", ""),
        ));
    }

    points
}

fn recommendations(stats: &Stats, meta: &InsightMeta) -> Vec<String> {
    let mut recs = Vec::new();

    let silos = &meta.possible_silos;
    if !silos.is_empty() {
        recs.push(format!(
            "Encourage cross-team touchpoints between cluster{} {} and the main group (e.g., a recurring sync or shared channels).",
            plural(silos.len(), "", "s"),
            join_ids(silos),
        ));
    }

    if !meta.overloaded_users.is_empty() {
        recs.push(format!(
            "Distribute responsibilities from a single overloaded connector ({}) where possible to avoid bottlenecks.",
            join_ids(&meta.overloaded_users),
        ));
    }

    if stats.node_count > 0 && stats.clusters.len() > 1 && recs.is_empty() {
        recs.push(
            "Promote cross-cluster collaboration via joint updates or informal coffee chats."
                .to_string(),
        );
    }

    if stats.node_count < 3 {
        recs.push(
            "Invite more team members to use the channel to grow the collaboration graph."
                .to_string(),
        );
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgpulse_compute::{Cluster, StatsFault};

    fn connector(id: &str, weighted_degree: u64) -> TopConnector {
        TopConnector {
            id: id.into(),
            degree: 1,
            weighted_degree,
        }
    }

    fn cluster(cluster_id: usize, size: usize) -> Cluster {
        Cluster {
            cluster_id,
            size,
            nodes: (0..size).map(|i| format!("c{cluster_id}-{i}")).collect(),
        }
    }

    #[test]
    fn empty_stats() {
        let insight = assess_insights(&Stats::default());
        assert!(!insight.is_degraded());
        let insight = insight.into_value();
        assert_eq!(
            insight.summary_points,
            vec!["There are 0 active users with 0 interaction links."]
        );
        assert_eq!(
            insight.recommendations,
            vec!["Invite more team members to use the channel to grow the collaboration graph."]
        );
        assert_eq!(insight.meta, InsightMeta::default());
    }

    #[test]
    fn singular_wording() {
        let stats = Stats {
            node_count: 1,
            edge_count: 1,
            top_connectors: vec![connector("ana", 3)],
            clusters: vec![cluster(0, 1)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert_eq!(
            insight.summary_points[0],
            "There is 1 active user with 1 interaction link."
        );
        assert_eq!(insight.summary_points[1], "ana is key connector in the network.");
    }

    #[test]
    fn connectors_named_up_to_three() {
        let stats = Stats {
            node_count: 8,
            edge_count: 9,
            top_connectors: vec![
                connector("a", 9),
                connector("b", 8),
                connector("c", 7),
                connector("d", 6),
            ],
            clusters: vec![cluster(0, 8)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert_eq!(insight.meta.connector_users, vec!["a", "b", "c"]);
        assert_eq!(insight.summary_points[1], "a, b, c are key connectors in the network.");
        // 9 < max(6, 2 * 7)
        assert!(insight.meta.overloaded_users.is_empty());
        // a lone cluster never reaches 1.5x the average
        assert!(insight.meta.large_clusters.is_empty());
        assert!(insight.meta.possible_silos.is_empty());
    }

    #[test]
    fn overload_uses_upper_median() {
        // others sorted [2, 4]: upper median 4, threshold 8
        let connectors = vec![connector("hub", 8), connector("x", 2), connector("y", 4)];
        assert_eq!(overloaded_users(&connectors), vec!["hub".to_string()]);

        let connectors = vec![connector("hub", 7), connector("x", 2), connector("y", 4)];
        assert!(overloaded_users(&connectors).is_empty());

        // lone connector still needs the floor
        assert_eq!(overloaded_users(&[connector("solo", 6)]), vec!["solo".to_string()]);
        assert!(overloaded_users(&[connector("solo", 5)]).is_empty());
    }

    #[test]
    fn overload_sorts_before_picking_top() {
        let connectors = vec![connector("x", 1), connector("hub", 12), connector("y", 1)];
        assert_eq!(overloaded_users(&connectors), vec!["hub".to_string()]);
    }

    #[test]
    fn silos_and_large_clusters() {
        // sizes 6, 2, 1: avg 3, large >= max(3, 5) = 5, silo <= max(2, 1) = 2
        let stats = Stats {
            node_count: 9,
            edge_count: 8,
            clusters: vec![cluster(0, 6), cluster(1, 2), cluster(2, 1)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert_eq!(insight.meta.large_clusters, vec![0]);
        assert_eq!(insight.meta.possible_silos, vec![1, 2]);
        assert_eq!(
            insight.summary_points.last().map(String::as_str),
            Some("Clusters 1, 2 look relatively isolated compared to the rest.")
        );
        assert_eq!(
            insight.recommendations,
            vec!["Encourage cross-team touchpoints between clusters 1, 2 and the main group (e.g., a recurring sync or shared channels)."]
        );
    }

    #[test]
    fn single_silo_wording() {
        let stats = Stats {
            node_count: 10,
            edge_count: 12,
            clusters: vec![cluster(0, 8), cluster(1, 2)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert_eq!(insight.meta.possible_silos, vec![1]);
        assert_eq!(
            insight.summary_points.last().map(String::as_str),
            Some("Cluster 1 looks relatively isolated compared to the rest.")
        );
    }

    #[test]
    fn generic_prompt_only_without_other_recommendations() {
        let stats = Stats {
            node_count: 12,
            edge_count: 20,
            clusters: vec![cluster(0, 4), cluster(1, 4), cluster(2, 4)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert!(insight.meta.possible_silos.is_empty());
        assert_eq!(
            insight.recommendations,
            vec!["Promote cross-cluster collaboration via joint updates or informal coffee chats."]
        );
    }

    #[test]
    fn overload_recommendation_text() {
        let stats = Stats {
            node_count: 5,
            edge_count: 4,
            top_connectors: vec![connector("alex", 12), connector("b", 3), connector("c", 3)],
            clusters: vec![cluster(0, 5)],
            ..Stats::default()
        };
        let insight = generate_insights(&stats);
        assert_eq!(insight.meta.overloaded_users, vec!["alex"]);
        assert_eq!(
            insight.recommendations,
            vec!["Distribute responsibilities from a single overloaded connector (alex) where possible to avoid bottlenecks."]
        );
    }

    #[test]
    fn malformed_stats_yield_minimal_payload() {
        let stats = Stats {
            node_count: 1,
            clusters: vec![cluster(0, 3)],
            ..Stats::default()
        };
        let insight = assess_insights(&stats);
        assert!(matches!(
            insight.fault(),
            Some(StatsFault::ClusterOverflow { covered: 3, node_count: 1 })
        ));
        assert_eq!(insight.into_value(), RuleBasedInsight::insufficient_data());
    }

    #[test]
    fn overflowing_cluster_sizes_degrade() {
        let stats = Stats {
            node_count: 5,
            clusters: vec![
                Cluster { cluster_id: 0, size: usize::MAX, nodes: Vec::new() },
                cluster(1, 2),
            ],
            ..Stats::default()
        };
        let insight = assess_insights(&stats);
        assert!(insight.is_degraded());
        assert_eq!(insight.fault(), Some(&StatsFault::SizeOverflow));

        let sparse = Stats {
            node_count: usize::MAX,
            edge_count: 1,
            clusters: vec![cluster(0, 1)],
            ..Stats::default()
        };
        assert!(!assess_insights(&sparse).is_degraded());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(RuleBasedInsight::insufficient_data()).unwrap();
        assert_eq!(json["summaryPoints"][0], INSUFFICIENT_DATA);
        assert!(json["meta"]["possibleSilos"].as_array().unwrap().is_empty());
        assert!(json["meta"]["connectorUsers"].as_array().unwrap().is_empty());
    }
}
