//! End-to-end graph analysis over hand-built event sets.

use std::collections::HashSet;

use orgpulse_compute::{build_graph, build_graph_with, GraphReport, NodeMetrics};
use orgpulse_core::{AnalyticsConfig, InteractionEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 2024;

fn analyze(events: &[InteractionEvent]) -> GraphReport {
    build_graph(events, &mut StdRng::seed_from_u64(SEED))
}

/// Seeded analysis with a generous iteration cap, so community splits
/// settle for any seed.
fn analyze_settled(events: &[InteractionEvent]) -> GraphReport {
    let config = AnalyticsConfig {
        community_seed: Some(SEED),
        max_lp_iterations: 50,
    };
    build_graph_with(events, &config)
}

fn node<'a>(report: &'a GraphReport, id: &str) -> &'a NodeMetrics {
    report
        .nodes
        .iter()
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("missing node {id}"))
}

fn mention(id: &str, from: &str, to: &str) -> InteractionEvent {
    InteractionEvent::message(id, "general", from).with_mentions([to])
}

fn triangle(prefix: &str) -> Vec<InteractionEvent> {
    let a = format!("{prefix}1");
    let b = format!("{prefix}2");
    let c = format!("{prefix}3");
    vec![
        mention(&format!("{prefix}-m1"), &a, &b),
        mention(&format!("{prefix}-m2"), &b, &c),
        mention(&format!("{prefix}-m3"), &c, &a),
    ]
}

fn assert_invariants(report: &GraphReport) {
    let weighted: u64 = report.nodes.iter().map(|n| n.weighted_degree).sum();
    let edge_total: u64 = report.edges.iter().map(|e| e.weight).sum();
    assert_eq!(weighted, 2 * edge_total, "weight conservation");

    let stats = &report.stats;
    assert_eq!(
        stats.clusters.iter().map(|c| c.size).sum::<usize>(),
        stats.node_count,
        "cluster coverage"
    );
    for n in &report.nodes {
        let owners = stats
            .clusters
            .iter()
            .filter(|c| c.cluster_id == n.cluster_id && c.nodes.contains(&n.id))
            .count();
        assert_eq!(owners, 1, "{} belongs to exactly one cluster", n.id);
        assert!(n.betweenness >= 0.0);
    }

    let health = &stats.org_health;
    assert!(health.score <= 100);
    for component in [
        health.components.connectivity,
        health.components.balance,
        health.components.anti_silo,
        health.components.cross_team,
    ] {
        assert!(component <= 25);
    }
}

#[test]
fn star_graph() {
    let events: Vec<InteractionEvent> = (1..=5)
        .map(|i| mention(&format!("m{i}"), &format!("leaf{i}"), "hub"))
        .collect();
    let report = analyze(&events);

    assert_eq!(report.stats.node_count, 6);
    assert_eq!(report.stats.edge_count, 5);

    let hub = node(&report, "hub");
    assert_eq!(hub.degree, 5);
    assert_eq!(hub.weighted_degree, 15);
    assert!((hub.betweenness - 10.0).abs() < 1e-10);
    for i in 1..=5 {
        assert_eq!(node(&report, &format!("leaf{i}")).betweenness, 0.0);
    }

    assert_eq!(report.stats.top_connectors[0].id, "hub");
    assert_invariants(&report);
}

#[test]
fn two_disjoint_triangles() {
    let events: Vec<InteractionEvent> = triangle("a").into_iter().chain(triangle("b")).collect();
    let split = analyze_settled(&events);

    assert_eq!(split.stats.node_count, 6);
    assert_eq!(split.stats.edge_count, 6);
    assert_eq!(split.stats.clusters.len(), 2);
    assert!(split.stats.clusters.iter().all(|c| c.size == 3));
    assert!(split.nodes.iter().all(|n| n.betweenness == 0.0));

    let side_a: HashSet<usize> = ["a1", "a2", "a3"]
        .iter()
        .map(|id| node(&split, id).cluster_id)
        .collect();
    assert_eq!(side_a.len(), 1);

    // same six users, all in one connected group around a hub
    let star: Vec<InteractionEvent> = ["a1", "a2", "a3", "b1", "b2"]
        .iter()
        .enumerate()
        .map(|(i, leaf)| mention(&format!("s{i}"), leaf, "b3"))
        .collect();
    let connected = analyze_settled(&star);
    assert_eq!(connected.stats.node_count, 6);
    assert_eq!(connected.stats.clusters.len(), 1);

    assert!(
        split.stats.org_health.components.anti_silo
            < connected.stats.org_health.components.anti_silo
    );
    assert_invariants(&split);
    assert_invariants(&connected);
}

#[test]
fn empty_input_is_degenerate_but_valid() {
    let report = analyze(&[]);
    assert_eq!(report.stats.node_count, 0);
    assert_eq!(report.stats.edge_count, 0);
    assert!(report.stats.clusters.is_empty());
    assert!(report.stats.top_connectors.is_empty());
    assert_eq!(report.stats.org_health.score, 0);
}

#[test]
fn mixed_interactions_keep_invariants() {
    let events = vec![
        InteractionEvent::message("m1", "eng", "alice").with_mentions(["bob", "carol"]),
        InteractionEvent::message("m2", "eng", "bob")
            .replying_to("m1")
            .with_reaction("carol", "thumbsup"),
        InteractionEvent::message("m3", "sales", "dave").with_mentions(["dave", "erin"]),
        InteractionEvent::reaction("m3", "sales", "frank", "tada"),
        InteractionEvent::message("m4", "sales", "erin").replying_to("missing"),
    ];
    let report = analyze(&events);

    // alice-bob: mention 3 + reply 2; self-mention dropped
    let ab = report
        .edges
        .iter()
        .find(|e| (e.from == "alice" && e.to == "bob") || (e.from == "bob" && e.to == "alice"))
        .map(|e| e.weight);
    assert_eq!(ab, Some(5));
    assert!(report.edges.iter().all(|e| e.from != e.to));

    // the sender-less reaction still registers its reactor
    assert!(report.nodes.iter().any(|n| n.id == "frank"));
    assert_invariants(&report);
}

#[test]
fn same_seed_same_report() {
    let events: Vec<InteractionEvent> = triangle("x")
        .into_iter()
        .chain(triangle("y"))
        .chain([mention("bridge", "x1", "y1")])
        .collect();
    assert_eq!(analyze(&events), analyze(&events));
}
