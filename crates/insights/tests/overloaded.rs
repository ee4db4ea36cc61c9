//! Insights and digest over full analysis runs.

use orgpulse_compute::build_graph;
use orgpulse_core::InteractionEvent;
use orgpulse_insights::{build_weekly_digest, generate_insights, snapshot_text, Anonymizer};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mentions_of(target: &str, senders: usize) -> Vec<InteractionEvent> {
    (0..senders)
        .map(|i| {
            InteractionEvent::message(format!("m{i}"), "support", format!("asker{i}"))
                .with_mentions([target])
        })
        .collect()
}

#[test]
fn single_overloaded_connector() {
    let events = mentions_of("lead", 8);
    let report = build_graph(&events, &mut StdRng::seed_from_u64(5));
    assert_eq!(report.stats.node_count, 9);
    assert_eq!(report.stats.top_connectors[0].id, "lead");
    assert_eq!(report.stats.top_connectors[0].weighted_degree, 24);

    let insight = generate_insights(&report.stats);
    assert_eq!(insight.meta.overloaded_users, vec!["lead"]);
    assert!(insight
        .recommendations
        .iter()
        .any(|r| r.contains("single overloaded connector (lead)")));

    let digest = build_weekly_digest(&report.stats, &insight);
    assert_eq!(
        digest.summary_line,
        "Collaboration snapshot shows 9 users and 8 interaction links."
    );
    assert!(digest.recommendations.iter().any(|r| r.contains("(lead)")));
}

#[test]
fn anonymized_outputs_hide_user_ids() {
    let events = mentions_of("lead", 4);
    let report = build_graph(&events, &mut StdRng::seed_from_u64(5));
    let insight = generate_insights(&report.stats);
    let anon = Anonymizer::for_report(&report);

    let masked_stats = anon.stats(&report.stats);
    let text = snapshot_text(&masked_stats, &anon.insight(&insight));
    assert!(!text.contains("lead"));
    assert!(!text.contains("asker"));
    assert!(text.contains("user_"));

    let masked = serde_json::to_string(&anon.report(&report)).unwrap();
    assert!(!masked.contains("asker"));
}

#[test]
fn empty_run_gives_minimal_but_valid_outputs() {
    let report = build_graph(&[], &mut StdRng::seed_from_u64(0));
    let insight = generate_insights(&report.stats);
    assert_eq!(
        insight.summary_points,
        vec!["There are 0 active users with 0 interaction links."]
    );
    assert_eq!(
        snapshot_text(&report.stats, &insight),
        "There are 0 active users and 0 interaction links."
    );
}
