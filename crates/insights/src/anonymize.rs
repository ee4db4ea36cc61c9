use std::collections::{BTreeMap, BTreeSet};

use orgpulse_compute::{GraphReport, Stats};
use orgpulse_core::UserId;
use orgpulse_graph::Edge;
use regex::{Captures, Regex};
use tracing::warn;

use crate::digest::WeeklyDigest;
use crate::rules::RuleBasedInsight;

/// Deterministic user-id to `user_{n}` mapping.
///
/// Labels are assigned over the sorted distinct ids, so the same id set
/// always yields the same labels. Ids the map doesn't know pass through.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    labels: BTreeMap<UserId, String>,
    /// Whole-word matcher over every known id, longest first.
    pattern: Option<Regex>,
}

impl Anonymizer {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        let unique: BTreeSet<UserId> = ids
            .into_iter()
            .map(Into::into)
            .filter(|id: &UserId| !id.is_empty())
            .collect();
        let labels: BTreeMap<UserId, String> = unique
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, format!("user_{}", i + 1)))
            .collect();
        let pattern = word_pattern(labels.keys());
        Self { labels, pattern }
    }

    /// Map every user in an analysis run.
    pub fn for_report(report: &GraphReport) -> Self {
        Self::new(report.nodes.iter().map(|n| n.id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// The label for `id`, or `id` itself when unknown.
    pub fn id(&self, id: &str) -> String {
        self.label(id).unwrap_or(id).to_string()
    }

    /// Replace whole-word occurrences of known ids in free text.
    pub fn text(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures<'_>| self.id(&caps[0]))
                .into_owned(),
            None => text.to_string(),
        }
    }

    pub fn report(&self, report: &GraphReport) -> GraphReport {
        GraphReport {
            nodes: report
                .nodes
                .iter()
                .map(|n| {
                    let mut node = n.clone();
                    node.id = self.id(&n.id);
                    node
                })
                .collect(),
            edges: report
                .edges
                .iter()
                .map(|e| Edge {
                    from: self.id(&e.from),
                    to: self.id(&e.to),
                    weight: e.weight,
                })
                .collect(),
            stats: self.stats(&report.stats),
        }
    }

    pub fn stats(&self, stats: &Stats) -> Stats {
        let mut out = stats.clone();
        for connector in &mut out.top_connectors {
            connector.id = self.id(&connector.id);
        }
        for cluster in &mut out.clusters {
            for node in &mut cluster.nodes {
                *node = self.id(node);
            }
        }
        out
    }

    pub fn insight(&self, insight: &RuleBasedInsight) -> RuleBasedInsight {
        let mut out = insight.clone();
        for user in out
            .meta
            .connector_users
            .iter_mut()
            .chain(out.meta.overloaded_users.iter_mut())
        {
            *user = self.id(user);
        }
        out.summary_points = insight.summary_points.iter().map(|p| self.text(p)).collect();
        out.recommendations = insight.recommendations.iter().map(|r| self.text(r)).collect();
        out
    }

    pub fn digest(&self, digest: &WeeklyDigest) -> WeeklyDigest {
        WeeklyDigest {
            title: digest.title.clone(),
            summary_line: self.text(&digest.summary_line),
            key_highlights: digest.key_highlights.iter().map(|h| self.text(h)).collect(),
            recommendations: digest.recommendations.iter().map(|r| self.text(r)).collect(),
        }
    }
}

fn word_pattern<'a>(ids: impl Iterator<Item = &'a UserId>) -> Option<Regex> {
    let mut ids: Vec<&UserId> = ids.collect();
    if ids.is_empty() {
        return None;
    }
    // alternation is leftmost-first, so longer ids must come first
    ids.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = ids
        .iter()
        .map(|id| regex::escape(id))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!(r"\b(?:{alternation})\b")) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!(error = %e, "could not build anonymization pattern; text left as is");
            None
        }
    }
}
