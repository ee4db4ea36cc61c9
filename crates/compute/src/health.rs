//! Composite 0–100 org health score.
//!
//! Four components of up to 25 points each:
//! - Connectivity: links per user, saturating at two links per user
//! - Balance: how far the top connector outweighs the median of the others
//! - Anti-silo: cluster count relative to a quarter of the user count
//! - Cross-team: evenness of cluster sizes, penalized when one cluster dominates

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assessment::{Assessment, StatsFault};
use crate::stats::Stats;

const COMPONENT_MAX: f64 = 25.0;

/// Per-component points, each rounded to `0..=25`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthComponents {
    pub connectivity: u32,
    pub balance: u32,
    pub anti_silo: u32,
    pub cross_team: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    /// `round(clamp(sum of unrounded components, 0, 100))`.
    pub score: u32,
    pub components: HealthComponents,
}

impl HealthScore {
    /// The all-zero score returned for malformed input.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Unrounded component values.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RawComponents {
    connectivity: f64,
    balance: f64,
    anti_silo: f64,
    cross_team: f64,
}

impl RawComponents {
    fn total(&self) -> f64 {
        self.connectivity + self.balance + self.anti_silo + self.cross_team
    }

    fn check_finite(&self) -> Result<(), StatsFault> {
        let named = [
            ("connectivity", self.connectivity),
            ("balance", self.balance),
            ("antiSilo", self.anti_silo),
            ("crossTeam", self.cross_team),
        ];
        match named.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(StatsFault::NonFinite(*name)),
            None => Ok(()),
        }
    }
}

/// Score `stats`, distinguishing a computed score from the zero default
/// returned for malformed input.
pub fn assess_org_health(stats: &Stats) -> Assessment<HealthScore> {
    if stats.node_count == 0 && stats.clusters.is_empty() && stats.top_connectors.is_empty() {
        // nothing to score
        return Assessment::computed(HealthScore::zero());
    }

    match score_components(stats) {
        Ok(raw) => {
            let score = HealthScore {
                score: to_points(raw.total(), 100.0),
                components: HealthComponents {
                    connectivity: to_points(raw.connectivity, COMPONENT_MAX),
                    balance: to_points(raw.balance, COMPONENT_MAX),
                    anti_silo: to_points(raw.anti_silo, COMPONENT_MAX),
                    cross_team: to_points(raw.cross_team, COMPONENT_MAX),
                },
            };
            debug!(score = score.score, "org health score computed");
            Assessment::computed(score)
        }
        Err(fault) => {
            warn!(%fault, "org health scoring degraded to zero");
            Assessment::degraded(HealthScore::zero(), fault)
        }
    }
}

/// Score `stats`, returning the zero score for malformed input.
pub fn compute_org_health(stats: &Stats) -> HealthScore {
    assess_org_health(stats).into_value()
}

fn score_components(stats: &Stats) -> Result<RawComponents, StatsFault> {
    stats.validate()?;

    let raw = RawComponents {
        connectivity: connectivity(stats),
        balance: balance(stats),
        anti_silo: anti_silo(stats),
        cross_team: cross_team(stats),
    };
    raw.check_finite()?;
    Ok(raw)
}

/// Links per user against a reference of two links per user.
fn connectivity(stats: &Stats) -> f64 {
    let denom = (stats.node_count as f64 * 2.0).max(1.0);
    COMPONENT_MAX * (stats.edge_count as f64 / denom).clamp(0.0, 1.0)
}

/// Penalize a top connector far above the median of the remaining ones.
fn balance(stats: &Stats) -> f64 {
    match stats.top_connectors.split_first() {
        None => COMPONENT_MAX,
        Some((_, [])) => 22.0,
        Some((top, others)) => {
            let top = top.weighted_degree as f64;
            let others: Vec<f64> = others.iter().map(|c| c.weighted_degree as f64).collect();
            let med = median(&others);
            let ratio = if med > 0.0 {
                top / med
            } else if top > 0.0 {
                3.0
            } else {
                1.0
            };
            let overload = ((ratio - 1.0) / 2.0).clamp(0.0, 1.0);
            COMPONENT_MAX * (1.0 - overload)
        }
    }
}

/// Fewer clusters relative to the user count is better.
fn anti_silo(stats: &Stats) -> f64 {
    let cluster_count = stats.cluster_count();
    if stats.node_count == 0 {
        return 0.0;
    }
    if cluster_count <= 1 {
        return COMPONENT_MAX;
    }
    let frag_ref = (stats.node_count / 4).max(1) as f64;
    let fragmentation = ((cluster_count - 1) as f64 / frag_ref).clamp(0.0, 1.0);
    COMPONENT_MAX * (1.0 - fragmentation)
}

/// Balanced cluster sizes with no dominant cluster score highest.
fn cross_team(stats: &Stats) -> f64 {
    let cluster_count = stats.cluster_count();
    if cluster_count <= 1 {
        return COMPONENT_MAX;
    }
    if stats.node_count == 0 {
        return 0.0;
    }

    let sizes: Vec<f64> = stats.clusters.iter().map(|c| c.size as f64).collect();
    let summed: f64 = sizes.iter().sum();
    let total = if summed > 0.0 { summed } else { stats.node_count as f64 };
    let k = cluster_count as f64;
    let mean = total / k;
    let variance = sizes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / k;
    let cv = if mean > 0.0 { variance.sqrt() / mean } else { 1.0 };
    let size_balance = (1.0 - cv).clamp(0.0, 1.0);

    let largest = sizes.iter().copied().fold(0.0, f64::max);
    let largest_share = if total > 0.0 { largest / total } else { 1.0 };
    let dominance_penalty = ((largest_share - 0.5) / 0.5).clamp(0.0, 1.0);

    let cluster_factor = match cluster_count {
        0..=2 => 1.0,
        3..=4 => 0.9,
        5..=6 => 0.75,
        _ => 0.6,
    };

    let index = (size_balance * (1.0 - 0.5 * dominance_penalty) * cluster_factor).clamp(0.0, 1.0);
    COMPONENT_MAX * index
}

/// Median of unsorted values; the mean of the middle pair for even lengths.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn to_points(value: f64, max: f64) -> u32 {
    value.clamp(0.0, max).round() as u32
}
