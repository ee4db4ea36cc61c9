//! Outcome type for the informational scorers.
//!
//! Health scoring and insight generation never fail a request: a malformed
//! `Stats` yields a fixed safe default. `Assessment` keeps the two cases
//! apart so callers can tell an empty graph from a fault.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::stats::Stats;

/// Why a `Stats` value could not be scored.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum StatsFault {
    #[error("cluster id {0} appears more than once")]
    DuplicateClusterId(usize),

    #[error("clusters cover {covered} users but nodeCount is {node_count}")]
    ClusterOverflow { covered: usize, node_count: usize },

    #[error("{connectors} top connectors for {node_count} users")]
    ConnectorOverflow { connectors: usize, node_count: usize },

    #[error("cluster sizes overflow when summed")]
    SizeOverflow,

    #[error("non-finite intermediate value in {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Assessment<T> {
    /// Computed from well-formed input.
    Computed { value: T },
    /// Input was malformed; `value` is the safe default.
    Degraded { value: T, fault: StatsFault },
}

impl<T> Assessment<T> {
    pub fn computed(value: T) -> Self {
        Assessment::Computed { value }
    }

    pub fn degraded(value: T, fault: StatsFault) -> Self {
        Assessment::Degraded { value, fault }
    }

    pub fn value(&self) -> &T {
        match self {
            Assessment::Computed { value } | Assessment::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Assessment::Computed { value } | Assessment::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Assessment::Degraded { .. })
    }

    pub fn fault(&self) -> Option<&StatsFault> {
        match self {
            Assessment::Computed { .. } => None,
            Assessment::Degraded { fault, .. } => Some(fault),
        }
    }
}

impl Stats {
    /// Check the structural shape scorers rely on.
    pub fn validate(&self) -> Result<(), StatsFault> {
        let mut seen = HashSet::with_capacity(self.clusters.len());
        for cluster in &self.clusters {
            if !seen.insert(cluster.cluster_id) {
                return Err(StatsFault::DuplicateClusterId(cluster.cluster_id));
            }
        }

        let covered = self
            .clusters
            .iter()
            .try_fold(0usize, |acc, c| acc.checked_add(c.size))
            .ok_or(StatsFault::SizeOverflow)?;
        if covered > self.node_count {
            return Err(StatsFault::ClusterOverflow {
                covered,
                node_count: self.node_count,
            });
        }

        if self.top_connectors.len() > self.node_count {
            return Err(StatsFault::ConnectorOverflow {
                connectors: self.top_connectors.len(),
                node_count: self.node_count,
            });
        }

        Ok(())
    }
}
