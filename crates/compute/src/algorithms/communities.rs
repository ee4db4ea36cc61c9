use std::collections::BTreeSet;

use indexmap::IndexMap;
use orgpulse_graph::Adjacency;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Default iteration cap for label propagation.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Detect communities via weighted label propagation.
///
/// Each node starts with its own label. Every iteration visits the nodes in a
/// freshly shuffled order; a node with neighbors sums edge weight per
/// neighbor label and draws its new label with probability proportional to
/// that mass. Labels update in place, so later visits in the same iteration
/// see earlier changes. Stops after `max_iterations` or an iteration with no
/// changes.
///
/// All randomness comes from `rng`; a seeded generator gives reproducible
/// clusters, an entropy-seeded one will not.
///
/// Returns dense cluster ids `0..k`, indexed like `adj`.
pub fn label_propagation<R: Rng + ?Sized>(
    adj: &Adjacency,
    max_iterations: usize,
    rng: &mut R,
) -> Vec<usize> {
    let n = adj.node_count();
    if n <= 1 {
        return vec![0; n];
    }

    let mut labels: Vec<usize> = (0..n).collect();
    let mut order: Vec<usize> = (0..n).collect();

    for iteration in 0..max_iterations {
        order.shuffle(rng);
        let mut changes = 0usize;

        for &node in &order {
            if adj.degree(node) == 0 {
                continue; // isolated node keeps its label
            }

            let mut label_weights: IndexMap<usize, u64> = IndexMap::new();
            for (neighbor, weight) in adj.neighbors(node) {
                *label_weights.entry(labels[neighbor]).or_insert(0) += weight;
            }

            let chosen = weighted_choice(&label_weights, rng).unwrap_or(labels[node]);
            if chosen != labels[node] {
                labels[node] = chosen;
                changes += 1;
            }
        }

        if changes == 0 {
            debug!(iterations = iteration + 1, "label propagation converged");
            return normalize_labels(&labels);
        }
    }

    debug!(
        iterations = max_iterations,
        "label propagation stopped without convergence"
    );
    normalize_labels(&labels)
}

/// Run label propagation with the default iteration cap (10).
pub fn label_propagation_default<R: Rng + ?Sized>(adj: &Adjacency, rng: &mut R) -> Vec<usize> {
    label_propagation(adj, DEFAULT_MAX_ITERATIONS, rng)
}

/// Draw a label with probability proportional to its weight.
/// Falls back to the first label when every weight is zero.
fn weighted_choice<R: Rng + ?Sized>(label_weights: &IndexMap<usize, u64>, rng: &mut R) -> Option<usize> {
    let (&first, _) = label_weights.first()?;
    match WeightedIndex::<u64>::new(label_weights.values().copied()) {
        Ok(dist) => label_weights.get_index(dist.sample(rng)).map(|(&label, _)| label),
        Err(_) => Some(first),
    }
}

/// Remap labels to `0..k` in ascending order of the original label.
fn normalize_labels(labels: &[usize]) -> Vec<usize> {
    let unique: Vec<usize> = labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    labels
        .iter()
        .map(|label| unique.binary_search(label).unwrap_or_else(|pos| pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgpulse_graph::InteractionGraph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_triangles() -> Adjacency {
        let mut g = InteractionGraph::new();
        for (a, b) in [("a1", "a2"), ("a2", "a3"), ("a3", "a1")] {
            g.add_interaction(a, b, 3);
        }
        for (a, b) in [("b1", "b2"), ("b2", "b3"), ("b3", "b1")] {
            g.add_interaction(a, b, 3);
        }
        Adjacency::from_graph(&g)
    }

    #[test]
    fn communities_disjoint_triangles() {
        let adj = two_triangles();
        let mut rng = StdRng::seed_from_u64(7);
        let labels = label_propagation(&adj, 50, &mut rng);
        let at = |id: &str| labels[adj.index_of(id).unwrap()];

        assert_eq!(at("a1"), at("a2"));
        assert_eq!(at("a2"), at("a3"));
        assert_eq!(at("b1"), at("b2"));
        assert_eq!(at("b2"), at("b3"));
        assert_ne!(at("a1"), at("b1"));
    }

    #[test]
    fn labels_never_cross_components() {
        let adj = two_triangles();
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let labels = label_propagation(&adj, 1, &mut rng);
            let side_a: BTreeSet<usize> = ["a1", "a2", "a3"]
                .iter()
                .map(|id| labels[adj.index_of(id).unwrap()])
                .collect();
            let side_b: BTreeSet<usize> = ["b1", "b2", "b3"]
                .iter()
                .map(|id| labels[adj.index_of(id).unwrap()])
                .collect();
            assert!(side_a.is_disjoint(&side_b), "seed {seed}");
        }
    }

    #[test]
    fn same_seed_same_clusters() {
        let adj = two_triangles();
        let first = label_propagation_default(&adj, &mut StdRng::seed_from_u64(42));
        let second = label_propagation_default(&adj, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn labels_are_dense() {
        let mut g = InteractionGraph::new();
        g.add_interaction("a", "b", 1);
        g.register_node("solo1");
        g.register_node("solo2");
        let adj = Adjacency::from_graph(&g);

        let labels = label_propagation_default(&adj, &mut StdRng::seed_from_u64(1));
        let unique: BTreeSet<usize> = labels.iter().copied().collect();
        assert_eq!(unique, (0..unique.len()).collect::<BTreeSet<usize>>());
        // isolated nodes keep separate clusters
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn single_node_and_empty() {
        let mut g = InteractionGraph::new();
        g.register_node("only");
        let adj = Adjacency::from_graph(&g);
        assert_eq!(label_propagation_default(&adj, &mut StdRng::seed_from_u64(0)), vec![0]);
        assert!(label_propagation_default(&Adjacency::default(), &mut StdRng::seed_from_u64(0)).is_empty());
    }

    #[test]
    fn normalize_keeps_label_order() {
        assert_eq!(normalize_labels(&[7, 3, 7, 9]), vec![1, 0, 1, 2]);
    }

    #[test]
    fn weighted_choice_single_label() {
        let mut weights = IndexMap::new();
        weights.insert(4usize, 10u64);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(weighted_choice(&weights, &mut rng), Some(4));
        assert_eq!(weighted_choice(&IndexMap::new(), &mut rng), None);
    }

    #[test]
    fn weighted_choice_all_zero_falls_back_to_first() {
        let mut weights = IndexMap::new();
        weights.insert(2usize, 0u64);
        weights.insert(5usize, 0u64);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(weighted_choice(&weights, &mut rng), Some(2));
    }
}
