use std::collections::VecDeque;

use orgpulse_graph::Adjacency;

const UNVISITED: usize = usize::MAX;

/// Betweenness centrality via Brandes' algorithm.
///
/// Shortest paths are unweighted: an edge counts as one hop whatever its
/// weight. Each undirected path is found once from either endpoint, so the
/// accumulated scores are halved at the end. Graphs with two nodes or fewer
/// score zero everywhere.
///
/// Returns one score per node, indexed like `adj`.
pub fn betweenness_centrality(adj: &Adjacency) -> Vec<f64> {
    let n = adj.node_count();
    let mut betweenness = vec![0.0; n];
    if n <= 2 {
        return betweenness;
    }

    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut distance = vec![UNVISITED; n];
    let mut delta = vec![0.0_f64; n];

    for source in 0..n {
        for preds in &mut predecessors {
            preds.clear();
        }
        sigma.fill(0.0);
        distance.fill(UNVISITED);
        delta.fill(0.0);

        sigma[source] = 1.0;
        distance[source] = 0;
        queue.push_back(source);

        // Forward pass: BFS counting shortest paths.
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let next = distance[v] + 1;
            for (w, _) in adj.neighbors(v) {
                if distance[w] == UNVISITED {
                    distance[w] = next;
                    queue.push_back(w);
                }
                if distance[w] == next {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Backward pass: accumulate dependencies in reverse BFS order.
        while let Some(w) = stack.pop() {
            if sigma[w] > 0.0 {
                let coefficient = (1.0 + delta[w]) / sigma[w];
                for &v in &predecessors[w] {
                    delta[v] += sigma[v] * coefficient;
                }
            }
            if w != source {
                betweenness[w] += delta[w];
            }
        }
    }

    for score in &mut betweenness {
        *score /= 2.0;
    }
    betweenness
}
