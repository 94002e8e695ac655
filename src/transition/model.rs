use rustc_hash::FxHashMap;

use crate::geo::Point;
use crate::graph::{EdgeId, Graph};
use crate::index::EdgeTree;
use crate::transition::MatchOptions;

/// Precomputed transition probabilities, indexed by the dense edge id.
///
/// Every edge has a 0.5 self-loop. The remaining mass goes to the edges
/// outgoing from the edge's destination: in the default mode a lone
/// continuation receives 0.5 and each of several receives 0.05, with the
/// reverse edge excluded (no U-turns); in angle mode the weights fall off
/// with the turn angle and are normalized under the legacy caps.
pub struct TransitionTable {
    probs: Vec<Vec<(EdgeId, f64)>>,
}

impl TransitionTable {
    pub fn new(graph: &Graph, options: &MatchOptions) -> TransitionTable {
        let mut probs = vec![Vec::new(); graph.edge_count()];

        for edge in graph.edge_ids() {
            let (src, dst) = graph.endpoints(edge);
            let adjacent = graph
                .out_edges(dst)
                .filter(|&other| options.angle_mode || graph.edge_dst(other) != src)
                .collect::<Vec<_>>();

            let mut edge_probs = vec![(edge, 0.5)];

            // adjacency weights, unless the caller supplied their own
            let weights = match &options.edge_weights {
                Some(weights) => adjacent
                    .iter()
                    .map(|other| weights.get(other).copied().unwrap_or(0.0))
                    .collect::<Vec<_>>(),
                None if !options.angle_mode => adjacent
                    .iter()
                    .map(|_| if adjacent.len() == 1 { 0.5 } else { 0.05 })
                    .collect(),
                None => adjacent
                    .iter()
                    .map(|&other| {
                        let angle = graph.edge_segment(edge).angle_to(graph.edge_segment(other));
                        let neg_angle = (std::f64::consts::FRAC_PI_2 - angle).max(0.0);
                        neg_angle * neg_angle + 0.05
                    })
                    .collect(),
            };

            if options.angle_mode {
                // legacy normalization: the average adjacent probability is
                // forced to at most 0.05, and the cumulative mass to at most
                // 0.9; the residual is discarded into an absorbing state
                let total_weight: f64 = weights.iter().sum();
                let average_weight = total_weight / adjacent.len() as f64;
                let mut average_prob = 0.05;
                if average_prob * adjacent.len() as f64 + 0.5 > 0.9 {
                    average_prob = (0.9 - 0.5) / adjacent.len() as f64;
                }
                for (&other, &weight) in adjacent.iter().zip(&weights) {
                    edge_probs.push((other, average_prob * weight / average_weight));
                }
            } else {
                for (&other, &weight) in adjacent.iter().zip(&weights) {
                    edge_probs.push((other, weight));
                }
            }

            probs[edge.index()] = edge_probs;
        }

        TransitionTable { probs }
    }

    /// The transitions out of `edge`, self-loop included.
    pub fn from_edge(&self, edge: EdgeId) -> &[(EdgeId, f64)] {
        &self.probs[edge.index()]
    }
}

/// Conditional emission probabilities for one observation.
///
/// Candidate edges are those whose bounding box intersects the square of
/// half-width `tolerance` around `point`; each scores a Gaussian of its
/// point-to-segment distance, normalized over the candidate set. An empty
/// map means no edge is anywhere near the observation.
pub fn emission_probs(
    graph: &Graph,
    rtree: &EdgeTree,
    point: Point,
    tolerance: f64,
    sigma: f64,
) -> FxHashMap<EdgeId, f64> {
    let mut scores = FxHashMap::default();
    let mut total_score = 0.0;
    for object in rtree.search(point.rectangle_tol(tolerance)) {
        let distance = graph.edge_segment(object.edge).distance(point);
        let score = (-0.5 * distance * distance / sigma / sigma).exp();
        scores.insert(object.edge, score);
        total_score += score;
    }
    for score in scores.values_mut() {
        *score /= total_score;
    }
    scores
}
