use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::graph::{Graph, NodeId};

/// Parameters for a single-source shortest-path run.
#[derive(Clone, Debug)]
pub struct ShortestPathParams {
    /// Expansions whose tentative distance exceeds this bound are pruned;
    /// nodes still on the frontier at that point are reported in
    /// [`ShortestPathResult::remaining`].
    pub max_distance: f64,

    /// Terminate as soon as any of these nodes is settled.
    pub stop_nodes: Vec<NodeId>,
}

impl Default for ShortestPathParams {
    fn default() -> Self {
        ShortestPathParams {
            max_distance: f64::INFINITY,
            stop_nodes: Vec::new(),
        }
    }
}

/// Result of a Dijkstra run.
///
/// `distances` and `backpointers` hold finalized values for settled nodes
/// and tentative values for `remaining` ones (the frontier at
/// termination).
#[derive(Debug)]
pub struct ShortestPathResult {
    pub source: NodeId,
    pub distances: FxHashMap<NodeId, f64>,
    pub backpointers: FxHashMap<NodeId, NodeId>,
    pub remaining: FxHashSet<NodeId>,
}

impl ShortestPathResult {
    /// Reconstructs the forward path from the source to `dst` by walking
    /// backpointers. `None` if `dst` was never reached.
    pub fn path_to(&self, dst: NodeId) -> Option<Vec<NodeId>> {
        if dst == self.source {
            return Some(vec![self.source]);
        }
        self.backpointers.get(&dst)?;
        let mut reverse = vec![dst];
        let mut cur = dst;
        while cur != self.source {
            cur = *self.backpointers.get(&cur)?;
            reverse.push(cur);
        }
        reverse.reverse();
        Some(reverse)
    }
}

/// Min-heap entry ordered by distance.
struct Frontier {
    distance: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so the BinaryHeap pops the smallest distance first
        other.distance.total_cmp(&self.distance)
    }
}

impl Graph {
    /// Dijkstra from `src`. Edge weight is the Euclidean length of the
    /// edge's segment.
    pub fn shortest_path(&self, src: NodeId, params: ShortestPathParams) -> ShortestPathResult {
        let stop_nodes = params.stop_nodes.iter().copied().collect::<FxHashSet<_>>();

        let mut distances = FxHashMap::default();
        let mut backpointers = FxHashMap::default();
        let mut settled = FxHashSet::default();
        let mut remaining = FxHashSet::default();

        let mut heap = BinaryHeap::new();
        distances.insert(src, 0.0);
        heap.push(Frontier {
            distance: 0.0,
            node: src,
        });

        while let Some(Frontier { distance, node }) = heap.pop() {
            if settled.contains(&node) {
                continue;
            }
            if distance > params.max_distance {
                // monotone pops: everything left is beyond the bound
                remaining.insert(node);
                break;
            }
            settled.insert(node);
            if stop_nodes.contains(&node) {
                break;
            }

            for edge in self.out_edges(node) {
                let next = self.edge_dst(edge);
                if settled.contains(&next) {
                    continue;
                }
                let alt = distance + self.edge_length(edge);
                if distances.get(&next).map_or(true, |&cur| alt < cur) {
                    distances.insert(next, alt);
                    backpointers.insert(next, node);
                    heap.push(Frontier {
                        distance: alt,
                        node: next,
                    });
                }
            }
        }

        for Frontier { node, .. } in heap.drain() {
            if !settled.contains(&node) {
                remaining.insert(node);
            }
        }

        ShortestPathResult {
            source: src,
            distances,
            backpointers,
            remaining,
        }
    }
}
