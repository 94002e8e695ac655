use rustc_hash::{FxHashMap, FxHashSet};

use crate::geo::Point;
use crate::graph::{EdgeId, Graph, GraphError, NodeId};
use crate::graph::item::EdgePos;

/// A maximal chain of edges whose interior nodes have exactly two outgoing
/// edges, bounded by junctions or dead ends.
///
/// `edge_distances[i]` is the cumulative length at the *start* of
/// `edges[i]`; the final entry holds the total length.
#[derive(Clone, Debug)]
pub struct RoadSegment {
    pub id: usize,
    pub edges: Vec<EdgeId>,
    pub edge_distances: Vec<f64>,
}

impl RoadSegment {
    pub fn new(graph: &Graph, edges: Vec<EdgeId>) -> Result<RoadSegment, GraphError> {
        let mut edge_distances = vec![0.0];
        let mut cur: Option<NodeId> = None;
        for &edge in &edges {
            if let Some(cur) = cur {
                if cur != graph.edge_src(edge) {
                    return Err(GraphError::BrokenChain);
                }
            }
            let total = edge_distances.last().copied().unwrap_or(0.0);
            edge_distances.push(total + graph.edge_length(edge));
            cur = Some(graph.edge_dst(edge));
        }
        Ok(RoadSegment {
            id: 0,
            edges,
            edge_distances,
        })
    }

    pub fn src(&self, graph: &Graph) -> NodeId {
        graph.edge_src(self.edges[0])
    }

    pub fn dst(&self, graph: &Graph) -> NodeId {
        graph.edge_dst(self.edges[self.edges.len() - 1])
    }

    pub fn length(&self) -> f64 {
        self.edge_distances[self.edge_distances.len() - 1]
    }

    /// The index of the member edge containing longitudinal position `t`,
    /// clamped to the last edge.
    pub fn distance_to_index(&self, graph: &Graph, mut t: f64) -> usize {
        for (i, &edge) in self.edges.iter().enumerate() {
            t -= graph.edge_length(edge);
            if t <= 0.0 {
                return i;
            }
        }
        self.edges.len() - 1
    }

    pub fn distance_to_edge(&self, graph: &Graph, t: f64) -> EdgeId {
        self.edges[self.distance_to_index(graph, t)]
    }

    /// The cumulative distance at the start of `edge`, if it is a member.
    pub fn distance_of_edge(&self, edge: EdgeId) -> Option<f64> {
        self.edges
            .iter()
            .position(|&other| other == edge)
            .map(|i| self.edge_distances[i])
    }

    /// The position at longitudinal distance `t`, clamped to the end of
    /// the containing edge.
    pub fn pos_at_factor(&self, graph: &Graph, t: f64) -> EdgePos {
        let idx = self.distance_to_index(graph, t);
        let edge = self.edges[idx];
        let position = (t - self.edge_distances[idx]).min(graph.edge_length(edge));
        EdgePos::new(edge, position)
    }

    /// The closest position to `p` over all member edges.
    pub fn closest_pos(&self, graph: &Graph, p: Point) -> EdgePos {
        let mut best: Option<(EdgePos, f64)> = None;
        for &edge in &self.edges {
            let pos = graph.closest_pos(edge, p);
            let distance = pos.point(graph).distance(p);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((pos, distance));
            }
        }
        best.map(|(pos, _)| pos).unwrap_or(EdgePos::new(self.edges[0], 0.0))
    }
}

impl Graph {
    /// Extracts road segments: maximal chains of edges between junctions
    /// (nodes with outgoing degree != 2) or dead ends.
    ///
    /// Requires a bidirectional graph. Every edge belongs to exactly one
    /// returned segment; an isolated loop with no junction yields one
    /// segment starting at an arbitrary member edge. Malformed structures
    /// surface as errors since they indicate upstream corruption.
    pub fn get_road_segments(&self) -> Result<Vec<RoadSegment>, GraphError> {
        if !self.is_bidirectional() {
            return Err(GraphError::NotBidirectional);
        }

        let mut road_segments: Vec<RoadSegment> = Vec::new();
        let mut seen_edges = FxHashSet::default();

        // Walk a new road segment out of `initial_edge`. Without
        // `expect_loop` the walk must start at a junction or dead end;
        // with it, the walk must return to the initial edge.
        let incorporate = |initial_edge: EdgeId, expect_loop: bool, road_segments: &mut Vec<RoadSegment>, seen_edges: &mut FxHashSet<EdgeId>| -> Result<(), GraphError> {
            let mut edges = vec![initial_edge];
            seen_edges.insert(initial_edge);
            let mut prev_edge = initial_edge;
            loop {
                let head = self.edge_dst(prev_edge);
                let out = self.out_edges(head).collect::<Vec<_>>();
                if out.len() != 2 {
                    if expect_loop {
                        return Err(GraphError::UnexpectedJunction);
                    }
                    break;
                }
                let back = self.edge_src(prev_edge);
                let next_edge = if self.edge_dst(out[0]) != back {
                    out[0]
                } else if self.edge_dst(out[1]) != back {
                    out[1]
                } else {
                    return Err(GraphError::StuckWalk);
                };
                if next_edge == initial_edge {
                    if !expect_loop {
                        return Err(GraphError::UnexpectedLoop);
                    }
                    break;
                }
                edges.push(next_edge);
                seen_edges.insert(next_edge);
                prev_edge = next_edge;
            }
            let mut rs = RoadSegment::new(self, edges)?;
            rs.id = road_segments.len();
            road_segments.push(rs);
            Ok(())
        };

        for node in self.node_ids() {
            if self.out_degree(node) == 2 {
                continue;
            }
            for edge in self.out_edges(node).collect::<Vec<_>>() {
                incorporate(edge, false, &mut road_segments, &mut seen_edges)?;
            }
        }

        // components that are pure loops have no junction to start from
        for edge in self.edge_ids() {
            if seen_edges.contains(&edge) {
                continue;
            }
            let (src, dst) = self.endpoints(edge);
            if self.out_degree(src) != 2 || self.out_degree(dst) != 2 {
                return Err(GraphError::LeftoverEdge);
            }
            incorporate(edge, true, &mut road_segments, &mut seen_edges)?;
        }

        Ok(road_segments)
    }

    /// Collapses every road segment to a single edge in a companion graph.
    ///
    /// Returns the companion graph, the mapping from its edge ids to the
    /// road segments they stand for, and the mapping from original node
    /// ids to companion node ids.
    pub fn get_road_segment_graph(
        &self,
    ) -> Result<(Graph, FxHashMap<EdgeId, RoadSegment>, FxHashMap<NodeId, NodeId>), GraphError>
    {
        let road_segments = self.get_road_segments()?;
        let mut node_map: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut edge_to_segment: FxHashMap<EdgeId, RoadSegment> = FxHashMap::default();
        let mut collapsed = Graph::new();
        for rs in road_segments {
            let (src, dst) = (rs.src(self), rs.dst(self));
            for node in [src, dst] {
                if !node_map.contains_key(&node) {
                    let mapped = collapsed.add_node(self.point(node));
                    node_map.insert(node, mapped);
                }
            }
            let edge = collapsed.add_edge(node_map[&src], node_map[&dst]);
            edge_to_segment.insert(edge, rs);
        }
        Ok((collapsed, edge_to_segment, node_map))
    }
}
