use std::fmt::{Debug, Formatter};

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

use crate::geo::{Boundable, Point, Rectangle, Segment};
use crate::graph::{EdgeId, NodeId};
use crate::index::{EdgeObject, EdgeTree, GridIndex};

/// A continuous position along a graph edge: the edge and the distance,
/// in segment units, from the edge's source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePos {
    pub edge: EdgeId,
    pub position: f64,
}

impl EdgePos {
    pub fn new(edge: EdgeId, position: f64) -> EdgePos {
        EdgePos { edge, position }
    }

    /// Resolves the position to a point on the edge's segment.
    pub fn point(&self, graph: &Graph) -> Point {
        graph.edge_segment(self.edge).point_at_factor(self.position, false)
    }
}

/// Directed road multigraph.
///
/// Node and edge ids are dense integers assigned in insertion order and
/// stable for the lifetime of the graph. A graph is *bidirectional* when
/// every edge `(u, v)` is accompanied by an edge `(v, u)`; operations that
/// require this validate it first.
#[derive(Clone, Default)]
pub struct Graph {
    graph: DiGraph<Point, ()>,
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph with {} nodes and {} edges",
            self.graph.node_count(),
            self.graph.edge_count()
        )
    }
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    pub fn add_node(&mut self, point: Point) -> NodeId {
        self.graph.add_node(point)
    }

    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) -> EdgeId {
        self.graph.add_edge(src, dst, ())
    }

    /// Adds the edge pair `(u, v)` and `(v, u)`, returned in that order.
    pub fn add_bidirectional_edge(&mut self, u: NodeId, v: NodeId) -> [EdgeId; 2] {
        [self.add_edge(u, v), self.add_edge(v, u)]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_indices()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        self.graph.edge_indices()
    }

    pub fn point(&self, node: NodeId) -> Point {
        self.graph[node]
    }

    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        self.graph
            .edge_endpoints(edge)
            .expect("edge id belongs to this graph")
    }

    pub fn edge_src(&self, edge: EdgeId) -> NodeId {
        self.endpoints(edge).0
    }

    pub fn edge_dst(&self, edge: EdgeId) -> NodeId {
        self.endpoints(edge).1
    }

    /// The segment from the edge's source point to its destination point.
    pub fn edge_segment(&self, edge: EdgeId) -> Segment {
        let (src, dst) = self.endpoints(edge);
        Segment::new(self.graph[src], self.graph[dst])
    }

    pub fn edge_length(&self, edge: EdgeId) -> f64 {
        self.edge_segment(edge).length()
    }

    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| edge.id())
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.graph.edges_directed(node, Direction::Outgoing).count()
    }

    /// The closest position on `edge` to `point`.
    pub fn closest_pos(&self, edge: EdgeId, point: Point) -> EdgePos {
        EdgePos::new(edge, self.edge_segment(edge).project(point, false))
    }

    /// Bounding box over all node positions; empty graphs yield the empty
    /// rectangle.
    pub fn bounds(&self) -> Rectangle {
        self.graph
            .node_weights()
            .fold(Rectangle::EMPTY, |rect, &p| rect.extend(p))
    }

    /// Builds an R-tree over edge bounding boxes. The index goes stale if
    /// the graph mutates afterwards.
    pub fn rtree(&self) -> EdgeTree {
        let objects = self
            .edge_ids()
            .map(|edge| EdgeObject {
                edge,
                segment: self.edge_segment(edge),
            })
            .collect();
        EdgeTree::bulk_load(objects)
    }

    /// Builds a uniform grid index over edge bounding boxes, keyed by the
    /// edge ids' dense indices.
    pub fn grid_index(&self, cell: f64) -> GridIndex {
        let mut index = GridIndex::new(cell);
        for edge in self.edge_ids() {
            index.insert(edge.index(), self.edge_segment(edge).bounds());
        }
        index
    }

    /// True when every edge has a reverse counterpart.
    pub fn is_bidirectional(&self) -> bool {
        self.edge_ids().all(|edge| {
            let (src, dst) = self.endpoints(edge);
            self.graph.find_edge(dst, src).is_some()
        })
    }

    /// Adds the missing reverse edge for every one-way edge.
    pub fn make_bidirectional(&mut self) {
        let missing = self
            .edge_ids()
            .map(|edge| self.endpoints(edge))
            .filter(|&(src, dst)| self.graph.find_edge(dst, src).is_none())
            .collect::<Vec<_>>();
        for (src, dst) in missing {
            self.add_edge(dst, src);
        }
    }

    /// The subgraph of nodes inside `rect` and edges with both endpoints
    /// inside, densely re-indexed.
    pub fn subgraph_in_rect(&self, rect: Rectangle) -> Graph {
        let mut subgraph = Graph::new();
        let mut node_map = FxHashMap::default();
        for node in self.node_ids() {
            let point = self.graph[node];
            if rect.contains(point) {
                node_map.insert(node, subgraph.add_node(point));
            }
        }
        for edge in self.edge_ids() {
            let (src, dst) = self.endpoints(edge);
            if let (Some(&src), Some(&dst)) = (node_map.get(&src), node_map.get(&dst)) {
                subgraph.add_edge(src, dst);
            }
        }
        subgraph
    }

    /// Rewrites every node position from longitude/latitude into planar
    /// meters relative to `origin`.
    pub fn lon_lat_to_meters(&mut self, origin: Point) {
        for point in self.graph.node_weights_mut() {
            *point = point.lon_lat_to_meters(origin);
        }
    }
}
