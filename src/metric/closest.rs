use rustc_hash::FxHashMap;

use crate::geo::{Boundable, Point};
use crate::graph::{EdgeId, EdgePos, NodeId};
use crate::metric::frechet_distance;
use crate::metric::store::NodePathsGraph;

/// A path through a graph with fractional endpoints: it enters at `start`,
/// visits `path`, and leaves at `end`.
#[derive(Clone, Debug)]
pub struct GraphPath {
    pub start: EdgePos,
    pub path: Vec<NodeId>,
    pub end: EdgePos,
}

/// DP cell: the best subpath ending on one edge at one observation.
#[derive(Clone, Debug)]
struct Entry {
    /// Fréchet distance of the whole subpath so far.
    max_distance: f64,
    edge_pos: EdgePos,
    /// Nodes traversed since the previous observation.
    nodes: Vec<NodeId>,

    // tie-breakers, in comparison order
    cur_distance: f64,
    endpoint_distance: f64,
}

/// Strict "is `a` a better entry than `b`" with deterministic
/// tie-breaking: Fréchet so far, then the current step's Fréchet, then the
/// endpoint distance, then the subpath length.
fn better(a: &Entry, b: &Entry) -> bool {
    if a.max_distance != b.max_distance {
        return a.max_distance < b.max_distance;
    }
    if a.cur_distance != b.cur_distance {
        return a.cur_distance < b.cur_distance;
    }
    if a.endpoint_distance != b.endpoint_distance {
        return a.endpoint_distance < b.endpoint_distance;
    }
    a.nodes.len() < b.nodes.len()
}

/// Finds the path through the graph minimizing the discrete Fréchet
/// distance to `path`, with every chosen edge within `radius` of its
/// observation. Returns the path and its Fréchet distance, or `None` when
/// no edge chain stays within the radius.
///
/// Viterbi-like DP: `entries[i][edge]` is the best subpath ending on
/// `edge` at observation `i`. A transition either stays on the edge
/// (monotonically non-decreasing position), hops to an adjacent edge, or
/// follows a stored shortest path with budget four times the observation
/// spacing.
pub fn closest_path(
    graph: &NodePathsGraph,
    path: &[Point],
    radius: f64,
) -> Option<(GraphPath, f64)> {
    if path.is_empty() {
        return None;
    }

    let map = &graph.graph;
    let edge_index = map.grid_index(radius * 8.0);
    let mut entries: Vec<FxHashMap<EdgeId, Entry>> = Vec::with_capacity(path.len());
    let mut backpointers: Vec<FxHashMap<EdgeId, EdgeId>> = vec![FxHashMap::default(); path.len()];

    // initial entries: every edge within the radius of the first point
    let mut initial = FxHashMap::default();
    for id in edge_index.search(path[0].bounds().add_tol(radius)) {
        let edge = EdgeId::new(id);
        let distance = map.edge_segment(edge).distance(path[0]);
        if distance > radius {
            continue;
        }
        initial.insert(
            edge,
            Entry {
                max_distance: distance,
                edge_pos: map.closest_pos(edge, path[0]),
                nodes: Vec::new(),
                cur_distance: distance,
                endpoint_distance: 0.0,
            },
        );
    }
    entries.push(initial);

    for i in 1..path.len() {
        let mut layer: FxHashMap<EdgeId, Entry> = FxHashMap::default();

        for id in edge_index.search(path[i].bounds().add_tol(radius)) {
            let edge = EdgeId::new(id);
            if map.edge_segment(edge).distance(path[i]) > radius {
                continue;
            }

            for (&prev_edge_id, prev_entry) in &entries[i - 1] {
                // the node subpath from the previous edge to this one
                let mut nodes = Vec::new();
                if prev_entry.edge_pos.edge != edge {
                    if map.edge_dst(prev_entry.edge_pos.edge) == map.edge_src(edge) {
                        nodes.push(map.edge_src(edge));
                    } else {
                        let budget = path[i].distance(path[i - 1]) * 4.0;
                        let Some(stored) = graph.get_shortest_path(
                            map.edge_dst(prev_entry.edge_pos.edge),
                            map.edge_src(edge),
                            budget,
                        ) else {
                            continue;
                        };
                        nodes.push(map.edge_dst(prev_entry.edge_pos.edge));
                        nodes.extend(stored);
                    }
                }

                // staying on the same edge only ever moves forward
                let mut closest_pos = map.closest_pos(edge, path[i]);
                if prev_entry.edge_pos.edge == edge {
                    closest_pos.position = closest_pos.position.max(prev_entry.edge_pos.position);
                }

                let mut graph_points = vec![prev_entry.edge_pos.point(map)];
                graph_points.extend(nodes.iter().map(|&node| map.point(node)));
                graph_points.push(closest_pos.point(map));

                let cur_distance = frechet_distance(&graph_points, &path[i - 1..=i]);
                let entry = Entry {
                    max_distance: prev_entry.max_distance.max(cur_distance),
                    edge_pos: closest_pos,
                    nodes,
                    cur_distance,
                    endpoint_distance: prev_entry
                        .edge_pos
                        .point(map)
                        .distance(path[i - 1])
                        .max(closest_pos.point(map).distance(path[i])),
                };

                if layer.get(&edge).map_or(true, |cur| better(&entry, cur)) {
                    layer.insert(edge, entry);
                    backpointers[i].insert(edge, prev_edge_id);
                }
            }
        }

        entries.push(layer);
    }

    // best entry on the last observation
    let (mut cur_edge, best) = entries[path.len() - 1]
        .iter()
        .fold(None::<(EdgeId, &Entry)>, |best, (&edge, entry)| {
            match best {
                Some((_, cur)) if !better(entry, cur) => best,
                _ => Some((edge, entry)),
            }
        })?;
    let (end, max_distance) = (best.edge_pos, best.max_distance);

    // follow backpointers, prepending each step's node subpath
    let mut node_seq = Vec::new();
    for i in (1..path.len()).rev() {
        let entry = &entries[i][&cur_edge];
        let mut prefix = entry.nodes.clone();
        prefix.extend(node_seq);
        node_seq = prefix;
        cur_edge = backpointers[i][&cur_edge];
    }

    Some((
        GraphPath {
            start: entries[0][&cur_edge].edge_pos,
            path: node_seq,
            end,
        },
        max_distance,
    ))
}
