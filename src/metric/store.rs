use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId, ShortestPathParams, ShortestPathResult};
use crate::metric::MetricError;

/// Cutoff for the precomputed per-source shortest-path trees, in meters.
pub const SP_PRECOMPUTE_DISTANCE: f64 = 1600.0;

/// The finalized shortest-path tree of a single source node.
///
/// Frontier nodes that were never settled under the precompute cutoff are
/// omitted from both maps.
#[derive(Clone, Debug, Default)]
pub struct NodePaths {
    pub backpointers: FxHashMap<NodeId, NodeId>,
    pub distances: FxHashMap<NodeId, f64>,
}

/// On-disk form: JSON objects keyed by stringified node id.
#[derive(Serialize, Deserialize)]
struct NodePathsFile {
    backpointers: BTreeMap<String, usize>,
    distances: BTreeMap<String, f64>,
}

impl NodePaths {
    /// Keeps only the settled portion of a Dijkstra result.
    pub fn from_result(result: &ShortestPathResult) -> NodePaths {
        let mut paths = NodePaths::default();
        for (&node, &pred) in &result.backpointers {
            if !result.remaining.contains(&node) {
                paths.backpointers.insert(node, pred);
            }
        }
        for (&node, &distance) in &result.distances {
            if !result.remaining.contains(&node) {
                paths.distances.insert(node, distance);
            }
        }
        paths
    }

    fn to_file(&self) -> NodePathsFile {
        NodePathsFile {
            backpointers: self
                .backpointers
                .iter()
                .map(|(node, pred)| (node.index().to_string(), pred.index()))
                .collect(),
            distances: self
                .distances
                .iter()
                .map(|(node, distance)| (node.index().to_string(), *distance))
                .collect(),
        }
    }

    /// Unparseable node-id keys are dropped with a warning rather than
    /// poisoning the whole tree.
    fn from_file(file: NodePathsFile) -> NodePaths {
        let parse = |key: &String| -> Option<NodeId> {
            match key.parse::<usize>() {
                Ok(index) => Some(NodeId::new(index)),
                Err(_) => {
                    warn!("dropping bad node id key in store file: {key}");
                    None
                }
            }
        };
        let mut paths = NodePaths::default();
        for (node, pred) in &file.backpointers {
            if let Some(node) = parse(node) {
                paths.backpointers.insert(node, NodeId::new(*pred));
            }
        }
        for (node, distance) in &file.distances {
            if let Some(node) = parse(node) {
                paths.distances.insert(node, *distance);
            }
        }
        paths
    }
}

enum PathsSource {
    /// One `<node>.sp` JSON file per source node, loaded lazily through a
    /// read-through cache.
    Store {
        dir: PathBuf,
        cache: Mutex<FxHashMap<NodeId, Arc<NodePaths>>>,
    },

    /// No store on disk: answer queries with on-demand bounded Dijkstra.
    Live,
}

/// A graph together with its per-source shortest-path trees.
pub struct NodePathsGraph {
    pub graph: Graph,
    source: PathsSource,
}

impl NodePathsGraph {
    /// Queries fall back to live Dijkstra runs; suitable for small graphs
    /// and tests.
    pub fn live(graph: Graph) -> NodePathsGraph {
        NodePathsGraph {
            graph,
            source: PathsSource::Live,
        }
    }

    /// Reads the graph from `path` and binds the store directory
    /// `<path>.sp/` for lazy loading.
    pub fn open(path: impl AsRef<Path>) -> Result<NodePathsGraph, MetricError> {
        let graph = Graph::read(path.as_ref())?;
        Ok(NodePathsGraph {
            graph,
            source: PathsSource::Store {
                dir: store_dir(path),
                cache: Mutex::new(FxHashMap::default()),
            },
        })
    }

    /// The shortest path from `src` to `dst`, if one exists within
    /// `max_distance`. The returned node sequence excludes `src` and ends
    /// with `dst`.
    pub fn get_shortest_path(
        &self,
        src: NodeId,
        dst: NodeId,
        max_distance: f64,
    ) -> Option<Vec<NodeId>> {
        let paths = match &self.source {
            PathsSource::Store { .. } => self.stored_node_paths(src)?,
            PathsSource::Live => Arc::new(self.live_node_paths(src, dst, max_distance)),
        };

        paths.backpointers.get(&dst)?;
        if paths.distances.get(&dst).copied().unwrap_or(f64::INFINITY) > max_distance {
            return None;
        }

        let mut reverse = Vec::new();
        let mut cur = dst;
        while cur != src {
            reverse.push(cur);
            cur = *paths.backpointers.get(&cur)?;
        }
        reverse.reverse();
        Some(reverse)
    }

    fn stored_node_paths(&self, src: NodeId) -> Option<Arc<NodePaths>> {
        let PathsSource::Store { dir, cache } = &self.source else {
            return None;
        };
        let mut cache = match cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(paths) = cache.get(&src) {
            return Some(Arc::clone(paths));
        }

        let path = dir.join(format!("{}.sp", src.index()));
        let loaded = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<NodePathsFile>(&json) {
                Ok(file) => NodePaths::from_file(file),
                Err(err) => {
                    warn!("unreadable store file {path:?}: {err}");
                    NodePaths::default()
                }
            },
            // a missing file simply means nothing was reachable
            Err(_) => NodePaths::default(),
        };
        let loaded = Arc::new(loaded);
        cache.insert(src, Arc::clone(&loaded));
        debug!("loaded shortest paths for node {}", src.index());
        Some(loaded)
    }

    fn live_node_paths(&self, src: NodeId, dst: NodeId, max_distance: f64) -> NodePaths {
        let result = self.graph.shortest_path(
            src,
            ShortestPathParams {
                max_distance,
                stop_nodes: vec![dst],
            },
        );
        NodePaths::from_result(&result)
    }
}

/// Computes the bounded shortest-path tree of one source node.
pub fn compute_node_paths(graph: &Graph, node: NodeId) -> NodePaths {
    let result = graph.shortest_path(
        node,
        ShortestPathParams {
            max_distance: SP_PRECOMPUTE_DISTANCE,
            ..Default::default()
        },
    );
    NodePaths::from_result(&result)
}

/// Precomputes and persists the store for every node of the graph, one
/// JSON file per source under `<base>.sp/`, in parallel.
pub fn write_store(graph: &Graph, base: impl AsRef<Path>) -> Result<(), MetricError> {
    let dir = store_dir(base);
    fs::create_dir_all(&dir)?;

    graph
        .node_ids()
        .collect::<Vec<_>>()
        .into_par_iter()
        .try_for_each(|node| -> Result<(), MetricError> {
            let paths = compute_node_paths(graph, node);
            let json = serde_json::to_string(&paths.to_file())?;
            fs::write(dir.join(format!("{}.sp", node.index())), json)?;
            Ok(())
        })
}

fn store_dir(base: impl AsRef<Path>) -> PathBuf {
    let mut dir = base.as_ref().as_os_str().to_owned();
    dir.push(".sp");
    PathBuf::from(dir)
}
