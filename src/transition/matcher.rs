use log::{debug, info, warn};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use rustc_hash::FxHashMap;

use crate::graph::{EdgeId, EdgePos, Graph};
use crate::index::EdgeTree;
use crate::trace::Trace;
use crate::transition::model::emission_probs;
use crate::transition::{MatchOptions, TransitionTable};

/// Traces shorter than this are skipped outright.
const MIN_OBSERVATIONS: usize = 5;

/// Aggregated matcher output.
///
/// `edge_hits` counts unique edge traversals per edge across all matched
/// traces. `matched` holds, per trace index, one [`EdgePos`] per
/// observation in chronological order; it stays empty when
/// [`MatchOptions::hits_only`] is set. Skipped traces appear in neither.
#[derive(Debug, Default)]
pub struct MatchResult {
    pub edge_hits: FxHashMap<EdgeId, u64>,
    pub matched: FxHashMap<usize, Vec<EdgePos>>,
}

impl MatchResult {
    fn merge(mut self, other: MatchResult) -> MatchResult {
        for (edge, hits) in other.edge_hits {
            *self.edge_hits.entry(edge).or_default() += hits;
        }
        self.matched.extend(other.matched);
        self
    }
}

/// Map-matches every trace onto the road network.
///
/// Traces are decoded in parallel; each worker accumulates into its own
/// hit and output maps, merged once after all traces are consumed. The
/// graph, transition table and spatial index are shared read-only.
pub fn match_traces(traces: &[Trace], graph: &Graph, options: &MatchOptions) -> MatchResult {
    let transitions = TransitionTable::new(graph, options);
    let rtree = graph.rtree();

    info!("matching {} traces against {} edges", traces.len(), graph.edge_count());

    let decode = || {
        traces
            .par_iter()
            .enumerate()
            .fold(MatchResult::default, |mut acc, (trace_idx, trace)| {
                if let Some(edge_pos_list) =
                    match_trace(graph, &rtree, &transitions, trace, options, &mut acc.edge_hits)
                {
                    if !options.hits_only {
                        acc.matched.insert(trace_idx, edge_pos_list);
                    }
                }
                acc
            })
            .reduce(MatchResult::default, MatchResult::merge)
    };

    match options.workers {
        Some(workers) => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(&decode),
            Err(err) => {
                warn!("falling back to the global worker pool: {err}");
                decode()
            }
        },
        None => decode(),
    }
}

/// Decodes a single trace. Returns the per-observation positions in
/// chronological order, or `None` when the trace is skipped.
fn match_trace(
    graph: &Graph,
    rtree: &EdgeTree,
    transitions: &TransitionTable,
    trace: &Trace,
    options: &MatchOptions,
    edge_hits: &mut FxHashMap<EdgeId, u64>,
) -> Option<Vec<EdgePos>> {
    let observations = &trace.observations;
    if observations.len() < MIN_OBSERVATIONS {
        warn!("skipping trace: too few observations ({})", observations.len());
        return None;
    }

    // uniform initial distribution over nearby candidates
    let mut probs: FxHashMap<EdgeId, f64> = FxHashMap::default();
    for object in rtree.search(observations[0].point.rectangle_tol(options.start_tolerance)) {
        probs.insert(object.edge, 0.0);
    }

    let mut backpointers: Vec<Vec<FxHashMap<EdgeId, EdgeId>>> =
        vec![Vec::new(); observations.len()];

    for i in 1..observations.len() {
        let obs = &observations[i];

        // extra pure-transition steps for sparse observations
        let mut distance = obs.point.distance(observations[i - 1].point);
        while distance > options.granularity && options.granularity > 0.0 {
            let mut next_probs = FxHashMap::default();
            let mut next_backpointers = FxHashMap::default();
            for (&prev_edge, &prev_prob) in &probs {
                for &(next_edge, transition) in transitions.from_edge(prev_edge) {
                    let prob = prev_prob + transition.ln();
                    if next_probs.get(&next_edge).map_or(true, |&cur| prob > cur) {
                        next_probs.insert(next_edge, prob);
                        next_backpointers.insert(next_edge, prev_edge);
                    }
                }
            }
            backpointers[i].push(next_backpointers);
            probs = next_probs;
            distance -= options.granularity;
        }

        // transition+emission step, widening the tolerance while fewer
        // than two states survive
        let mut next_probs: FxHashMap<EdgeId, f64> = FxHashMap::default();
        let mut next_backpointers = FxHashMap::default();
        let mut factor = 1.0;
        while next_probs.len() < 2 && factor <= 4.0 {
            next_probs = FxHashMap::default();
            next_backpointers = FxHashMap::default();
            let emissions = emission_probs(
                graph,
                rtree,
                obs.point,
                options.start_tolerance * factor,
                options.sigma,
            );
            if factor > 1.0 {
                debug!("widened emission search to factor {factor} at observation {i}");
            }
            for (&prev_edge, &prev_prob) in &probs {
                for &(next_edge, transition) in transitions.from_edge(prev_edge) {
                    let Some(&emission) = emissions.get(&next_edge) else {
                        continue;
                    };
                    if emission == 0.0 {
                        continue;
                    }
                    let prob = prev_prob + transition.ln() + emission.ln();
                    if next_probs.get(&next_edge).map_or(true, |&cur| prob > cur) {
                        next_probs.insert(next_edge, prob);
                        next_backpointers.insert(next_edge, prev_edge);
                    }
                }
            }
            factor *= 2.0;
        }
        backpointers[i].push(next_backpointers);
        if next_probs.is_empty() {
            warn!("skipping trace: no emission candidates at observation {i}");
            return None;
        }
        probs = next_probs;
    }

    // pick the most likely final state
    let mut best_edge: Option<EdgeId> = None;
    for (&edge, &prob) in &probs {
        if best_edge.map_or(true, |best| prob > probs[&best]) {
            best_edge = Some(edge);
        }
    }
    let mut cur_edge = best_edge?;

    // walk observations in reverse, replaying each observation's
    // backpointer list backwards; a changed predecessor is one traversal
    let mut edge_pos_list = Vec::new();
    for i in (0..observations.len()).rev() {
        if !options.hits_only {
            let position = graph
                .edge_segment(cur_edge)
                .project(observations[i].point, false);
            edge_pos_list.push(EdgePos::new(cur_edge, position));
        }

        for pointers in backpointers[i].iter().rev() {
            let prev_edge = pointers.get(&cur_edge).copied().unwrap_or(cur_edge);
            if prev_edge != cur_edge {
                *edge_hits.entry(cur_edge).or_default() += 1;
                cur_edge = prev_edge;
            }
        }
    }
    // the chronologically first edge is a traversal too
    *edge_hits.entry(cur_edge).or_default() += 1;

    edge_pos_list.reverse();
    Some(edge_pos_list)
}
