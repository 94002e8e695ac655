//! Hidden-Markov map-matching.
//!
//! The decoder associates each observation of a trace with a hidden state,
//! an edge of the road graph, and recovers the most likely state sequence
//! with a Viterbi pass. Sparse traces are handled by applying extra
//! pure-transition steps between distant fixes, so the state chain can
//! move several edges without being penalized for unobserved emissions.

mod matcher;
mod model;

pub use matcher::{match_traces, MatchResult};
pub use model::TransitionTable;

use rustc_hash::FxHashMap;

use crate::graph::EdgeId;

pub const DEFAULT_GRANULARITY: f64 = 50.0;
pub const DEFAULT_SIGMA: f64 = 30.0;
pub const DEFAULT_START_TOLERANCE: f64 = 100.0;

/// Matcher configuration. Fields left at their [`Default`] values use the
/// documented constants.
#[derive(Clone, Debug)]
pub struct MatchOptions {
    /// Distance between consecutive observations above which extra
    /// pure-transition steps are applied, one per multiple.
    pub granularity: f64,

    /// Gaussian emission sigma, in the same units as the graph.
    pub sigma: f64,

    /// Candidate search tolerance for the initial distribution and the
    /// per-observation emission lookup.
    pub start_tolerance: f64,

    /// Worker pool size; `None` uses the global pool.
    pub workers: Option<usize>,

    /// Only accumulate edge hits, producing no per-observation output.
    pub hits_only: bool,

    /// Replaces the computed adjacency weights when set.
    pub edge_weights: Option<FxHashMap<EdgeId, f64>>,

    /// Legacy transition weighting: adjacency weights derived from the
    /// angle between edges, normalized so the average adjacent probability
    /// is at most 0.05 with cumulative non-self-loop mass capped at 0.4.
    /// Mass above the cap is silently discarded into an implicit absorbing
    /// state; the default mode instead uses constant weights and forbids
    /// U-turns.
    pub angle_mode: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions {
            granularity: DEFAULT_GRANULARITY,
            sigma: DEFAULT_SIGMA,
            start_tolerance: DEFAULT_START_TOLERANCE,
            workers: None,
            hits_only: false,
            edge_weights: None,
            angle_mode: false,
        }
    }
}
