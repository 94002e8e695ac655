//! Shortest-path similarity metric between two road graphs.
//!
//! The SP-metric samples random shortest paths in one graph and finds, for
//! each, the path in the other graph minimizing the discrete Fréchet
//! distance. The mean and spread of those distances, together with the
//! fraction of samples that found any match at all, quantify how closely
//! one map approximates the other.

mod closest;
mod error;
mod frechet;
mod sp;
mod store;

pub use closest::{closest_path, GraphPath};
pub use error::MetricError;
pub use frechet::frechet_distance;
pub use sp::{sample_path, sp_metric, SpMetricOptions, SpMetricReport};
pub use store::{compute_node_paths, write_store, NodePaths, NodePathsGraph, SP_PRECOMPUTE_DISTANCE};

#[cfg(test)]
mod test;
