use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::graph::{Graph, NodeId, ShortestPathParams};
use crate::metric::store::NodePathsGraph;
use crate::metric::{closest_path, MetricError};

pub const SP_ITERATIONS: usize = 100;
pub const SP_RADIUS: f64 = 512.0;
pub const SP_MAX_DISTANCE: f64 = 2048.0;

/// Bound on the rejection-sampling loop in [`sample_path`]; tiny graphs
/// would otherwise spin forever.
const SAMPLE_ATTEMPTS: usize = 10_000;

/// How far inside the graph bounds sampled sources must lie, and the step
/// by which the inset is relaxed after every 50 rejections.
const SAMPLE_INSET: f64 = 512.0;
const SAMPLE_RELAX: f64 = 64.0;

#[derive(Clone, Debug)]
pub struct SpMetricOptions {
    pub iterations: usize,

    /// Edge radius for the closest-path search.
    pub radius: f64,

    /// Bound on the sampled shortest paths.
    pub max_distance: f64,

    /// Master seed; per-iteration generators derive from it, so seeded
    /// runs are reproducible regardless of worker scheduling.
    pub seed: Option<u64>,
}

impl Default for SpMetricOptions {
    fn default() -> Self {
        SpMetricOptions {
            iterations: SP_ITERATIONS,
            radius: SP_RADIUS,
            max_distance: SP_MAX_DISTANCE,
            seed: None,
        }
    }
}

/// One direction of the metric: mean and sample standard deviation of the
/// recorded Fréchet distances, and the fraction of trials that found any
/// matching path.
#[derive(Clone, Copy, Debug)]
pub struct SpMetricReport {
    pub average: f64,
    pub stddev: f64,
    pub coverage: f64,
}

/// Samples a random bounded shortest path: a source node uniformly inside
/// the inset graph bounds, then a uniform destination among the nodes its
/// bounded shortest-path tree settled.
///
/// The inset is relaxed stepwise when sampling keeps rejecting; if the
/// attempt budget runs out the graph has no sampleable node at all.
pub fn sample_path(
    graph: &Graph,
    max_distance: f64,
    rng: &mut impl Rng,
) -> Result<Vec<NodeId>, MetricError> {
    if graph.node_count() == 0 {
        return Err(MetricError::NoSampleableNode);
    }

    let mut bounds = graph.bounds().add_tol(-SAMPLE_INSET);
    for attempt in 0..SAMPLE_ATTEMPTS {
        if attempt > 0 && attempt % 50 == 0 {
            bounds = bounds.add_tol(SAMPLE_RELAX);
        }
        let node = NodeId::new(rng.gen_range(0..graph.node_count()));
        if graph.out_degree(node) == 0 || !bounds.contains(graph.point(node)) {
            continue;
        }

        let result = graph.shortest_path(
            node,
            ShortestPathParams {
                max_distance,
                ..Default::default()
            },
        );
        let dst_ids = result
            .backpointers
            .keys()
            .filter(|&&dst| !result.remaining.contains(&dst) && dst != node)
            .copied()
            .collect::<Vec<_>>();
        if dst_ids.is_empty() {
            continue;
        }

        let dst = dst_ids[rng.gen_range(0..dst_ids.len())];
        if let Some(path) = result.path_to(dst) {
            return Ok(path);
        }
    }

    Err(MetricError::NoSampleableNode)
}

/// Directional SP-metric from `a` to `b`.
///
/// Each trial samples a shortest path in `a` and searches `b` for the
/// closest path under the Fréchet distance; trials with no match within
/// the radius count against coverage. Trials run in parallel with
/// per-iteration seeded generators.
pub fn sp_metric(a: &NodePathsGraph, b: &NodePathsGraph, options: &SpMetricOptions) -> SpMetricReport {
    let master_seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("running {} SP-metric trials (seed {master_seed})", options.iterations);

    let trials = (0..options.iterations)
        .into_par_iter()
        .map(|iteration| {
            let mut rng = XorShiftRng::seed_from_u64(master_seed.wrapping_add(iteration as u64));

            let a_path = match sample_path(&a.graph, options.max_distance, &mut rng) {
                Ok(path) => path,
                Err(err) => {
                    warn!("trial {iteration}: {err}");
                    return None;
                }
            };
            let a_points = a_path
                .iter()
                .map(|&node| a.graph.point(node))
                .collect::<Vec<_>>();

            closest_path(b, &a_points, options.radius).map(|(_, distance)| distance)
        })
        .collect::<Vec<_>>();

    let distances = trials.iter().filter_map(|&d| d).collect::<Vec<_>>();
    let invalid = trials.len() - distances.len();

    let coverage = distances.len() as f64 / (distances.len() + invalid) as f64;
    let average = distances.iter().sum::<f64>() / distances.len() as f64;
    let stddev = if distances.len() > 1 {
        let sum_sq_err = distances
            .iter()
            .map(|d| (d - average) * (d - average))
            .sum::<f64>();
        (sum_sq_err / (distances.len() - 1) as f64).sqrt()
    } else {
        0.0
    };

    SpMetricReport {
        average,
        stddev,
        coverage,
    }
}
