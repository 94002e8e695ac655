use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mapinfer::metric::{sp_metric, NodePathsGraph, SpMetricOptions};

/// Evaluates the SP-metric between two graphs, in both directions.
///
/// Each graph should have a precomputed shortest-path store next to it
/// (see compute-shortest-paths).
#[derive(Parser)]
struct Args {
    /// Ground-truth graph file.
    truth: std::path::PathBuf,

    /// Inferred graph file.
    inferred: std::path::PathBuf,

    /// Master seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    println!("reading truth graph");
    let truth = NodePathsGraph::open(&args.truth)?;
    println!("reading inferred graph");
    let inferred = NodePathsGraph::open(&args.inferred)?;

    let options = SpMetricOptions {
        seed: args.seed,
        ..Default::default()
    };

    println!("running metric");
    let forward = sp_metric(&truth, &inferred, &options);
    let backward = sp_metric(&inferred, &truth, &options);
    println!(
        "truth -> inferred: avg={:.0}, stddev={:.0}, coverage={:.1}",
        forward.average, forward.stddev, forward.coverage
    );
    println!(
        "inferred -> truth: avg={:.0}, stddev={:.0}, coverage={:.1}",
        backward.average, backward.stddev, backward.coverage
    );
    Ok(())
}
