use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mapinfer::graph::Graph;
use mapinfer::metric::write_store;

/// Precomputes the bounded shortest-path store of a graph, one JSON file
/// per source node under `<graph>.sp/`.
#[derive(Parser)]
struct Args {
    /// Graph file to index.
    graph: std::path::PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let graph = Graph::read(&args.graph)?;
    println!(
        "computing shortest paths for {} nodes of {}",
        graph.node_count(),
        args.graph.display()
    );

    write_store(&graph, &args.graph)?;
    println!("wrote {}.sp/", args.graph.display());
    Ok(())
}
