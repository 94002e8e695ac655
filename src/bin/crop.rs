use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mapinfer::geo::{Point, Rectangle};
use mapinfer::graph::Graph;

/// Crops a graph to a rectangle, optionally converting coordinates from
/// longitude/latitude to meters around an origin first.
#[derive(Parser)]
struct Args {
    /// Input graph file.
    #[arg(long = "in")]
    input: std::path::PathBuf,

    /// Output graph file.
    #[arg(long = "out")]
    output: std::path::PathBuf,

    /// Crop rectangle as `x1,y1,x2,y2`.
    #[arg(long)]
    rect: String,

    /// Optional `lon,lat` origin; when given, the graph is converted to
    /// meters around it before cropping.
    #[arg(long)]
    origin: Option<String>,
}

fn parse_floats(value: &str, expected: usize) -> Result<Vec<f64>, String> {
    let fields = value
        .split(',')
        .map(|field| field.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("unparseable number in {value:?}: {err}"))?;
    if fields.len() != expected {
        return Err(format!("expected {expected} comma-separated numbers, got {value:?}"));
    }
    Ok(fields)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut graph = Graph::read(&args.input)?;
    graph.make_bidirectional();

    if let Some(origin) = &args.origin {
        let origin = parse_floats(origin, 2)?;
        graph.lon_lat_to_meters(Point::new(origin[0], origin[1]));
    }

    let rect = parse_floats(&args.rect, 4)?;
    let rect = Rectangle::rect(rect[0], rect[1], rect[2], rect[3]);

    let old_bounds = graph.bounds();
    let old_count = graph.edge_count();
    let cropped = graph.subgraph_in_rect(rect);
    println!(
        "cropped from bounds={:?}, count={} to bounds={:?}, count={}",
        old_bounds,
        old_count,
        cropped.bounds(),
        cropped.edge_count()
    );
    cropped.write(&args.output)?;
    Ok(())
}
