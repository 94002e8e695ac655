use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::geo::Point;
use crate::graph::{Graph, NodeId};
use crate::metric::{
    closest_path, frechet_distance, sample_path, sp_metric, write_store, NodePathsGraph,
    SpMetricOptions,
};

fn points(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn frechet_distance_known_values() {
    let f = |a: &[(f64, f64)], b: &[(f64, f64)], expected: f64| {
        assert_relative_eq!(
            frechet_distance(&points(a), &points(b)),
            expected,
            epsilon = 0.001
        );
    };

    // single points
    f(&[(1.0, 1.0)], &[(1.0, 1.0)], 0.0);
    f(&[(1.0, 1.0)], &[(3.0, 1.0)], 2.0);

    // loop path against single points
    let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];
    f(&square, &[(0.0, 0.0)], 2.0_f64.sqrt());
    f(&square, &[(0.5, 0.5)], 2.0_f64.sqrt() / 2.0);

    // a direct path and one with a square detour
    let direct = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0)];
    let detour = [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (2.0, 2.0),
        (2.0, 1.0),
    ];
    f(&direct, &direct, 0.0);
    f(&direct, &detour, 1.0);
    f(&detour, &direct, 1.0);

    // one path loops back on itself
    let straight = [(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)];
    let loop_back = [(0.0, 0.0), (4.0, 0.0), (0.0, 0.0), (4.0, 0.0)];
    f(&loop_back, &loop_back, 0.0);
    f(&straight, &loop_back, 2.0);
}

#[test]
fn frechet_distance_is_symmetric() {
    let a = points(&[(0.0, 0.0), (1.0, 2.0), (3.0, 1.0), (4.0, 4.0)]);
    let b = points(&[(0.5, 0.0), (2.0, 2.0), (4.0, 3.0)]);
    assert_relative_eq!(frechet_distance(&a, &b), frechet_distance(&b, &a));
    assert_relative_eq!(frechet_distance(&a, &a), 0.0);

    // lower bound: every vertex of a must come within the distance of b
    let lower = a
        .iter()
        .map(|p| {
            b.iter()
                .map(|q| p.distance(*q))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max);
    assert!(frechet_distance(&a, &b) >= lower);
}

/// The six-node ladder graph used by the closest-path scenarios.
fn ladder() -> (Graph, [NodeId; 6]) {
    let mut graph = Graph::new();
    let v11 = graph.add_node(Point::new(1.0, 1.0));
    let v12 = graph.add_node(Point::new(1.0, 2.0));
    let v31 = graph.add_node(Point::new(3.0, 1.0));
    let v32 = graph.add_node(Point::new(3.0, 2.0));
    let v51 = graph.add_node(Point::new(5.0, 1.0));
    let v52 = graph.add_node(Point::new(5.0, 2.0));
    graph.add_bidirectional_edge(v11, v12);
    graph.add_bidirectional_edge(v11, v31);
    graph.add_bidirectional_edge(v31, v32);
    graph.add_bidirectional_edge(v31, v51);
    graph.add_bidirectional_edge(v32, v52);
    graph.add_bidirectional_edge(v51, v52);
    (graph, [v11, v12, v31, v32, v51, v52])
}

fn closest_path_nodes(
    graph: &NodePathsGraph,
    input: &[Point],
    radius: f64,
) -> (Vec<NodeId>, f64) {
    let (path, distance) = closest_path(graph, input, radius).unwrap();
    let mut nodes = vec![graph.graph.edge_src(path.start.edge)];
    nodes.extend(path.path.iter().copied());
    nodes.push(graph.graph.edge_dst(path.end.edge));
    (nodes, distance)
}

#[test]
fn closest_path_straight_input() {
    let (graph, [v11, v12, v31, v32, _, _]) = ladder();
    let graph = NodePathsGraph::live(graph);

    let (nodes, distance) =
        closest_path_nodes(&graph, &points(&[(1.0, 2.0), (3.0, 2.0)]), 10.0);
    assert_eq!(nodes, vec![v12, v11, v31, v32]);
    assert_relative_eq!(distance, 1.0, epsilon = 0.001);
}

#[test]
fn closest_path_noisy_input() {
    let (graph, [v11, v12, v31, v32, _, _]) = ladder();
    let graph = NodePathsGraph::live(graph);

    let input = points(&[(0.8, 2.2), (0.8, 0.8), (3.2, 0.8), (2.8, 2.2)]);
    let (nodes, distance) = closest_path_nodes(&graph, &input, 10.0);
    assert_eq!(nodes, vec![v12, v11, v31, v32]);
    assert_relative_eq!(distance, 2.0_f64.sqrt() / 5.0, epsilon = 0.001);
}

#[test]
fn closest_path_respects_radius() {
    let (graph, _) = ladder();
    let graph = NodePathsGraph::live(graph);

    // far away from every edge
    assert!(closest_path(&graph, &points(&[(50.0, 50.0), (52.0, 50.0)]), 10.0).is_none());
}

/// Chain of three 1000m edges; the middle of the graph is reachable from
/// the ends only beyond the precompute cutoff.
fn long_chain() -> (Graph, [NodeId; 4]) {
    let mut graph = Graph::new();
    let a = graph.add_node(Point::new(0.0, 0.0));
    let b = graph.add_node(Point::new(1000.0, 0.0));
    let c = graph.add_node(Point::new(2000.0, 0.0));
    let d = graph.add_node(Point::new(3000.0, 0.0));
    graph.add_bidirectional_edge(a, b);
    graph.add_bidirectional_edge(b, c);
    graph.add_bidirectional_edge(c, d);
    (graph, [a, b, c, d])
}

#[test]
fn store_round_trip() {
    let (graph, [a, b, c, _]) = long_chain();
    let base = std::env::temp_dir().join(format!("mapinfer-store-{}.graph", std::process::id()));
    graph.write(&base).unwrap();
    write_store(&graph, &base).unwrap();

    let stored = NodePathsGraph::open(&base).unwrap();

    // b is 1000m out: settled under the 1600m cutoff
    assert_eq!(stored.get_shortest_path(a, b, 1600.0), Some(vec![b]));
    // c is 2000m out: on the pruned frontier, omitted from the store
    assert_eq!(stored.get_shortest_path(a, c, 1600.0), None);
    // within the store but beyond the query budget
    assert_eq!(stored.get_shortest_path(a, b, 500.0), None);

    // the live fallback agrees where the store has answers
    let live = NodePathsGraph::live(stored.graph.clone());
    assert_eq!(live.get_shortest_path(a, b, 1600.0), Some(vec![b]));
    assert_eq!(live.get_shortest_path(a, c, 1600.0), None);

    // on-disk format: JSON objects keyed by stringified node ids
    let json = std::fs::read_to_string(
        std::path::PathBuf::from(format!("{}.sp", base.display())).join("0.sp"),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["backpointers"].get("1").is_some());
    assert!(value["distances"].get("1").is_some());
    assert!(value["backpointers"].get("2").is_none());

    let dir = std::path::PathBuf::from(format!("{}.sp", base.display()));
    std::fs::remove_dir_all(dir).ok();
    std::fs::remove_file(base).ok();
}

#[test]
fn sample_path_is_reproducible() {
    let (graph, _) = long_chain();

    let mut rng = XorShiftRng::seed_from_u64(42);
    let first = sample_path(&graph, 2048.0, &mut rng).unwrap();
    assert!(first.len() >= 2);

    let mut rng = XorShiftRng::seed_from_u64(42);
    let second = sample_path(&graph, 2048.0, &mut rng).unwrap();
    assert_eq!(first, second);
}

#[test]
fn sp_metric_identical_graphs() {
    let (graph, _) = long_chain();
    let a = NodePathsGraph::live(graph.clone());
    let b = NodePathsGraph::live(graph);

    let options = SpMetricOptions {
        iterations: 20,
        seed: Some(7),
        ..Default::default()
    };
    let report = sp_metric(&a, &b, &options);

    // a graph matched against itself is a perfect fit
    assert_relative_eq!(report.coverage, 1.0);
    assert!(report.average < 1e-6);
    assert!(report.stddev < 1e-6);
}
