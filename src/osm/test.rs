use rustc_hash::FxHashMap;

use crate::geo::{Point, Rectangle};
use crate::osm::{ingest_regions, IngestOptions, OsmNode, OsmRecord, OsmWay, Tags};

fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect::<FxHashMap<_, _>>()
}

fn node(id: i64, x: f64, y: f64) -> OsmRecord {
    OsmRecord::Node(OsmNode {
        id,
        point: Point::new(x, y),
        tags: Tags::default(),
    })
}

fn way(id: i64, node_ids: &[i64], t: Tags) -> OsmRecord {
    OsmRecord::Way(OsmWay {
        id,
        node_ids: node_ids.to_vec(),
        tags: t,
    })
}

fn region() -> Rectangle {
    Rectangle::rect(-87.7, 41.7, -87.5, 41.9)
}

fn chicago_nodes() -> Vec<OsmRecord> {
    vec![
        node(100, -87.62, 41.80),
        node(101, -87.63, 41.81),
        node(102, -87.64, 41.82),
        // outside the region
        node(103, -87.0, 41.0),
    ]
}

#[test]
fn residential_way_becomes_bidirectional_edges() {
    let mut records = chicago_nodes();
    records.push(way(1, &[100, 101, 102], tags(&[("highway", "residential")])));

    let regions = ingest_regions(&records, &[region()], &IngestOptions::default());
    let graph = &regions[0].graph;
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 4);
    assert!(graph.is_bidirectional());
}

#[test]
fn blacklisted_and_short_ways_are_skipped() {
    let mut records = chicago_nodes();
    records.push(way(1, &[100, 101], tags(&[("highway", "footway")])));
    records.push(way(2, &[100], tags(&[("highway", "residential")])));
    records.push(way(3, &[100, 101], tags(&[("building", "yes")])));

    let regions = ingest_regions(&records, &[region()], &IngestOptions::default());
    assert_eq!(regions[0].graph.edge_count(), 0);
}

#[test]
fn oneway_resolution() {
    let opts = IngestOptions {
        one_way: true,
        ..Default::default()
    };

    // explicit forward
    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "residential"), ("oneway", "yes")]),
    ));
    let regions = ingest_regions(&records, &[region()], &opts);
    assert_eq!(regions[0].graph.edge_count(), 1);

    // explicit reverse emits the edge backwards
    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "residential"), ("oneway", "-1")]),
    ));
    let regions = ingest_regions(&records, &[region()], &opts);
    let graph = &regions[0].graph;
    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edge_ids().next().unwrap();
    assert_eq!(graph.point(graph.edge_src(edge)), Point::new(-87.63, 41.81));

    // motorway defaults to oneway, but an explicit tag overrides it
    let mut records = chicago_nodes();
    records.push(way(1, &[100, 101], tags(&[("highway", "motorway")])));
    let regions = ingest_regions(&records, &[region()], &opts);
    assert_eq!(regions[0].graph.edge_count(), 1);

    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "motorway"), ("oneway", "no")]),
    ));
    let regions = ingest_regions(&records, &[region()], &opts);
    assert_eq!(regions[0].graph.edge_count(), 2);
}

#[test]
fn tunnel_and_motorway_filters() {
    let opts = IngestOptions {
        no_tunnels: true,
        only_motorways: true,
        ..Default::default()
    };

    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "motorway"), ("tunnel", "yes")]),
    ));
    records.push(way(2, &[100, 101], tags(&[("highway", "residential")])));
    records.push(way(3, &[101, 102], tags(&[("highway", "trunk")])));

    let regions = ingest_regions(&records, &[region()], &opts);
    // only the trunk way survives
    assert_eq!(regions[0].graph.edge_count(), 2);
}

#[test]
fn annotation_tables() {
    let opts = IngestOptions {
        edge_widths: true,
        edge_tags: true,
        node_tags: true,
        motorway_edges: true,
        tunnel_edges: true,
        layer_edges: true,
        ..Default::default()
    };

    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "motorway"), ("lanes", "3"), ("layer", "1")]),
    ));
    records.push(way(
        2,
        &[101, 102],
        tags(&[("highway", "residential"), ("width", "8.5 m")]),
    ));

    let regions = ingest_regions(&records, &[region()], &opts);
    let region_graph = &regions[0];
    assert_eq!(region_graph.graph.edge_count(), 4);

    // motorway: 3 lanes at 3.7m each
    let motorway_widths = region_graph
        .motorway_edges
        .iter()
        .map(|edge| region_graph.edge_widths[edge])
        .collect::<Vec<_>>();
    assert_eq!(motorway_widths.len(), 2);
    assert!(motorway_widths.iter().all(|&w| (w - 11.1).abs() < 1e-9));

    // width tag: first numeric token wins
    let other_widths = region_graph
        .edge_widths
        .values()
        .filter(|&&w| (w - 8.5).abs() < 1e-9)
        .count();
    assert_eq!(other_widths, 2);

    assert_eq!(region_graph.layer_edges.len(), 2);
    assert!(region_graph.tunnel_edges.is_empty());
    assert_eq!(region_graph.edge_tags.len(), 4);
    assert_eq!(region_graph.node_tags.len(), 3);
}

#[test]
fn single_lane_width_default() {
    let opts = IngestOptions {
        edge_widths: true,
        ..Default::default()
    };

    let mut records = chicago_nodes();
    records.push(way(
        1,
        &[100, 101],
        tags(&[("highway", "residential"), ("lanes", "1")]),
    ));
    records.push(way(2, &[101, 102], tags(&[("highway", "residential")])));

    let regions = ingest_regions(&records, &[region()], &opts);
    // both the one-lane way and the untagged way default to 6.6m
    assert!(regions[0].edge_widths.values().all(|&w| (w - 6.6).abs() < 1e-9));
    assert_eq!(regions[0].edge_widths.len(), 4);
}

#[test]
fn nodes_split_across_regions() {
    let east = Rectangle::rect(-87.65, 41.7, -87.5, 41.9);
    let west = Rectangle::rect(-87.7, 41.7, -87.63, 41.9);

    let mut records = chicago_nodes();
    records.push(way(1, &[100, 101, 102], tags(&[("highway", "residential")])));

    let regions = ingest_regions(&records, &[east, west], &IngestOptions::default());
    // east holds nodes 100, 101, 102; west holds 101 and 102
    assert_eq!(regions[0].graph.node_count(), 3);
    assert_eq!(regions[1].graph.node_count(), 2);
    // west only gets the 101-102 edge pair
    assert_eq!(regions[0].graph.edge_count(), 4);
    assert_eq!(regions[1].graph.edge_count(), 2);
}
