use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::geo::{Point, Rectangle};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::osm::{OsmRecord, OsmSource, OsmWay, Tags, HIGHWAY_BLACKLIST};

/// Cells per degree in the coarse region lookup grid.
const REGION_INDEX_SCALE: f64 = 2.0;

/// Lane width defaults, in meters.
const SINGLE_LANE_WIDTH: f64 = 6.6;
const PER_LANE_WIDTH: f64 = 3.7;

#[derive(Clone, Debug, Default)]
pub struct IngestOptions {
    /// Honor oneway tags (and motorway/roundabout oneway defaults).
    /// Off, every way becomes bidirectional edge pairs.
    pub one_way: bool,

    /// Skip parking aisles and driveways.
    pub no_parking: bool,

    /// Skip tunnels (negative `layer` or `tunnel=yes`).
    pub no_tunnels: bool,

    /// Keep only motorway/trunk ways.
    pub only_motorways: bool,

    /// Also accept ways that carry a `railway` tag instead of `highway`.
    pub include_railway: bool,

    /// Replaces [`HIGHWAY_BLACKLIST`] when set.
    pub custom_blacklist: Option<Vec<String>>,

    // opt-in annotation tables, collected per region
    pub edge_widths: bool,
    pub layer_edges: bool,
    pub edge_tags: bool,
    pub node_tags: bool,
    pub motorway_edges: bool,
    pub tunnel_edges: bool,
}

/// One region's graph plus its opt-in annotation tables, keyed by the
/// generated edge/node ids.
#[derive(Debug, Default)]
pub struct RegionGraph {
    pub graph: Graph,
    pub edge_widths: FxHashMap<EdgeId, f64>,
    pub layer_edges: FxHashSet<EdgeId>,
    pub edge_tags: FxHashMap<EdgeId, Tags>,
    pub node_tags: FxHashMap<NodeId, Tags>,
    pub motorway_edges: FxHashSet<EdgeId>,
    pub tunnel_edges: FxHashSet<EdgeId>,
}

fn is_blacklisted(highway: &str, blacklist: &[String]) -> bool {
    blacklist.iter().any(|entry| entry == highway)
}

fn is_tunnel(tags: &Tags) -> bool {
    tags.get("layer").is_some_and(|layer| layer.starts_with('-'))
        || tags.get("tunnel").is_some_and(|tunnel| tunnel == "yes")
}

fn is_motorway(tags: &Tags) -> bool {
    tags.get("highway")
        .is_some_and(|highway| highway == "motorway" || highway == "trunk")
}

/// Oneway resolution: the explicit tag wins (some motorways carry
/// `oneway=no`), otherwise motorways and roundabouts default to forward.
fn oneway_direction(tags: &Tags) -> i8 {
    if let Some(oneway) = tags.get("oneway") {
        return match oneway.as_str() {
            "yes" | "1" => 1,
            "-1" => -1,
            _ => 0,
        };
    }
    let motorway = tags.get("highway").is_some_and(|h| h == "motorway");
    let roundabout = tags.get("junction").is_some_and(|j| j == "roundabout");
    if motorway || roundabout {
        1
    } else {
        0
    }
}

/// Road width from the way's tags: `lanes` first (one lane is wider than
/// its share, several lanes scale linearly), then the first numeric token
/// of `width`, then the single-lane default.
fn way_width(tags: &Tags) -> f64 {
    if let Some(val) = tags.get("lanes") {
        let lanes = val
            .split(';')
            .next()
            .unwrap_or_default()
            .parse::<f64>()
            .unwrap_or(0.0);
        return if lanes == 1.0 {
            SINGLE_LANE_WIDTH
        } else {
            lanes * PER_LANE_WIDTH
        };
    }
    if let Some(val) = tags.get("width") {
        return val
            .split(';')
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .parse::<f64>()
            .unwrap_or(0.0);
    }
    SINGLE_LANE_WIDTH
}

fn way_filtered(way: &OsmWay, options: &IngestOptions, blacklist: &[String]) -> bool {
    let highway = way.tags.get("highway");
    let accepted = match highway {
        Some(_) => true,
        None => options.include_railway && way.tags.contains_key("railway"),
    };
    if !accepted || is_blacklisted(highway.map(String::as_str).unwrap_or(""), blacklist) {
        return true;
    }
    if way.node_ids.len() < 2 {
        return true;
    }
    if options.no_parking {
        let amenity = way.tags.get("amenity").is_some_and(|v| v == "parking");
        let aisle = way.tags.get("service").is_some_and(|v| v == "parking_aisle");
        let driveway = way.tags.get("service").is_some_and(|v| v == "driveway");
        if amenity || aisle || driveway {
            return true;
        }
    }
    if options.no_tunnels && is_tunnel(&way.tags) {
        return true;
    }
    if options.only_motorways && !is_motorway(&way.tags) {
        return true;
    }
    false
}

/// Builds one graph per target region from a two-pass scan over the
/// source: nodes first (regions resolved through a coarse integer grid,
/// then the exact rectangle), ways second (filters, oneway resolution,
/// edges between consecutive in-region nodes). Regions are axis-aligned
/// longitude/latitude rectangles. Malformed ways are skipped silently.
pub fn ingest_regions(
    source: &impl OsmSource,
    regions: &[Rectangle],
    options: &IngestOptions,
) -> Vec<RegionGraph> {
    let mut outputs: Vec<RegionGraph> = regions.iter().map(|_| RegionGraph::default()).collect();
    let mut node_id_maps: Vec<FxHashMap<i64, NodeId>> =
        regions.iter().map(|_| FxHashMap::default()).collect();
    let mut node_region_map: FxHashMap<i64, Vec<usize>> = FxHashMap::default();

    // coarse grid over the cells the regions cover
    let mut region_index: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
    for (region_id, region) in regions.iter().enumerate() {
        let sx = (region.min.x * REGION_INDEX_SCALE) as i64;
        let sy = (region.min.y * REGION_INDEX_SCALE) as i64;
        let ex = (region.max.x * REGION_INDEX_SCALE) as i64;
        let ey = (region.max.y * REGION_INDEX_SCALE) as i64;
        for x in sx..=ex {
            for y in sy..=ey {
                region_index.entry((x, y)).or_default().push(region_id);
            }
        }
    }

    let mut node_count: u64 = 0;
    source.scan(&mut |record| {
        let node = match record {
            OsmRecord::Node(node) => node,
            OsmRecord::Way(_) => return,
        };
        let cell = (
            (node.point.x * REGION_INDEX_SCALE) as i64,
            (node.point.y * REGION_INDEX_SCALE) as i64,
        );
        if let Some(candidates) = region_index.get(&cell) {
            for &region_id in candidates {
                if !regions[region_id].contains(node.point) {
                    continue;
                }
                let vertex = outputs[region_id].graph.add_node(node.point);
                node_id_maps[region_id].insert(node.id, vertex);
                node_region_map.entry(node.id).or_default().push(region_id);
                if options.node_tags {
                    outputs[region_id].node_tags.insert(vertex, node.tags.clone());
                }
            }
        }
        node_count += 1;
        if node_count % 10_000_000 == 0 {
            debug!("scanned {}M nodes", node_count / 1_000_000);
        }
    });

    let default_blacklist = HIGHWAY_BLACKLIST
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let blacklist = options.custom_blacklist.as_ref().unwrap_or(&default_blacklist);

    let mut way_count: u64 = 0;
    source.scan(&mut |record| {
        let way = match record {
            OsmRecord::Way(way) => way,
            OsmRecord::Node(_) => return,
        };
        if way_filtered(way, options, blacklist) {
            return;
        }

        let tunnel = is_tunnel(&way.tags);
        let motorway = is_motorway(&way.tags);
        let oneway = if options.one_way { oneway_direction(&way.tags) } else { 0 };

        // edges between consecutive way nodes present in a region
        let mut way_edges: Vec<(usize, EdgeId)> = Vec::new();
        for pair in way.node_ids.windows(2) {
            let (last_id, cur_id) = (pair[0], pair[1]);
            let Some(region_ids) = node_region_map.get(&cur_id) else {
                continue;
            };
            for &region_id in region_ids {
                let node1 = node_id_maps[region_id].get(&last_id).copied();
                let node2 = node_id_maps[region_id].get(&cur_id).copied();
                let (Some(node1), Some(node2)) = (node1, node2) else {
                    continue;
                };
                let graph = &mut outputs[region_id].graph;
                match oneway {
                    0 => {
                        let [forward, reverse] = graph.add_bidirectional_edge(node1, node2);
                        way_edges.push((region_id, forward));
                        way_edges.push((region_id, reverse));
                    }
                    1 => way_edges.push((region_id, graph.add_edge(node1, node2))),
                    _ => way_edges.push((region_id, graph.add_edge(node2, node1))),
                }
            }
        }

        if options.edge_widths {
            let width = way_width(&way.tags);
            for &(region_id, edge) in &way_edges {
                outputs[region_id].edge_widths.insert(edge, width);
            }
        }
        if options.layer_edges && way.tags.contains_key("layer") {
            for &(region_id, edge) in &way_edges {
                outputs[region_id].layer_edges.insert(edge);
            }
        }
        if options.edge_tags {
            for &(region_id, edge) in &way_edges {
                outputs[region_id].edge_tags.insert(edge, way.tags.clone());
            }
        }
        if options.motorway_edges && motorway {
            for &(region_id, edge) in &way_edges {
                outputs[region_id].motorway_edges.insert(edge);
            }
        }
        if options.tunnel_edges && tunnel {
            for &(region_id, edge) in &way_edges {
                outputs[region_id].tunnel_edges.insert(edge);
            }
        }

        way_count += 1;
        if way_count % 100_000 == 0 {
            debug!("scanned {}K ways", way_count / 1_000);
        }
    });

    info!(
        "ingested {} regions: {} nodes, {} ways accepted",
        regions.len(),
        node_count,
        way_count
    );
    outputs
}
