//! OSM ingest: turns raw node/way records into per-region road graphs.
//!
//! Decoding `.osm.pbf` files is a collaborator's job; this module consumes
//! any re-scannable stream of [`OsmRecord`] values.

mod ingest;

pub use ingest::{ingest_regions, IngestOptions, RegionGraph};

use rustc_hash::FxHashMap;

use crate::geo::Point;

/// Highway values excluded from the road graph by default.
pub const HIGHWAY_BLACKLIST: [&str; 15] = [
    "pedestrian",
    "footway",
    "bridleway",
    "steps",
    "path",
    "sidewalk",
    "cycleway",
    "proposed",
    "construction",
    "bus_stop",
    "crossing",
    "elevator",
    "emergency_access_point",
    "escape",
    "give_way",
];

pub type Tags = FxHashMap<String, String>;

#[derive(Clone, Debug)]
pub struct OsmNode {
    pub id: i64,
    /// Longitude/latitude.
    pub point: Point,
    pub tags: Tags,
}

#[derive(Clone, Debug)]
pub struct OsmWay {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub tags: Tags,
}

#[derive(Clone, Debug)]
pub enum OsmRecord {
    Node(OsmNode),
    Way(OsmWay),
}

/// A stream of OSM records that can be scanned more than once.
///
/// Ingest makes two passes: one over nodes, one over ways.
pub trait OsmSource {
    fn scan(&self, f: &mut dyn FnMut(&OsmRecord));
}

impl OsmSource for [OsmRecord] {
    fn scan(&self, f: &mut dyn FnMut(&OsmRecord)) {
        for record in self {
            f(record);
        }
    }
}

impl OsmSource for Vec<OsmRecord> {
    fn scan(&self, f: &mut dyn FnMut(&OsmRecord)) {
        self.as_slice().scan(f)
    }
}

#[cfg(test)]
mod test;
