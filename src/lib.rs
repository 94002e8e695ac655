//! Geometric and graph-algorithmic core for inferring and evaluating
//! road-network maps from GPS traces and OpenStreetMap data.
//!
//! Two subsystems do the heavy lifting: a hidden-Markov [map-matcher]
//! projecting noisy GPS traces onto a directed road graph, and a
//! [shortest-path similarity metric] quantifying how closely one road
//! graph approximates another. They share a road [graph] with
//! junction-aware road-segment extraction, [spatial indexes] over edge
//! bounding boxes, and a small planar [geometry] kernel.
//!
//! [map-matcher]: transition
//! [shortest-path similarity metric]: metric
//! [graph]: graph
//! [spatial indexes]: index
//! [geometry]: geo

pub mod geo;
pub mod graph;
pub mod index;
pub mod metric;
pub mod osm;
pub mod trace;
pub mod transition;

#[doc(inline)]
pub use geo::{Point, Rectangle, Segment};
#[doc(inline)]
pub use graph::{EdgeId, EdgePos, Graph, NodeId};
#[doc(inline)]
pub use metric::{closest_path, frechet_distance, sp_metric, NodePathsGraph};
#[doc(inline)]
pub use trace::{Observation, Trace};
#[doc(inline)]
pub use transition::{match_traces, MatchOptions, MatchResult};
