//! Spatial indexes over axis-aligned rectangles.
//!
//! [`GridIndex`] is a uniform grid keyed by integer cell; [`EdgeTree`] is
//! an R-tree over graph edge bounding boxes used by the map-matcher's
//! candidate search.

mod grid;
mod rtree;

pub use grid::GridIndex;
pub use rtree::{EdgeObject, EdgeTree};

#[cfg(test)]
mod test;
