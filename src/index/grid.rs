use itertools::iproduct;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::geo::Rectangle;

/// A uniform grid index from integer cell `(i, j) = (floor(x / cell),
/// floor(y / cell))` to the ids inserted over that cell.
///
/// Search returns a superset of the ids whose rectangles intersect the
/// query; callers must verify actual geometric overlap. Result order is
/// unspecified.
pub struct GridIndex {
    grid_size: f64,
    grid: FxHashMap<(i64, i64), Vec<usize>>,
}

impl GridIndex {
    pub fn new(grid_size: f64) -> GridIndex {
        GridIndex {
            grid_size,
            grid: FxHashMap::default(),
        }
    }

    fn cells(&self, rect: Rectangle) -> impl Iterator<Item = (i64, i64)> {
        let min_i = (rect.min.x / self.grid_size).floor() as i64;
        let max_i = (rect.max.x / self.grid_size).floor() as i64;
        let min_j = (rect.min.y / self.grid_size).floor() as i64;
        let max_j = (rect.max.y / self.grid_size).floor() as i64;
        iproduct!(min_i..=max_i, min_j..=max_j)
    }

    /// Appends `id` to every cell covered by `rect`. Duplicate insertions
    /// are collapsed at search time.
    pub fn insert(&mut self, id: usize, rect: Rectangle) {
        for cell in self.cells(rect) {
            self.grid.entry(cell).or_default().push(id);
        }
    }

    /// The deduplicated ids stored in any cell covered by `rect`.
    pub fn search(&self, rect: Rectangle) -> Vec<usize> {
        let mut ids = FxHashSet::default();
        for cell in self.cells(rect) {
            if let Some(entries) = self.grid.get(&cell) {
                ids.extend(entries.iter().copied());
            }
        }
        ids.into_iter().collect()
    }
}
