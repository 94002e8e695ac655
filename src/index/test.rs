use crate::geo::{Point, Rectangle};
use crate::index::GridIndex;

#[test]
fn grid_search_is_superset() {
    let mut index = GridIndex::new(10.0);
    let rects = vec![
        (0, Rectangle::rect(1.0, 1.0, 4.0, 4.0)),
        (1, Rectangle::rect(15.0, 15.0, 18.0, 22.0)),
        (2, Rectangle::rect(-5.0, -5.0, 2.0, 2.0)),
        (3, Rectangle::rect(40.0, 40.0, 41.0, 41.0)),
    ];
    for &(id, rect) in &rects {
        index.insert(id, rect);
    }

    let query = Rectangle::rect(0.0, 0.0, 16.0, 16.0);
    let found = index.search(query);
    for &(id, rect) in &rects {
        if rect.intersects(query) {
            assert!(found.contains(&id), "id {id} missing from search result");
        }
    }
    assert!(!found.contains(&3));
}

#[test]
fn grid_search_deduplicates() {
    let mut index = GridIndex::new(1.0);
    // spans many cells, and is inserted twice
    let rect = Rectangle::rect(0.0, 0.0, 5.0, 5.0);
    index.insert(7, rect);
    index.insert(7, rect);

    let found = index.search(rect);
    assert_eq!(found, vec![7]);
}

#[test]
fn grid_handles_negative_coordinates() {
    let mut index = GridIndex::new(10.0);
    index.insert(0, Rectangle::rect(-25.0, -25.0, -21.0, -21.0));
    let found = index.search(Point::new(-24.0, -24.0).rectangle_tol(1.0));
    assert_eq!(found, vec![0]);
    assert!(index.search(Rectangle::rect(0.0, 0.0, 5.0, 5.0)).is_empty());
}
