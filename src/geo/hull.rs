use crate::geo::{Point, Polygon};

/// Convex hull via Andrew's monotone chain.
///
/// Points are sorted lexicographically by `(x, y)`; a negative cross
/// product pops the working stack, producing a counter-clockwise hull.
/// The duplicate closing vertex is excluded from the returned polygon.
pub fn convex_hull(points: &[Point]) -> Polygon {
    if points.is_empty() {
        return Polygon::default();
    }

    let mut points = points.to_vec();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let cross_product = |o: Point, a: Point, b: Point| (a - o).cross(b - o);

    let mut hull = vec![points[0]];

    // lower hull
    for &point in &points[1..] {
        while hull.len() > 1 && cross_product(hull[hull.len() - 2], hull[hull.len() - 1], point) < 0.0 {
            hull.pop();
        }
        hull.push(point);
    }

    // upper hull, growing past the lower chain
    let count0 = hull.len();
    for &point in points[..points.len() - 1].iter().rev() {
        while hull.len() > count0 && cross_product(hull[hull.len() - 2], hull[hull.len() - 1], point) < 0.0 {
            hull.pop();
        }
        hull.push(point);
    }

    hull.pop();
    Polygon::new(hull)
}
