use crate::geo::{Point, Segment};

/// Ramer-Douglas-Peucker polyline simplification.
///
/// Splits at the vertex farthest from the endpoint chord whenever that
/// distance reaches `epsilon`, sharing the pivot between the two halves;
/// otherwise collapses the run to its endpoints.
pub fn rdp(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let segment = Segment::new(points[0], points[points.len() - 1]);
    let mut dmax: f64 = 0.0;
    let mut index = 0;
    for (i, &point) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = segment.distance(point);
        if d > dmax {
            index = i;
            dmax = d;
        }
    }

    if dmax >= epsilon && index > 0 {
        let mut prefix = rdp(&points[..=index], epsilon);
        let suffix = rdp(&points[index..], epsilon);
        prefix.pop();
        prefix.extend(suffix);
        prefix
    } else {
        vec![points[0], points[points.len() - 1]]
    }
}
