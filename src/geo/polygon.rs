use rand::Rng;

use crate::geo::{Boundable, Point, Rectangle, Segment};

/// An ordered sequence of vertices; the boundary closes from the last
/// vertex back to the first. The containment test assumes the polygon is
/// simple (non-self-intersecting).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon(pub Vec<Point>);

impl Polygon {
    pub fn new(points: Vec<Point>) -> Polygon {
        Polygon(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The boundary segments, including the closing edge.
    pub fn segments(&self) -> Vec<Segment> {
        (0..self.0.len())
            .map(|i| Segment::new(self.0[i], self.0[(i + 1) % self.0.len()]))
            .collect()
    }

    /// Ray-casting containment with a randomized ray origin.
    ///
    /// The ray origin is sampled from the bounding box padded by its
    /// diagonal magnitude, but outside the box padded by 1% of that
    /// magnitude; up to five retries pick a ray that stays clear of every
    /// vertex, avoiding vertex-grazing parity errors. An odd crossing
    /// count means the point is inside.
    pub fn contains(&self, p: Point) -> bool {
        let bounds = self.bounds();
        if !bounds.contains(p) {
            return false;
        }
        let segments = self.segments();
        let lengths = bounds.lengths();
        let magnitude = lengths.magnitude();
        let threshold = lengths.scale(0.01).magnitude();
        // small_bounds holds some padding, big_bounds holds more
        let small_bounds = bounds.add_tol(threshold);
        let big_bounds = bounds.add_tol(magnitude);

        let mut rng = rand::thread_rng();
        let mut sample_ray_start = || loop {
            let candidate = Point::new(
                big_bounds.lengths().x * rng.gen::<f64>(),
                big_bounds.lengths().y * rng.gen::<f64>(),
            ) + big_bounds.min;
            if !small_bounds.contains(candidate) {
                return candidate;
            }
        };

        let mut make_ray = || {
            let ray_start = sample_ray_start();
            let vector = (ray_start - p).scale(10.0 * magnitude / (ray_start - p).magnitude());
            // long enough to act as a ray within the bounds
            Segment::new(p, p + vector)
        };

        let mut ray = make_ray();
        for _ in 0..4 {
            if self.0.iter().all(|&vertex| ray.distance(vertex) >= threshold) {
                break;
            }
            ray = make_ray();
        }

        let count = segments
            .iter()
            .filter(|segment| segment.intersection(ray).is_some())
            .count();
        count % 2 == 1
    }

    /// Distance from `p` to the polygon: zero inside, otherwise the
    /// minimum distance to the boundary.
    pub fn distance(&self, p: Point) -> f64 {
        if self.contains(p) {
            return 0.0;
        }
        self.segments()
            .iter()
            .map(|segment| segment.distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// All intersection points between the boundary and `segment`.
    pub fn segment_intersections(&self, segment: Segment) -> Vec<Point> {
        self.segments()
            .iter()
            .filter_map(|poly_segment| poly_segment.intersection(segment))
            .collect()
    }
}

impl Boundable for Polygon {
    fn bounds(&self) -> Rectangle {
        self.0
            .iter()
            .fold(Rectangle::EMPTY, |rect, &p| rect.extend(p))
    }
}
