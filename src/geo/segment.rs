use crate::geo::{Boundable, Line, Point, Rectangle};

/// A directed closed segment from `start` to `end`.
///
/// A zero-length segment is valid; projecting onto it yields `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Segment {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Clamped scalar projection of `point` onto the segment.
    ///
    /// Returns `t` in `[0, 1]` when `normalized`, otherwise in
    /// `[0, length]`. Zero-length segments project everything to 0.
    pub fn project(&self, point: Point, normalized: bool) -> f64 {
        let l = self.length();
        if l == 0.0 {
            return 0.0;
        }
        let mut t = (point - self.start).dot(self.end - self.start) / l / l;
        t = t.clamp(0.0, 1.0);
        if !normalized {
            t *= l;
        }
        t
    }

    /// The closest point on the segment to `point`.
    pub fn project_point(&self, point: Point) -> Point {
        let t = self.project(point, true);
        self.point_at_factor(t, true)
    }

    /// The point at parameter `factor` along the segment. Zero-length
    /// segments return `start`.
    pub fn point_at_factor(&self, factor: f64, normalized: bool) -> Point {
        if self.length() == 0.0 {
            return self.start;
        }
        let factor = if normalized { factor } else { factor / self.length() };
        self.start + (self.end - self.start).scale(factor)
    }

    pub fn distance(&self, point: Point) -> f64 {
        self.project_point(point).distance(point)
    }

    pub fn vector(&self) -> Point {
        self.end - self.start
    }

    pub fn angle_to(&self, other: Segment) -> f64 {
        self.vector().angle_to(other.vector())
    }

    /// 2-D specialization of "On fast computation of distance between line
    /// segments" (V. Lumelsky). Degenerate segments reduce to
    /// point-to-segment or point-to-point distance.
    pub fn distance_to_segment(&self, other: Segment) -> f64 {
        let d1 = self.vector();
        let d2 = other.vector();
        let d12 = other.start - self.start;

        let r = d1.dot(d2);
        let s1 = d1.dot(d12);
        let s2 = d2.dot(d12);
        let mag1 = d1.dot(d1);
        let mag2 = d2.dot(d2);

        if mag1 == 0.0 && mag2 == 0.0 {
            return self.start.distance(other.start);
        } else if mag1 == 0.0 {
            return other.distance(self.start);
        } else if mag2 == 0.0 {
            return self.distance(other.start);
        }

        let denominator = mag1 * mag2 - r * r;
        let mut t = 0.0;
        if denominator != 0.0 {
            t = ((s1 * mag2 - s2 * r) / denominator).clamp(0.0, 1.0);
        }
        let mut u = (t * r - s2) / mag2;
        if u < 0.0 || u > 1.0 {
            u = u.clamp(0.0, 1.0);
            t = ((u * r + s1) / mag1).clamp(0.0, 1.0);
        }
        let dx = d1.x * t - d2.x * u - d12.x;
        let dy = d1.y * t - d2.y * u - d12.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn line(&self) -> Line {
        Line {
            a: self.start,
            b: self.end,
        }
    }

    /// Intersection point of two closed segments, if they cross.
    ///
    /// Collinear overlapping segments yield this segment's `start`;
    /// disjoint or parallel segments yield `None`.
    pub fn intersection(&self, other: Segment) -> Option<Point> {
        let d1 = self.vector();
        let d2 = other.vector();
        let d12 = other.start - self.start;

        let den = d1.y * d2.x - d1.x * d2.y;
        let u1 = d1.x * d12.y - d1.y * d12.x;
        let u2 = d2.x * d12.y - d2.y * d12.x;

        if den == 0.0 {
            // collinear
            if u1 == 0.0 && u2 == 0.0 {
                return Some(self.start);
            }
            return None;
        }

        if u1 / den < 0.0 || u1 / den > 1.0 || u2 / den < 0.0 || u2 / den > 1.0 {
            return None;
        }

        Some(self.point_at_factor(u2 / den, true))
    }

    /// Discretizes the segment at spacing `d`, always including both
    /// endpoints.
    pub fn sample(&self, d: f64) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut cur = self.start;
        while cur.distance(self.end) > d {
            let vector = self.end - cur;
            cur = cur + vector.scale(d / vector.magnitude());
            points.push(cur);
        }
        points.push(self.end);
        points
    }
}

impl Boundable for Segment {
    fn bounds(&self) -> Rectangle {
        self.start.rectangle().extend(self.end)
    }
}
