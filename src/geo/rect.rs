use crate::geo::{Boundable, Point, Polygon};

/// An axis-aligned bounding box with `min <= max` componentwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

impl Rectangle {
    /// The empty rectangle. Extending it over any point set yields the
    /// bounding box of that set; extending it over nothing leaves it empty.
    pub const EMPTY: Rectangle = Rectangle {
        min: Point::new(f64::INFINITY, f64::INFINITY),
        max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    pub const fn new(min: Point, max: Point) -> Rectangle {
        Rectangle { min, max }
    }

    pub const fn rect(sx: f64, sy: f64, ex: f64, ey: f64) -> Rectangle {
        Rectangle {
            min: Point::new(sx, sy),
            max: Point::new(ex, ey),
        }
    }

    pub fn extend(&self, point: Point) -> Rectangle {
        Rectangle {
            min: Point::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    pub fn extend_rect(&self, other: Rectangle) -> Rectangle {
        self.extend(other.min).extend(other.max)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn contains_rect(&self, other: Rectangle) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn lengths(&self) -> Point {
        self.max - self.min
    }

    /// Grows (or shrinks, for negative `tol`) the rectangle by `tol` on
    /// every side.
    pub fn add_tol(&self, tol: f64) -> Rectangle {
        Rectangle {
            min: Point::new(self.min.x - tol, self.min.y - tol),
            max: Point::new(self.max.x + tol, self.max.y + tol),
        }
    }

    pub fn intersects(&self, other: Rectangle) -> bool {
        self.max.y >= other.min.y
            && other.max.y >= self.min.y
            && self.max.x >= other.min.x
            && other.max.x >= self.min.x
    }

    pub fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }

    pub fn center(&self) -> Point {
        (self.min + self.max).scale(0.5)
    }

    /// Componentwise intersection, clamped so the result is never
    /// inverted: a disjoint pair collapses to a degenerate rectangle.
    pub fn intersection(&self, other: Rectangle) -> Rectangle {
        let mut intersection = Rectangle {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if intersection.max.x <= intersection.min.x {
            intersection.max.x = intersection.min.x;
        }
        if intersection.max.y <= intersection.min.y {
            intersection.max.y = intersection.min.y;
        }
        intersection
    }

    pub fn area(&self) -> f64 {
        (self.max.x - self.min.x) * (self.max.y - self.min.y)
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(vec![
            self.min,
            Point::new(self.min.x, self.max.y),
            self.max,
            Point::new(self.max.x, self.min.y),
        ])
    }
}

impl Boundable for Rectangle {
    fn bounds(&self) -> Rectangle {
        *self
    }
}
