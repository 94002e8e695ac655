use std::ops::{Add, Sub};

use crate::geo::{Boundable, Rectangle};

/// Meters per degree of latitude, and per degree of longitude at the
/// equator. Longitude spacing is scaled by `cos(latitude)` at the origin.
const METERS_PER_DEGREE: f64 = 111_111.0;

/// An ordered pair of planar coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Converts a longitude/latitude point into planar meters relative to
    /// `origin` (also longitude/latitude), using an equirectangular
    /// approximation pegged at the origin's latitude.
    pub fn lon_lat_to_meters(&self, origin: Point) -> Point {
        Point {
            x: METERS_PER_DEGREE * (origin.y * std::f64::consts::PI / 180.0).cos() * (self.x - origin.x),
            y: METERS_PER_DEGREE * (self.y - origin.y),
        }
    }

    /// Inverse of [`Point::lon_lat_to_meters`]; `origin` must be the same
    /// longitude/latitude point used for the forward conversion.
    pub fn meters_to_lon_lat(&self, origin: Point) -> Point {
        Point {
            x: self.x / METERS_PER_DEGREE / (origin.y * std::f64::consts::PI / 180.0).cos() + origin.x,
            y: self.y / METERS_PER_DEGREE + origin.y,
        }
    }

    /// Degenerate rectangle containing only this point.
    pub fn rectangle(&self) -> Rectangle {
        self.rectangle_tol(0.0)
    }

    /// Axis-aligned square of half-width `tol` centered on this point.
    pub fn rectangle_tol(&self, tol: f64) -> Rectangle {
        let t = Point::new(tol, tol);
        Rectangle {
            min: *self - t,
            max: *self + t,
        }
    }

    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn scale(&self, f: f64) -> Point {
        Point::new(f * self.x, f * self.y)
    }

    pub fn mul_pairwise(&self, other: Point) -> Point {
        Point::new(self.x * other.x, self.y * other.y)
    }

    /// Unsigned angle between two vectors, in `[0, pi]`.
    pub fn angle_to(&self, other: Point) -> f64 {
        let s = self.dot(other) / self.magnitude() / other.magnitude();
        s.clamp(-1.0, 1.0).acos()
    }

    pub fn signed_angle(&self, other: Point) -> f64 {
        other.y.atan2(other.x) - self.y.atan2(self.x)
    }

    /// The z-coordinate of the cross product, treating both vectors as
    /// lying on the z=0 plane.
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Boundable for Point {
    fn bounds(&self) -> Rectangle {
        self.rectangle()
    }
}

/// An infinite line through two distinct points.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    /// Unclamped projection of `point` onto the line.
    pub fn project_point(&self, point: Point) -> Point {
        let vector = self.b - self.a;
        let t = (point - self.a).dot(vector) / vector.magnitude() / vector.magnitude();
        self.a + vector.scale(t)
    }
}
