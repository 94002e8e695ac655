use approx::assert_relative_eq;

use crate::geo::{convex_hull, rdp, Point, Rectangle, Segment};

#[test]
fn project_matches_distance() {
    let segment = Segment::new(Point::new(0.0, 0.0), Point::new(4.0, 0.0));
    for &p in &[
        Point::new(2.0, 3.0),
        Point::new(-1.0, 1.0),
        Point::new(5.0, -2.0),
        Point::new(4.0, 0.0),
    ] {
        let projected = segment.project_point(p);
        assert_relative_eq!(segment.distance(p), projected.distance(p));
        let t = segment.project(p, true);
        assert!((0.0..=1.0).contains(&t));
    }

    assert_relative_eq!(segment.project(Point::new(2.0, 3.0), false), 2.0);
    assert_relative_eq!(segment.project(Point::new(-5.0, 0.0), true), 0.0);
    assert_relative_eq!(segment.project(Point::new(9.0, 0.0), true), 1.0);
}

#[test]
fn zero_length_segment() {
    let degenerate = Segment::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
    assert_relative_eq!(degenerate.project(Point::new(5.0, 5.0), true), 0.0);
    assert_eq!(degenerate.project_point(Point::new(5.0, 5.0)), degenerate.start);
    assert_eq!(degenerate.point_at_factor(0.7, true), degenerate.start);
}

#[test]
fn segment_to_segment_distance() {
    let a = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
    let b = Segment::new(Point::new(0.0, 1.0), Point::new(2.0, 1.0));
    assert_relative_eq!(a.distance_to_segment(b), 1.0);
    assert_relative_eq!(b.distance_to_segment(a), 1.0);

    // crossing segments touch
    let c = Segment::new(Point::new(1.0, -1.0), Point::new(1.0, 1.0));
    assert_relative_eq!(a.distance_to_segment(c), 0.0);

    // sharing an endpoint
    let d = Segment::new(Point::new(2.0, 0.0), Point::new(3.0, 4.0));
    assert_relative_eq!(a.distance_to_segment(d), 0.0);

    // degenerate cases reduce to point distances
    let p = Segment::new(Point::new(0.0, 3.0), Point::new(0.0, 3.0));
    assert_relative_eq!(a.distance_to_segment(p), 3.0);
    assert_relative_eq!(p.distance_to_segment(a), 3.0);
    let q = Segment::new(Point::new(5.0, 0.0), Point::new(5.0, 0.0));
    assert_relative_eq!(p.distance_to_segment(q), p.start.distance(q.start));
}

#[test]
fn segment_intersection() {
    let a = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
    let b = Segment::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
    let hit = a.intersection(b).unwrap();
    assert_relative_eq!(hit.x, 1.0);
    assert_relative_eq!(hit.y, 1.0);

    // parallel, disjoint
    let c = Segment::new(Point::new(0.0, 1.0), Point::new(2.0, 3.0));
    assert!(a.intersection(c).is_none());

    // collinear overlap returns the first segment's start
    let d = Segment::new(Point::new(1.0, 1.0), Point::new(3.0, 3.0));
    assert_eq!(a.intersection(d), Some(a.start));

    // crossing outside the closed parameter range
    let e = Segment::new(Point::new(3.0, 4.0), Point::new(4.0, 3.0));
    assert!(a.intersection(e).is_none());
}

#[test]
fn rectangle_algebra() {
    let r = Rectangle::rect(0.0, 0.0, 4.0, 2.0);
    let other = Rectangle::rect(2.0, 1.0, 6.0, 5.0);
    let intersection = r.intersection(other);
    assert!(r.contains_rect(intersection));
    assert!(other.contains_rect(intersection));

    let grown = r.extend(Point::new(9.0, -1.0));
    assert!(grown.contains_rect(r));

    assert_eq!(Rectangle::EMPTY.extend(Point::new(3.0, 7.0)).min, Point::new(3.0, 7.0));
    assert_eq!(Rectangle::EMPTY.extend(Point::new(3.0, 7.0)).max, Point::new(3.0, 7.0));

    // disjoint intersection collapses rather than inverting
    let far = Rectangle::rect(10.0, 10.0, 11.0, 11.0);
    let collapsed = r.intersection(far);
    assert!(collapsed.min.x <= collapsed.max.x && collapsed.min.y <= collapsed.max.y);
    assert_relative_eq!(collapsed.area(), 0.0);
}

#[test]
fn polygon_contains() {
    let poly = Rectangle::rect(0.0, 0.0, 4.0, 4.0).to_polygon();
    assert!(poly.contains(Point::new(2.0, 2.0)));
    assert!(poly.contains(Point::new(0.5, 3.5)));
    assert!(!poly.contains(Point::new(5.0, 2.0)));
    assert!(!poly.contains(Point::new(-1.0, -1.0)));

    // points outside the rectangle are never inside its polygon
    for &p in &[
        Point::new(4.1, 4.1),
        Point::new(-0.1, 2.0),
        Point::new(2.0, 7.0),
    ] {
        assert!(!poly.contains(p));
    }

    assert_relative_eq!(poly.distance(Point::new(2.0, 2.0)), 0.0);
    assert_relative_eq!(poly.distance(Point::new(6.0, 2.0)), 2.0);
}

#[test]
fn hull_is_convex_and_covers_input() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
        Point::new(2.0, 2.0),
        Point::new(1.0, 3.0),
        Point::new(3.0, 1.0),
    ];
    let hull = convex_hull(&points);
    assert_eq!(hull.len(), 4);

    // all consecutive cross products share a sign
    let vertices = hull.points();
    let n = vertices.len();
    for i in 0..n {
        let o = vertices[i];
        let a = vertices[(i + 1) % n];
        let b = vertices[(i + 2) % n];
        assert!((a - o).cross(b - o) >= 0.0);
    }

    // every input point lies on or inside the hull
    for &p in &points {
        assert!(hull.distance(p) < 1e-9);
    }
}

#[test]
fn rdp_endpoints_and_detail() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.1),
        Point::new(2.0, -0.1),
        Point::new(3.0, 5.0),
        Point::new(4.0, 6.0),
        Point::new(5.0, 7.0),
        Point::new(6.0, 8.1),
        Point::new(7.0, 9.0),
        Point::new(8.0, 9.0),
        Point::new(9.0, 9.0),
    ];

    // infinite tolerance collapses to the endpoint chord
    let collapsed = rdp(&points, f64::INFINITY);
    assert_eq!(collapsed, vec![points[0], points[points.len() - 1]]);

    // zero tolerance keeps every non-collinear vertex
    let kept = rdp(&points, 0.0);
    for &p in &[points[1], points[2], points[3], points[6]] {
        assert!(kept.contains(&p));
    }
    // interior collinear vertices are dropped
    assert!(!kept.contains(&Point::new(8.0, 9.0)));

    let loose = rdp(&points, 1.0);
    assert_eq!(loose.first(), Some(&points[0]));
    assert_eq!(loose.last(), Some(&points[points.len() - 1]));
    assert!(loose.len() < points.len());
}

#[test]
fn lon_lat_round_trip() {
    let origin = Point::new(-87.6, 41.8);
    let p = Point::new(-87.61, 41.79);
    let meters = p.lon_lat_to_meters(origin);
    let back = meters.meters_to_lon_lat(origin);
    assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
    assert_relative_eq!(back.y, p.y, epsilon = 1e-9);

    // one degree of latitude is ~111km
    let north = Point::new(-87.6, 42.8).lon_lat_to_meters(origin);
    assert_relative_eq!(north.y, 111_111.0);
}
