//! Segment and circle intersection tests.

use glam::DVec2;

use skirmish_core::constants::{GEOMETRY_EPSILON, POINT_ON_SEGMENT_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    None,
    Point(DVec2),
    /// The segments lie on the same line. Overlap is not resolved.
    Colinear,
}

/// Intersection of segments `p1-p2` and `q1-q2`, endpoints included.
pub fn segment_intersection(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> SegmentIntersection {
    let r = p2 - p1;
    let s = q2 - q1;
    let qp = q1 - p1;
    let denom = r.perp_dot(s);

    if denom.abs() < GEOMETRY_EPSILON {
        if qp.perp_dot(r).abs() < GEOMETRY_EPSILON {
            return SegmentIntersection::Colinear;
        }
        return SegmentIntersection::None;
    }

    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        SegmentIntersection::Point(p1 + r * t)
    } else {
        SegmentIntersection::None
    }
}

/// Points where the infinite line through `a` and `b` crosses the circle.
///
/// Returns zero, one (tangent) or two points, ordered from `a` towards `b`.
pub fn line_circle_intersections(a: DVec2, b: DVec2, center: DVec2, radius: f64) -> Vec<DVec2> {
    let d = b - a;
    let f = a - center;
    let qa = d.dot(d);
    if qa < GEOMETRY_EPSILON {
        return Vec::new();
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;
    let discriminant = qb * qb - 4.0 * qa * qc;

    if discriminant < 0.0 {
        Vec::new()
    } else if discriminant < GEOMETRY_EPSILON {
        vec![a + d * (-qb / (2.0 * qa))]
    } else {
        let root = discriminant.sqrt();
        let t1 = (-qb - root) / (2.0 * qa);
        let t2 = (-qb + root) / (2.0 * qa);
        vec![a + d * t1, a + d * t2]
    }
}

/// Whether `p` lies on segment `a-b`, within a small tolerance.
pub fn point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    (a.distance(p) + p.distance(b) - a.distance(b)).abs() < POINT_ON_SEGMENT_TOLERANCE
}
