//! Field-of-view cone and the visible part of straight edges.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use skirmish_core::constants::GEOMETRY_EPSILON;
use skirmish_core::types::Segment;

use crate::angle::{heading, wrap_angle};
use crate::intersect::{
    line_circle_intersections, point_on_segment, segment_intersection, SegmentIntersection,
};

/// Two chord points closer than this are the same point.
const DEDUP_DISTANCE: f64 = 1e-7;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// A viewer's field of view: `half_angle` either side of `orientation`, out to `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    pub origin: DVec2,
    pub orientation: f64,
    pub half_angle: f64,
    pub radius: f64,
}

impl VisionCone {
    pub fn new(origin: DVec2, orientation: f64, vision_angle: f64, radius: f64) -> Self {
        Self {
            origin,
            orientation,
            half_angle: vision_angle / 2.0,
            radius,
        }
    }

    /// Whether a viewer-relative direction lies within the aperture.
    pub fn contains_direction(&self, rel: DVec2) -> bool {
        let delta = wrap_angle(heading(rel) - self.orientation);
        delta.abs() <= self.half_angle
    }

    /// Whether a viewer-relative point lies within both radius and aperture.
    ///
    /// The viewer's own position has no direction and is never contained.
    pub fn contains_relative(&self, rel: DVec2) -> bool {
        let dist_sq = rel.length_squared();
        dist_sq > GEOMETRY_EPSILON
            && dist_sq <= self.radius * self.radius
            && self.contains_direction(rel)
    }

    /// Relative end of the boundary ray on the clockwise side.
    pub fn right_ray(&self) -> DVec2 {
        DVec2::from_angle(self.orientation - self.half_angle) * self.radius
    }

    /// Relative end of the boundary ray on the counter-clockwise side.
    pub fn left_ray(&self) -> DVec2 {
        DVec2::from_angle(self.orientation + self.half_angle) * self.radius
    }

    /// Conservative world-space bounding box of the cone.
    ///
    /// Covers the origin, both boundary ray ends, and each cardinal extremum of
    /// the circle that falls inside the aperture.
    pub fn aabb(&self) -> Aabb {
        let mut points = vec![self.origin, self.origin + self.left_ray(), self.origin + self.right_ray()];
        for cardinal in [0.0, FRAC_PI_2, PI, -FRAC_PI_2] {
            let dir = DVec2::from_angle(cardinal);
            if self.contains_direction(dir) {
                points.push(self.origin + dir * self.radius);
            }
        }
        // Non-empty by construction.
        Aabb::from_points(points).unwrap_or(Aabb {
            min: self.origin,
            max: self.origin,
        })
    }

    /// Part of a world-space edge the viewer can see, as a world-space chord.
    ///
    /// Candidate points are the edge endpoints inside the cone, crossings with
    /// the two boundary rays, and crossings with the vision circle that lie
    /// inside the aperture. The chord exists only when exactly two distinct
    /// candidates remain.
    pub fn visible_chord(&self, edge: &Segment) -> Option<Segment> {
        let rel = edge.relative_to(self.origin);
        let mut points: Vec<DVec2> = Vec::with_capacity(4);

        for endpoint in [rel.a, rel.b] {
            if self.contains_relative(endpoint) {
                push_distinct(&mut points, endpoint);
            }
        }

        for ray in [self.left_ray(), self.right_ray()] {
            if let SegmentIntersection::Point(p) = segment_intersection(DVec2::ZERO, ray, rel.a, rel.b) {
                if p.length_squared() > GEOMETRY_EPSILON {
                    push_distinct(&mut points, p);
                }
            }
        }

        for p in line_circle_intersections(rel.a, rel.b, DVec2::ZERO, self.radius) {
            if point_on_segment(p, rel.a, rel.b) && self.contains_direction(p) {
                push_distinct(&mut points, p);
            }
        }

        match points.as_slice() {
            [a, b] => Some(Segment::new(*a + self.origin, *b + self.origin)),
            _ => None,
        }
    }
}

fn push_distinct(points: &mut Vec<DVec2>, p: DVec2) {
    if points.iter().all(|q| q.distance(p) > DEDUP_DISTANCE) {
        points.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_cone(vision_angle: f64) -> VisionCone {
        VisionCone::new(DVec2::ZERO, 0.0, vision_angle, 10.0)
    }

    #[test]
    fn test_contains_direction_half_circle() {
        let cone = forward_cone(PI);
        assert!(cone.contains_direction(DVec2::new(1.0, 0.0)));
        assert!(cone.contains_direction(DVec2::new(0.0, 1.0)));
        assert!(cone.contains_direction(DVec2::new(0.0, -1.0)));
        assert!(!cone.contains_direction(DVec2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_contains_relative_respects_radius_and_origin() {
        let cone = forward_cone(PI);
        assert!(cone.contains_relative(DVec2::new(5.0, 0.0)));
        assert!(!cone.contains_relative(DVec2::new(11.0, 0.0)));
        assert!(!cone.contains_relative(DVec2::ZERO));
    }

    #[test]
    fn test_aabb_narrow_forward_cone() {
        let cone = forward_cone(FRAC_PI_2);
        let aabb = cone.aabb();
        let ray = 10.0 * (PI / 4.0).cos();
        assert!((aabb.min.x - 0.0).abs() < 1e-9);
        assert!((aabb.max.x - 10.0).abs() < 1e-9);
        assert!((aabb.max.y - ray).abs() < 1e-9);
        assert!((aabb.min.y + ray).abs() < 1e-9);
    }

    #[test]
    fn test_aabb_covers_rotated_cone() {
        let cone = VisionCone::new(DVec2::new(3.0, 4.0), PI, FRAC_PI_2, 10.0);
        let aabb = cone.aabb();
        assert!(aabb.contains(DVec2::new(-7.0, 4.0)));
        assert!(aabb.contains(DVec2::new(3.0, 4.0)));
        assert!(!aabb.contains(DVec2::new(4.0, 4.0)));
    }

    #[test]
    fn test_aabb_full_circle() {
        let aabb = forward_cone(2.0 * PI).aabb();
        assert!((aabb.min - DVec2::splat(-10.0)).length() < 1e-9);
        assert!((aabb.max - DVec2::splat(10.0)).length() < 1e-9);
    }

    #[test]
    fn test_chord_fully_inside() {
        let cone = forward_cone(PI);
        let edge = Segment::new(DVec2::new(5.0, -1.0), DVec2::new(5.0, 1.0));
        let chord = cone.visible_chord(&edge).unwrap();
        assert_eq!(chord, edge);
    }

    #[test]
    fn test_chord_clipped_by_circle() {
        let cone = forward_cone(PI);
        // Wall at x = 6 running far past the vision circle on both sides.
        let edge = Segment::new(DVec2::new(6.0, -20.0), DVec2::new(6.0, 20.0));
        let chord = cone.visible_chord(&edge).unwrap();
        assert!((chord.a - DVec2::new(6.0, -8.0)).length() < 1e-9);
        assert!((chord.b - DVec2::new(6.0, 8.0)).length() < 1e-9);
    }

    #[test]
    fn test_chord_clipped_by_boundary_ray() {
        let cone = forward_cone(FRAC_PI_2);
        // Horizontal edge crossing the left boundary ray at (3, 3).
        let edge = Segment::new(DVec2::new(5.0, 3.0), DVec2::new(-5.0, 3.0));
        let chord = cone.visible_chord(&edge).unwrap();
        let ends = [chord.a, chord.b];
        assert!(ends.iter().any(|p| (*p - DVec2::new(3.0, 3.0)).length() < 1e-9));
        assert!(ends.iter().any(|p| (*p - DVec2::new(5.0, 3.0)).length() < 1e-9));
    }

    #[test]
    fn test_chord_behind_viewer() {
        let cone = forward_cone(PI);
        let edge = Segment::new(DVec2::new(-5.0, -1.0), DVec2::new(-5.0, 1.0));
        assert!(cone.visible_chord(&edge).is_none());
    }

    #[test]
    fn test_chord_out_of_range() {
        let cone = forward_cone(PI);
        let edge = Segment::new(DVec2::new(50.0, -1.0), DVec2::new(50.0, 1.0));
        assert!(cone.visible_chord(&edge).is_none());
    }

    #[test]
    fn test_chord_world_space_offset() {
        let cone = VisionCone::new(DVec2::new(100.0, 100.0), 0.0, PI, 10.0);
        let edge = Segment::new(DVec2::new(105.0, 99.0), DVec2::new(105.0, 101.0));
        let chord = cone.visible_chord(&edge).unwrap();
        assert_eq!(chord, edge);
    }
}
