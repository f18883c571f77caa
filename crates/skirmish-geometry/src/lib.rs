//! Planar geometry for the skirmish arena.
//!
//! Angle conventions, segment and circle intersections, and the vision cone
//! used by steering and perception. Everything here is pure and allocation-light.

pub use skirmish_core as core;

pub mod angle;
pub mod cone;
pub mod intersect;

pub use angle::{local_to_absolute, to_heading_frame, wrap_angle};
pub use cone::{Aabb, VisionCone};
pub use intersect::{
    line_circle_intersections, point_on_segment, segment_intersection, SegmentIntersection,
};
