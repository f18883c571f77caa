//! Heading conventions.
//!
//! Angles are radians, counter-clockwise from +x. An agent-relative vector
//! uses +x as "straight ahead".

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Wrap any angle to the signed half circle `[-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +π to -π; keep +π for inputs that were exactly +π.
    if wrapped == -PI && angle > 0.0 {
        PI
    } else {
        wrapped
    }
}

/// Angle of a vector. Zero for the zero vector.
pub fn heading(v: DVec2) -> f64 {
    if v == DVec2::ZERO {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Rotate `v` by `angle` radians.
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

/// Express an absolute vector in the frame of something facing `orientation`.
pub fn to_heading_frame(v: DVec2, orientation: f64) -> DVec2 {
    rotate(v, -orientation)
}

/// Convert an agent-relative vector into an absolute one.
///
/// The relative angle is taken on the shortest path and, when `max_delta` is
/// given, clamped to `±max_delta` so a body never turns faster than allowed.
/// The magnitude is preserved.
pub fn local_to_absolute(orientation: f64, local: DVec2, max_delta: Option<f64>) -> DVec2 {
    let magnitude = local.length();
    let mut delta = wrap_angle(heading(local));
    if let Some(max) = max_delta {
        delta = delta.clamp(-max.abs(), max.abs());
    }
    DVec2::from_angle(wrap_angle(orientation + delta)) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn close(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI / 2.0) + FRAC_PI_2).abs() < EPS);
        assert!((wrap_angle(-3.0 * PI / 2.0) - FRAC_PI_2).abs() < EPS);
        assert!((wrap_angle(TAU) - 0.0).abs() < EPS);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), -PI);
        assert!((wrap_angle(0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_heading_of_zero_vector() {
        assert_eq!(heading(DVec2::ZERO), 0.0);
        assert!((heading(DVec2::new(0.0, 2.0)) - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_to_heading_frame() {
        // Something straight ahead of a viewer facing +y sits on the +x axis.
        let rel = to_heading_frame(DVec2::new(0.0, 3.0), FRAC_PI_2);
        assert!(close(rel, DVec2::new(3.0, 0.0)));
    }

    #[test]
    fn test_local_to_absolute_unclamped() {
        let abs = local_to_absolute(FRAC_PI_2, DVec2::new(2.0, 0.0), None);
        assert!(close(abs, DVec2::new(0.0, 2.0)));

        let abs = local_to_absolute(0.0, DVec2::new(0.0, 1.0), None);
        assert!(close(abs, DVec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_local_to_absolute_clamps_turn_rate() {
        let max = 0.1;
        let abs = local_to_absolute(0.0, DVec2::new(0.0, 1.0), Some(max));
        assert!((heading(abs) - max).abs() < EPS);
        assert!((abs.length() - 1.0).abs() < EPS);

        let abs = local_to_absolute(0.0, DVec2::new(0.0, -1.0), Some(max));
        assert!((heading(abs) + max).abs() < EPS);
    }

    #[test]
    fn test_local_to_absolute_wraps_across_pi() {
        // Facing just short of +π and turning further left must not spin the long way.
        let orientation = PI - 0.05;
        let abs = local_to_absolute(orientation, DVec2::from_angle(0.1), Some(0.2));
        assert!((heading(abs) - wrap_angle(orientation + 0.1)).abs() < EPS);
    }

    #[test]
    fn test_local_to_absolute_zero_vector() {
        assert_eq!(local_to_absolute(1.0, DVec2::ZERO, Some(0.1)), DVec2::ZERO);
    }
}
