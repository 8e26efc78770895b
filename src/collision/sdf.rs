//! Signed distance helpers for round and thin shapes
//!
//! Negative inside, zero on the surface, positive outside.

use crate::geom::Vector;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vector, center: Vector, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box given by center and half extents
pub fn sd_box(p: Vector, center: Vector, half: Vector) -> f32 {
    let q = (p - center).abs() - half;
    q.max(Vector::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Signed distance to an infinite band of `thickness` around a line
/// through `origin` with unit `normal`
#[inline]
pub fn sd_band(p: Vector, origin: Vector, normal: Vector, thickness: f32) -> f32 {
    (p - origin).dot(normal).abs() - thickness * 0.5
}

/// Whether a disc of `radius` at `p` overlaps the shape described by `sdf`.
///
/// The boundary is exclusive: a disc exactly touching the surface does not
/// overlap, and a zero-radius disc is a point that must be strictly inside.
#[inline]
pub fn disc_overlaps<F>(p: Vector, radius: f32, sdf: F) -> bool
where
    F: Fn(Vector) -> f32,
{
    sdf(p) < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_circle() {
        assert_eq!(sd_circle(Vector::new(10.0, 0.0), Vector::ZERO, 5.0), 5.0);
        assert_eq!(sd_circle(Vector::ZERO, Vector::ZERO, 5.0), -5.0);
    }

    #[test]
    fn test_sd_box() {
        let c = Vector::ZERO;
        let half = Vector::new(10.0, 5.0);
        assert_eq!(sd_box(Vector::new(13.0, 0.0), c, half), 3.0);
        assert_eq!(sd_box(Vector::new(13.0, 9.0), c, half), 5.0);
        assert_eq!(sd_box(Vector::ZERO, c, half), -5.0);
        assert_eq!(sd_box(Vector::new(10.0, 0.0), c, half), 0.0);
    }

    #[test]
    fn test_sd_band() {
        let n = Vector::new(0.0, 1.0);
        assert_eq!(sd_band(Vector::new(100.0, 4.0), Vector::ZERO, n, 2.0), 3.0);
        assert_eq!(sd_band(Vector::new(-3.0, -0.5), Vector::ZERO, n, 2.0), -0.5);
    }

    #[test]
    fn test_disc_overlaps_boundary_exclusive() {
        let circle = |p| sd_circle(p, Vector::ZERO, 5.0);
        assert!(disc_overlaps(Vector::new(9.0, 0.0), 5.0, circle));
        assert!(!disc_overlaps(Vector::new(10.0, 0.0), 5.0, circle));
        assert!(disc_overlaps(Vector::new(1.0, 0.0), 0.0, circle));
        assert!(!disc_overlaps(Vector::new(5.0, 0.0), 0.0, circle));
    }
}
