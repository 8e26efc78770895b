//! Line hitbox geometry
//!
//! A line hitbox is an infinite line with a thickness, so it behaves as a
//! band. Lines only report boolean overlap, never a side.

use serde::{Deserialize, Serialize};

use super::circle::Circle;
use super::rect::Aabb;
use super::sdf::{disc_overlaps, sd_band};
use crate::geom::Vector;
use crate::screen_direction;

/// Below this cross product two lines are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// Resolved line in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// A point the line passes through
    pub origin: Vector,
    /// Unit direction
    pub direction: Vector,
    /// Unit normal (direction rotated a quarter turn)
    pub normal: Vector,
    pub thickness: f32,
}

impl Line {
    /// Line through `origin` at `degrees` (game convention, counter-clockwise)
    pub fn from_angle(origin: Vector, degrees: f32, thickness: f32) -> Self {
        let direction = screen_direction(degrees);
        Self {
            origin,
            direction,
            normal: direction.perp(),
            thickness: thickness.abs(),
        }
    }

    #[inline]
    pub fn half_thickness(&self) -> f32 {
        self.thickness * 0.5
    }

    /// Signed distance from a point to the line's centre (along the normal)
    #[inline]
    pub fn offset_of(&self, p: Vector) -> f32 {
        (p - self.origin).dot(self.normal)
    }

    /// Perpendicular distance from the centre below radius + half thickness
    pub fn overlaps_circle(&self, circle: &Circle) -> bool {
        disc_overlaps(circle.center, circle.radius, |p| {
            sd_band(p, self.origin, self.normal, self.thickness)
        })
    }

    /// The rectangle's corners straddle or enter the band
    pub fn overlaps_rect(&self, rect: &Aabb) -> bool {
        if rect.is_degenerate() {
            return false;
        }
        let (lo, hi) = rect
            .corners()
            .into_iter()
            .map(|c| self.offset_of(c))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            });
        let half = self.half_thickness();
        lo < half && hi > -half
    }

    /// Crossing lines always overlap; parallel lines overlap when their bands do
    pub fn overlaps_line(&self, other: &Line) -> bool {
        if self.direction.perp_dot(other.direction).abs() > PARALLEL_EPSILON {
            return true;
        }
        self.offset_of(other.origin).abs() < self.half_thickness() + other.half_thickness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(y: f32, thickness: f32) -> Line {
        Line::from_angle(Vector::new(0.0, y), 0.0, thickness)
    }

    #[test]
    fn test_from_angle_normal() {
        let line = horizontal(0.0, 2.0);
        assert_eq!(line.direction, Vector::new(1.0, -0.0));
        assert_eq!(line.normal.x, 0.0);
        assert_eq!(line.normal.y.abs(), 1.0);
        assert_eq!(line.normal.dot(line.direction), 0.0);
    }

    #[test]
    fn test_line_circle() {
        let line = horizontal(0.0, 2.0);
        // radius 4 + half thickness 1 = 5
        assert!(line.overlaps_circle(&Circle::new(Vector::new(50.0, 4.9), 4.0)));
        assert!(!line.overlaps_circle(&Circle::new(Vector::new(50.0, 5.0), 4.0)));
        assert!(!line.overlaps_circle(&Circle::new(Vector::new(-50.0, -5.5), 4.0)));
    }

    #[test]
    fn test_line_rect() {
        let line = horizontal(10.0, 0.0);
        let across = Aabb::from_min_size(Vector::new(100.0, 5.0), Vector::splat(10.0));
        let above = Aabb::from_min_size(Vector::new(100.0, -5.0), Vector::splat(10.0));
        let touching = Aabb::from_min_size(Vector::new(0.0, 0.0), Vector::splat(10.0));
        assert!(line.overlaps_rect(&across));
        assert!(!line.overlaps_rect(&above));
        assert!(!line.overlaps_rect(&touching));

        let thick = horizontal(10.0, 2.0);
        assert!(thick.overlaps_rect(&touching));
    }

    #[test]
    fn test_line_line() {
        let a = horizontal(0.0, 2.0);
        let diagonal = Line::from_angle(Vector::new(500.0, 500.0), 45.0, 0.0);
        assert!(a.overlaps_line(&diagonal));

        assert!(a.overlaps_line(&horizontal(2.9, 4.0)));
        assert!(!a.overlaps_line(&horizontal(3.0, 4.0)));
        assert!(!a.overlaps_line(&horizontal(-10.0, 4.0)));
    }
}
