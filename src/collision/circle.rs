//! Circle hitbox geometry

use serde::{Deserialize, Serialize};

use super::rect::Aabb;
use super::sdf::{disc_overlaps, sd_box, sd_circle};
use crate::geom::Vector;

/// Resolved circle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vector,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vector, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Center distance strictly below the summed radii
    pub fn overlaps_circle(&self, other: &Circle) -> bool {
        disc_overlaps(self.center, self.radius, |p| {
            sd_circle(p, other.center, other.radius)
        })
    }

    /// Closest point of the rectangle strictly within the radius
    pub fn overlaps_rect(&self, rect: &Aabb) -> bool {
        if rect.is_degenerate() {
            return false;
        }
        let (center, half) = (rect.center(), rect.size() / 2.0);
        disc_overlaps(self.center, self.radius, |p| sd_box(p, center, half))
    }
}
