//! Geometric primitives
//!
//! `Vector` and `Point` are glam types: component-wise arithmetic, scalar
//! scaling, dot product and distance come for free, and equality is exact
//! float comparison (no epsilon).

use serde::{Deserialize, Serialize};

/// 2D float vector (x, y)
pub type Vector = glam::Vec2;

/// 2D integer grid point (i, j)
pub type Point = glam::IVec2;

/// One of the 9 anchor points of a box.
///
/// Declaration order is row-major over the 3x3 grid, top row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Bounds {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Bounds {
    /// All anchors in row-major order
    pub const ALL: [Bounds; 9] = [
        Bounds::TopLeft,
        Bounds::Top,
        Bounds::TopRight,
        Bounds::Left,
        Bounds::Center,
        Bounds::Right,
        Bounds::BottomLeft,
        Bounds::Bottom,
        Bounds::BottomRight,
    ];

    /// Offset of this anchor from the top-left corner of a `width` x `height` box
    pub fn offset(self, width: f32, height: f32) -> Vector {
        match self {
            Bounds::TopLeft => Vector::new(0.0, 0.0),
            Bounds::Top => Vector::new(width / 2.0, 0.0),
            Bounds::TopRight => Vector::new(width, 0.0),

            Bounds::Left => Vector::new(0.0, height / 2.0),
            Bounds::Center => Vector::new(width / 2.0, height / 2.0),
            Bounds::Right => Vector::new(width, height / 2.0),

            Bounds::BottomLeft => Vector::new(0.0, height),
            Bounds::Bottom => Vector::new(width / 2.0, height),
            Bounds::BottomRight => Vector::new(width, height),
        }
    }

    /// `offset` taking the size as a vector
    #[inline]
    pub fn offset_of(self, size: Vector) -> Vector {
        self.offset(size.x, size.y)
    }

    /// Offsets of all 9 anchors for a box, indexed like `ALL`
    pub fn table(width: f32, height: f32) -> [Vector; 9] {
        Self::ALL.map(|b| b.offset(width, height))
    }
}

/// Angle in degrees of the segment going from `from` to `to`.
///
/// Vertical segments return exactly 90 (upward in Y) or -90.
pub fn angle_between(from: Vector, to: Vector) -> f32 {
    let dx = to.x - from.x;
    if dx == 0.0 {
        return if from.y < to.y { 90.0 } else { -90.0 };
    }
    let base = ((to.y - from.y) / dx).atan().to_degrees();
    if from.x < to.x { base } else { base + 180.0 }
}
