//! Axis-aligned rectangle overlap and side resolution
//!
//! All rectangles here live in screen space (Y down), so "Up" means the
//! rectangle's top edge is the one in contact.

use serde::{Deserialize, Serialize};

use super::Side;
use crate::geom::Vector;
use crate::settings::OverlapRule;

/// Corner indices, in the order used by `Aabb::corners` and `CornerMask`
pub const TOP_LEFT: usize = 0;
pub const TOP_RIGHT: usize = 1;
pub const BOTTOM_LEFT: usize = 2;
pub const BOTTOM_RIGHT: usize = 3;

/// Axis-aligned box given by its min (top-left) and max (bottom-right) corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vector,
    pub max: Vector,
}

impl Aabb {
    /// Box spanning two arbitrary corners (negative sizes are normalized)
    pub fn from_corners(a: Vector, b: Vector) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_min_size(min: Vector, size: Vector) -> Self {
        Self::from_corners(min, min + size)
    }

    #[inline]
    pub fn size(&self) -> Vector {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vector {
        (self.min + self.max) / 2.0
    }

    /// Zero width or height
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Corners in order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Vector; 4] {
        [
            self.min,
            Vector::new(self.max.x, self.min.y),
            Vector::new(self.min.x, self.max.y),
            self.max,
        ]
    }

    /// Point strictly inside (edges excluded)
    #[inline]
    pub fn contains_strict(&self, p: Vector) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Distance from an inside point to the nearest edge on each axis
    pub fn edge_depth(&self, p: Vector) -> Vector {
        Vector::new(
            (p.x - self.min.x).min(self.max.x - p.x),
            (p.y - self.min.y).min(self.max.y - p.y),
        )
    }

    /// Open-interval overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Legacy corner-crossing test.
    ///
    /// Checks whether an edge of `self` crosses into `other`. Not symmetric:
    /// a box strictly containing `other` reports no overlap.
    pub fn overlaps_by_corners(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let (p1, p2) = (self.min, self.max);
        let (lo, hi) = (other.min, other.max);
        let inside_x = |v: f32| v > lo.x && v < hi.x;
        let inside_y = |v: f32| v > lo.y && v < hi.y;

        if inside_x(p1.x) || inside_x(p2.x) {
            if p1.y > lo.y {
                p1.y < hi.y
            } else {
                p2.y > lo.y
            }
        } else if inside_y(p1.y) || inside_y(p2.y) {
            if p1.x > lo.x {
                p1.x < hi.x
            } else {
                p2.x > lo.x
            }
        } else {
            false
        }
    }

    /// Overlap test using the configured rule
    pub fn overlaps_with(&self, other: &Aabb, rule: OverlapRule) -> bool {
        match rule {
            OverlapRule::Interval => self.overlaps(other),
            OverlapRule::CornerContainment => self.overlaps_by_corners(other),
        }
    }

    /// Penetration depth on each axis for overlapping boxes
    pub fn overlap_depth(&self, other: &Aabb) -> Vector {
        Vector::new(
            (self.max.x - other.min.x).min(other.max.x - self.min.x),
            (self.max.y - other.min.y).min(other.max.y - self.min.y),
        )
    }
}

/// Which corners took part in a contact (bit i = corner i)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerMask(u8);

impl CornerMask {
    pub const EMPTY: CornerMask = CornerMask(0);

    pub fn from_corners(corners: &[usize]) -> Self {
        let mut mask = Self::EMPTY;
        for &c in corners {
            mask.set(c);
        }
        mask
    }

    #[inline]
    pub fn set(&mut self, corner: usize) {
        self.0 |= 1 << corner;
    }

    #[inline]
    pub fn contains(self, corner: usize) -> bool {
        self.0 & (1 << corner) != 0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn union(self, other: CornerMask) -> CornerMask {
        CornerMask(self.0 | other.0)
    }

    /// Mask seen from the other rectangle's point of view (corner i -> 3 - i)
    pub fn mirrored(self) -> CornerMask {
        let mut out = Self::EMPTY;
        for i in 0..4 {
            if self.contains(i) {
                out.set(3 - i);
            }
        }
        out
    }

    /// Two opposite corners (top-left + bottom-right or top-right + bottom-left)
    pub fn is_diagonal(self) -> bool {
        self == Self::from_corners(&[TOP_LEFT, BOTTOM_RIGHT])
            || self == Self::from_corners(&[TOP_RIGHT, BOTTOM_LEFT])
    }

    /// Side for the four edge-sharing corner pairs
    pub fn edge_side(self) -> Option<Side> {
        if self.count() != 2 {
            return None;
        }
        let has = |c| self.contains(c);
        match (has(TOP_LEFT), has(TOP_RIGHT), has(BOTTOM_LEFT), has(BOTTOM_RIGHT)) {
            (true, true, false, false) => Some(Side::Up),
            (false, false, true, true) => Some(Side::Down),
            (true, false, true, false) => Some(Side::Left),
            (false, true, false, true) => Some(Side::Right),
            _ => None,
        }
    }
}

/// Outcome of resolving two rectangles against each other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub mask: CornerMask,
    pub side: Side,
}

/// Resolve the side of `a` touching `b`, or `None` when they do not touch.
///
/// Corners of `a` inside `b` set their own bit and record how deep they sit;
/// corners of `b` inside `a` only set the mirrored bit. Two edge-sharing bits
/// pick the side directly. Anything else picks the axis with the smaller
/// penetration of `a`'s corners (vertical when none of them is inside `b`)
/// and breaks the tie by which side of `b` the center of `a` lies on.
pub fn resolve_contact(a: &Aabb, b: &Aabb, rule: OverlapRule) -> Option<Contact> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    let mut mask = CornerMask::EMPTY;
    let mut close = Vector::splat(f32::INFINITY);

    for (i, p) in a.corners().into_iter().enumerate() {
        if b.contains_strict(p) {
            mask.set(i);
            close = close.min(b.edge_depth(p));
        }
    }
    for (i, p) in b.corners().into_iter().enumerate() {
        if a.contains_strict(p) {
            mask.set(3 - i);
        }
    }

    if mask.is_empty() {
        // Crossing boxes share no corner; only the interval rule sees them
        if rule == OverlapRule::CornerContainment || !a.overlaps(b) {
            return None;
        }
        close = a.overlap_depth(b);
    }

    let side = match mask.edge_side() {
        Some(side) => side,
        None => {
            let (ca, cb) = (a.center(), b.center());
            if close.x < close.y {
                if ca.x > cb.x { Side::Left } else { Side::Right }
            } else if ca.y > cb.y {
                Side::Up
            } else {
                Side::Down
            }
        }
    };

    Some(Contact { mask, side })
}
