//! Hitbox description and per-query geometry resolution

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::circle::Circle;
use super::line::Line;
use super::rect::{Aabb, Contact, CornerMask, resolve_contact};
use crate::consts::DEFAULT_LINE_THICKNESS;
use crate::geom::Vector;
use crate::settings::OverlapRule;
use crate::space::{Space, SpaceId, SpaceStore, Viewport};

new_key_type! {
    /// Handle to a hitbox registered in a `CollisionWorld`
    pub struct HitboxId;
}

/// Edge of a rectangle involved in a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::None => Side::None,
        }
    }
}

/// One partner found by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub collider: HitboxId,
    pub side: Side,
}

/// Shape of a hitbox plus its shape-specific overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Box sized by `Space.scale` unless `locked_size` is set
    Rectangle { locked_size: Option<Vector> },
    /// Circle of radius `|Space.scale.x| / 2` unless `locked_radius` is set
    Circle { locked_radius: Option<f32> },
    /// Band along `Space.rotation` unless `locked_direction` (degrees) is set
    Line {
        locked_direction: Option<f32>,
        thickness: f32,
    },
}

impl Shape {
    pub fn rectangle() -> Self {
        Shape::Rectangle { locked_size: None }
    }

    pub fn circle() -> Self {
        Shape::Circle {
            locked_radius: None,
        }
    }

    pub fn line() -> Self {
        Shape::Line {
            locked_direction: None,
            thickness: DEFAULT_LINE_THICKNESS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::Line { .. } => "line",
        }
    }
}

/// Geometry of a hitbox at one instant, in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rectangle(Aabb),
    Circle(Circle),
    Line(Line),
}

impl Geometry {
    /// Boolean overlap for every shape pairing
    pub fn overlaps(&self, other: &Geometry, rule: OverlapRule) -> bool {
        use Geometry::*;
        match (self, other) {
            (Rectangle(a), Rectangle(b)) => a.overlaps_with(b, rule),
            (Circle(a), Circle(b)) => a.overlaps_circle(b),
            (Circle(c), Rectangle(r)) | (Rectangle(r), Circle(c)) => c.overlaps_rect(r),
            (Line(l), Circle(c)) | (Circle(c), Line(l)) => l.overlaps_circle(c),
            (Line(l), Rectangle(r)) | (Rectangle(r), Line(l)) => l.overlaps_rect(r),
            (Line(a), Line(b)) => a.overlaps_line(b),
        }
    }

    /// Contact with a side for rectangle pairs, `Side::None` for the rest
    pub fn contact(&self, other: &Geometry, rule: OverlapRule) -> Option<Contact> {
        match (self, other) {
            (Geometry::Rectangle(a), Geometry::Rectangle(b)) => resolve_contact(a, b, rule),
            _ => self.overlaps(other, rule).then_some(Contact {
                mask: CornerMask::EMPTY,
                side: Side::None,
            }),
        }
    }
}

/// A collidable shape bound to a `Space`
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    /// Inactive hitboxes neither query nor get found
    pub active: bool,
    /// Grouping key for tag-filtered queries
    pub tag: String,
    /// Added after the space-derived position (game units, Y up)
    pub position_offset: Vector,
    /// Game-space position used instead of `Space.position`
    pub locked_position: Option<Vector>,
    pub shape: Shape,
    layer: u8,
    space: SpaceId,
}

impl Hitbox {
    pub fn new(space: SpaceId, shape: Shape) -> Self {
        Self {
            active: true,
            tag: String::new(),
            position_offset: Vector::ZERO,
            locked_position: None,
            shape,
            layer: 0,
            space,
        }
    }

    pub fn rectangle(space: SpaceId) -> Self {
        Self::new(space, Shape::rectangle())
    }

    pub fn circle(space: SpaceId) -> Self {
        Self::new(space, Shape::circle())
    }

    pub fn line(space: SpaceId) -> Self {
        Self::new(space, Shape::line())
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Layer to register on. Moving a registered hitbox goes through
    /// `CollisionWorld::set_layer`.
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.position_offset = offset;
        self
    }

    pub fn with_locked_size(mut self, size: Vector) -> Self {
        self.lock_size(size);
        self
    }

    #[inline]
    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub(crate) fn set_layer_unchecked(&mut self, layer: u8) {
        self.layer = layer;
    }

    #[inline]
    pub fn space(&self) -> SpaceId {
        self.space
    }

    /// `None` matches every tag, `Some(t)` only exactly `t`
    #[inline]
    pub fn matches_tag(&self, tag: Option<&str>) -> bool {
        tag.is_none_or(|t| self.tag == t)
    }

    pub fn lock_position(&mut self, position: Vector) {
        self.locked_position = Some(position);
    }

    pub fn unlock_position(&mut self) {
        self.locked_position = None;
    }

    /// Fix a rectangle's size. Returns false for other shapes.
    pub fn lock_size(&mut self, size: Vector) -> bool {
        match &mut self.shape {
            Shape::Rectangle { locked_size } => {
                *locked_size = Some(size);
                true
            }
            _ => false,
        }
    }

    pub fn unlock_size(&mut self) {
        if let Shape::Rectangle { locked_size } = &mut self.shape {
            *locked_size = None;
        }
    }

    /// Fix a circle's radius. Returns false for other shapes.
    pub fn lock_radius(&mut self, radius: f32) -> bool {
        match &mut self.shape {
            Shape::Circle { locked_radius } => {
                *locked_radius = Some(radius);
                true
            }
            _ => false,
        }
    }

    /// Fix a line's direction in degrees. Returns false for other shapes.
    pub fn lock_direction(&mut self, degrees: f32) -> bool {
        match &mut self.shape {
            Shape::Line {
                locked_direction, ..
            } => {
                *locked_direction = Some(degrees);
                true
            }
            _ => false,
        }
    }

    /// Resolve against the store; `None` when the bound space is gone
    pub fn resolve(&self, spaces: &SpaceStore, viewport: &Viewport) -> Option<Geometry> {
        spaces
            .get(self.space)
            .map(|space| self.resolve_in(space, viewport))
    }

    /// Screen-space geometry for the current state of `space`
    pub fn resolve_in(&self, space: &Space, viewport: &Viewport) -> Geometry {
        match &self.shape {
            Shape::Rectangle { locked_size } => {
                let size = locked_size.unwrap_or(space.scale);
                let top_left = self.anchor(space, viewport, size);
                Geometry::Rectangle(Aabb::from_min_size(top_left, size))
            }
            Shape::Circle { locked_radius } => {
                let radius = locked_radius.unwrap_or(space.scale.x.abs() / 2.0).abs();
                let size = Vector::splat(radius * 2.0);
                let center = self.anchor(space, viewport, size) + size / 2.0;
                Geometry::Circle(Circle::new(center, radius))
            }
            Shape::Line {
                locked_direction,
                thickness,
            } => {
                let center = self.anchor(space, viewport, space.scale) + space.scale / 2.0;
                let degrees = locked_direction.unwrap_or(space.rotation);
                Geometry::Line(Line::from_angle(center, degrees, *thickness))
            }
        }
    }

    /// Top-left corner of a `size` box placed by the space's anchors
    fn anchor(&self, space: &Space, viewport: &Viewport, size: Vector) -> Vector {
        let position = self.locked_position.unwrap_or(space.position);
        let projected = viewport.project(position, space.grid_origin, false);
        let top_left = projected - space.center_point.offset_of(size);
        Vector::new(
            top_left.x + self.position_offset.x,
            top_left.y - self.position_offset.y,
        )
    }
}
