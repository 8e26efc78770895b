//! Positioned game-object state and screen projection
//!
//! Game space has Y growing upward; screen space has Y growing downward.
//! A `Space` is owned by the `SpaceStore` and referenced by `SpaceId`, so a
//! hitbox never owns or outlives the transform it reads.

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::consts::{DEFAULT_SCALE, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};
use crate::geom::{Bounds, Vector};

new_key_type! {
    /// Handle to a `Space` in a `SpaceStore`
    pub struct SpaceId;
}

/// Storage for every live `Space`
pub type SpaceStore = SlotMap<SpaceId, Space>;

/// Describes a state in space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Entity position (game units, Y up)
    pub position: Vector,
    /// Entity scale. Negative components flip the texture.
    pub scale: Vector,
    /// Rotation in degrees
    pub rotation: f32,
    /// Screen anchor the position is relative to
    pub grid_origin: Bounds,
    /// Anchor of the entity's own box used for position and rotation
    pub center_point: Bounds,
}

impl Default for Space {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            scale: Vector::splat(DEFAULT_SCALE),
            rotation: 0.0,
            grid_origin: Bounds::Center,
            center_point: Bounds::Center,
        }
    }
}

impl Space {
    pub fn new(position: Vector, scale: Vector) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Same space with both anchors set to `anchor`
    pub fn anchored(mut self, anchor: Bounds) -> Self {
        self.grid_origin = anchor;
        self.center_point = anchor;
        self
    }

    /// Screen position of `self.position`
    pub fn screen_position(&self, viewport: &Viewport, include_camera: bool) -> Vector {
        viewport.project(self.position, self.grid_origin, include_camera)
    }
}

/// Camera used for camera-relative projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vector,
    pub zoom: f32,
    /// Only spaces sharing this grid origin follow the camera
    pub grid_origin: Bounds,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector::ZERO,
            zoom: 1.0,
            grid_origin: Bounds::Center,
        }
    }
}

/// Game resolution plus camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub camera: Camera,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            camera: Camera::default(),
        }
    }

    /// Screen offset of a grid origin
    #[inline]
    pub fn origin(&self, grid_origin: Bounds) -> Vector {
        grid_origin.offset(self.width, self.height)
    }

    /// Project a game-space position relative to `grid_origin` onto the screen
    pub fn project(&self, position: Vector, grid_origin: Bounds, include_camera: bool) -> Vector {
        let origin = self.origin(grid_origin);
        if include_camera && grid_origin == self.camera.grid_origin {
            let cam = &self.camera;
            Vector::new(
                (position.x - cam.position.x) * cam.zoom + origin.x,
                -((position.y - cam.position.y) * cam.zoom) + origin.y,
            )
        } else {
            Vector::new(position.x + origin.x, -position.y + origin.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_flips_y() {
        let vp = Viewport::new(100.0, 60.0);
        let space = Space::new(Vector::new(10.0, 5.0), Vector::splat(4.0));
        // Center origin is (50, 30)
        assert_eq!(space.screen_position(&vp, false), Vector::new(60.0, 25.0));

        let top_left = space.clone().anchored(Bounds::TopLeft);
        assert_eq!(top_left.screen_position(&vp, false), Vector::new(10.0, -5.0));
    }

    #[test]
    fn test_project_with_camera() {
        let mut vp = Viewport::new(100.0, 60.0);
        vp.camera.position = Vector::new(10.0, 10.0);
        vp.camera.zoom = 2.0;

        let space = Space::new(Vector::new(20.0, 0.0), Vector::splat(4.0));
        assert_eq!(space.screen_position(&vp, true), Vector::new(70.0, 50.0));
        // Camera ignored when not requested
        assert_eq!(space.screen_position(&vp, false), Vector::new(70.0, 30.0));

        // Camera ignored when the grid origin differs
        let other = space.anchored(Bounds::TopLeft);
        assert_eq!(other.screen_position(&vp, true), Vector::new(20.0, 0.0));
    }

    #[test]
    fn test_space_store_handles() {
        let mut store = SpaceStore::with_key();
        let id = store.insert(Space::default());
        assert_eq!(store[id].scale, Vector::splat(DEFAULT_SCALE));
        store.remove(id);
        assert!(store.get(id).is_none());
    }
}
