//! Layerbox - layered 2D hitboxes for a sprite framework
//!
//! Core modules:
//! - `geom`: Vector/Point aliases, 9-way bounds anchors
//! - `space`: Positioned game-object state and screen projection
//! - `collision`: Hitbox shapes, side resolution, per-layer registry
//! - `tilemap`: Level loading and tile hitbox merging
//! - `settings`: Data-driven collision configuration

pub mod collision;
pub mod error;
pub mod geom;
pub mod settings;
pub mod space;
pub mod tilemap;

pub use collision::{Collision, CollisionWorld, Hitbox, HitboxId, Shape, Side};
pub use error::{ConfigError, HitboxError, TileMapError};
pub use geom::{Bounds, Point, Vector};
pub use settings::{CollisionSettings, MergeAdjustment, OverlapRule};
pub use space::{Camera, Space, SpaceId, SpaceStore, Viewport};

/// Framework constants
pub mod consts {
    /// Number of collision layers. Only hitboxes on the same layer collide.
    pub const LAYER_COUNT: usize = 4;

    /// Default `Space` scale for new game objects
    pub const DEFAULT_SCALE: f32 = 50.0;

    /// Default game resolution used by `Viewport::default`
    pub const DEFAULT_SCREEN_WIDTH: f32 = 320.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 180.0;

    /// Default line hitbox thickness
    pub const DEFAULT_LINE_THICKNESS: f32 = 1.0;

    /// Name of the level layer holding hitbox cells
    pub const HITBOX_LAYER_NAME: &str = "_Hitboxs";

    /// Largest level grid accepted from a level file (4096 x 4096 cells)
    pub const MAX_LEVEL_CELLS: usize = 1 << 24;
}

/// Unit direction for an angle in degrees, in screen space (Y down).
///
/// Game angles are counter-clockwise with Y up, so the Y component flips.
#[inline]
pub fn screen_direction(degrees: f32) -> Vector {
    let rad = degrees.to_radians();
    Vector::new(rad.cos(), -rad.sin())
}
