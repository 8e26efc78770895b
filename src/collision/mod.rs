//! Hitbox collision module
//!
//! Geometry is derived from each hitbox's bound `Space` at query time:
//! - Rectangles, circles and lines all overlap each other
//! - Only rectangle pairs report a contact side
//! - Queries only see hitboxes on the same layer

pub mod circle;
pub mod hitbox;
pub mod line;
pub mod rect;
pub mod sdf;
pub mod world;

pub use circle::Circle;
pub use hitbox::{Collision, Geometry, Hitbox, HitboxId, Shape, Side};
pub use line::Line;
pub use rect::{Aabb, Contact, CornerMask, resolve_contact};
pub use world::CollisionWorld;
