//! Error types

use thiserror::Error;

use crate::collision::HitboxId;
use crate::space::SpaceId;

/// Hitbox registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HitboxError {
    /// Layer index outside 0..LAYER_COUNT
    #[error("Invalid collision layer {layer} (max {max})")]
    InvalidLayer { layer: u8, max: usize },

    /// The bound space does not exist in the store
    #[error("Unknown space: {0:?}")]
    UnknownSpace(SpaceId),

    /// The hitbox has been destroyed or cleared
    #[error("Unknown hitbox: {0:?}")]
    UnknownHitbox(HitboxId),
}

/// Level loading and tile hitbox errors
#[derive(Error, Debug)]
pub enum TileMapError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Level JSON could not be parsed
    #[error("Level parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The level has no layer with this name
    #[error("Missing level layer: {0}")]
    MissingLayer(String),

    /// The level has no layers at all
    #[error("Level has no layers")]
    NoLayers,

    /// Declared grid is larger than `MAX_LEVEL_CELLS`
    #[error("Level grid {cols}x{rows} exceeds {max} cells")]
    LevelTooLarge { cols: u32, rows: u32, max: usize },

    /// A hitbox layer was found but no template was supplied
    #[error("No hitbox templates supplied")]
    MissingTemplates,

    /// A grid cell refers to a template index that was not supplied
    #[error("Cell ({x}, {y}) uses template {index} but only {available} supplied")]
    UnknownTemplate {
        x: u32,
        y: u32,
        index: usize,
        available: usize,
    },

    /// Cell array length does not match the declared grid size
    #[error("Layer {layer} has {actual} cells, expected {expected}")]
    GridSizeMismatch {
        layer: String,
        expected: usize,
        actual: usize,
    },

    /// Registering a tile hitbox failed
    #[error(transparent)]
    Hitbox(#[from] HitboxError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse or serialization error
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
