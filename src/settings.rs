//! Collision and tile-merge settings
//!
//! Persisted as JSON next to the game's other data files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::HITBOX_LAYER_NAME;
use crate::error::ConfigError;
use crate::geom::Vector;
use crate::space::Viewport;

/// How two rectangles are tested for overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverlapRule {
    /// X and Y intervals intersect (touching edges do not count)
    #[default]
    Interval,
    /// Legacy corner-crossing test, kept for behavioural parity with older levels
    CornerContainment,
}

impl OverlapRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapRule::Interval => "Interval",
            OverlapRule::CornerContainment => "CornerContainment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interval" => Some(OverlapRule::Interval),
            "corner" | "cornercontainment" | "corner_containment" => {
                Some(OverlapRule::CornerContainment)
            }
            _ => None,
        }
    }
}

/// Post-merge size tweak for tile hitboxes with specific tags.
///
/// The amount is added to the merged size along the longer run axis
/// (columns when `cols >= rows`, rows otherwise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeAdjustment {
    pub tags: Vec<String>,
    pub amount: f32,
}

impl MergeAdjustment {
    pub fn new<S: Into<String>>(tags: impl IntoIterator<Item = S>, amount: f32) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            amount,
        }
    }

    pub fn applies_to(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Adjusted size for a merged run of `cols` x `rows` cells
    pub fn apply(&self, tag: &str, cols: u32, rows: u32, size: Vector) -> Vector {
        if !self.applies_to(tag) {
            return size;
        }
        if cols >= rows {
            Vector::new(size.x + self.amount, size.y)
        } else {
            Vector::new(size.x, size.y + self.amount)
        }
    }
}

/// Collision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSettings {
    /// Rectangle overlap test
    #[serde(default)]
    pub overlap_rule: OverlapRule,
    /// Merge tile hitboxes into larger rectangles on level load
    pub merge_tile_hitboxes: bool,
    /// Name of the level layer holding hitbox cells
    pub hitbox_layer_name: String,
    /// Optional post-merge size tweaks
    #[serde(default)]
    pub merge_adjustments: Vec<MergeAdjustment>,
    /// Game resolution and camera for screen projection
    #[serde(default)]
    pub viewport: Viewport,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            overlap_rule: OverlapRule::Interval,
            merge_tile_hitboxes: true,
            hitbox_layer_name: HITBOX_LAYER_NAME.to_string(),
            merge_adjustments: Vec::new(),
            viewport: Viewport::default(),
        }
    }
}

impl CollisionSettings {
    /// Apply every configured adjustment to a merged size
    pub fn adjust_merged_size(&self, tag: &str, cols: u32, rows: u32, size: Vector) -> Vector {
        self.merge_adjustments
            .iter()
            .fold(size, |size, adj| adj.apply(tag, cols, rows, size))
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
