//! Tile maps and their collision
//!
//! A level's hitbox layer becomes a grid of hitbox templates, which is merged
//! into as few rectangles as possible and registered into a `CollisionWorld`
//! bound to the map's own `Space`.

pub mod grid;
pub mod level;
pub mod merge;
pub mod tileset;

pub use grid::TileGrid;
pub use level::{LevelFile, LevelLayer};
pub use merge::{HitboxTemplate, MergedHitbox, merge, place};
pub use tileset::{SourceRect, TileSet};

use glam::UVec2;

use crate::collision::{CollisionWorld, HitboxId};
use crate::error::{HitboxError, TileMapError};
use crate::geom::Vector;
use crate::settings::CollisionSettings;
use crate::space::{Space, SpaceId, SpaceStore};

/// A loaded level with its merged tile hitboxes
#[derive(Debug, Clone)]
pub struct TileMap {
    level: LevelFile,
    tileset: TileSet,
    grid: TileGrid<HitboxTemplate>,
    hitboxes: Vec<MergedHitbox>,
    cell_size: Vector,
}

impl TileMap {
    /// Build the hitbox grid from `settings.hitbox_layer_name` and merge it
    /// (or place one hitbox per cell when merging is disabled).
    /// A level without a hitbox layer has no hitboxes.
    pub fn new(
        level: LevelFile,
        tileset: TileSet,
        templates: &[HitboxTemplate],
        settings: &CollisionSettings,
    ) -> Result<Self, TileMapError> {
        let (cols, rows) = level.cells()?;
        let cell_size = level.cell_size()?;

        let grid = match level.hitbox_grid(&settings.hitbox_layer_name, templates) {
            Ok(grid) => grid,
            Err(TileMapError::MissingLayer(name)) => {
                log::debug!("Level has no {} layer", name);
                TileGrid::new(cols, rows)
            }
            Err(e) => return Err(e),
        };

        let mut hitboxes = if settings.merge_tile_hitboxes {
            merge(&grid)
        } else {
            place(&grid)
        };
        for hit in &mut hitboxes {
            hit.size = settings.adjust_merged_size(&hit.template.tag, hit.span.x, hit.span.y, hit.size);
        }

        log::info!(
            "Tile map {}x{}: {} hitboxes from {} cells",
            cols,
            rows,
            hitboxes.len(),
            grid.occupied_count()
        );

        Ok(Self {
            level,
            tileset,
            grid,
            hitboxes,
            cell_size,
        })
    }

    pub fn level(&self) -> &LevelFile {
        &self.level
    }

    pub fn tileset(&self) -> &TileSet {
        &self.tileset
    }

    /// Per-cell templates before merging
    pub fn grid(&self) -> &TileGrid<HitboxTemplate> {
        &self.grid
    }

    pub fn hitboxes(&self) -> &[MergedHitbox] {
        &self.hitboxes
    }

    pub fn cell_size(&self) -> Vector {
        self.cell_size
    }

    /// Map size in pixels (cells times cell size)
    pub fn map_size(&self) -> Vector {
        Vector::new(self.grid.width() as f32, self.grid.height() as f32) * self.cell_size
    }

    /// A centred space covering the map
    pub fn space(&self) -> Space {
        Space::new(Vector::ZERO, self.map_size())
    }

    /// Register every merged hitbox bound to `map_space`.
    ///
    /// Each hitbox gets a locked size and an offset that puts it over its
    /// cells wherever the map space is anchored. On error nothing stays
    /// registered.
    pub fn spawn_hitboxes(
        &self,
        world: &mut CollisionWorld,
        spaces: &SpaceStore,
        map_space: SpaceId,
    ) -> Result<Vec<HitboxId>, TileMapError> {
        let anchor = spaces
            .get(map_space)
            .ok_or(HitboxError::UnknownSpace(map_space))?
            .center_point;
        let map_anchor = anchor.offset_of(self.map_size());

        let mut ids = Vec::with_capacity(self.hitboxes.len());
        for hit in &self.hitboxes {
            let local = hit.origin(self.cell_size) + anchor.offset_of(hit.size) - map_anchor;
            let offset = Vector::new(local.x, -local.y);
            let hitbox = hit.template.instantiate(map_space, hit.size, offset);
            match world.spawn(spaces, hitbox) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    // All or nothing: undo the hitboxes already registered
                    for id in ids {
                        world.destroy(id);
                    }
                    return Err(e.into());
                }
            }
        }
        log::debug!("Spawned {} tile hitboxes", ids.len());
        Ok(ids)
    }

    /// Game-space centres of every cell drawn with the sheet tile at
    /// column `column`, row `row`, relative to the map centre
    pub fn positions_of(&self, column: u32, row: u32) -> Vec<Vector> {
        let Ok(target) = i32::try_from(self.tileset.index_of(column, row)) else {
            return Vec::new();
        };
        let cols = self.grid.width().max(1) as usize;
        let tile = self.tileset.tile_size.as_vec2();
        let (file_w, file_h) = (self.level.width as f32, self.level.height as f32);

        self.level
            .layers
            .iter()
            .flat_map(|layer| layer.data.iter().enumerate())
            .filter(|&(_, &index)| index == target)
            .map(|(k, _)| {
                Vector::new(
                    (k % cols) as f32 * tile.x - (file_w - tile.x) / 2.0,
                    -((k / cols) as f32) * tile.y + (file_h + tile.y) / 2.0 - tile.y,
                )
            })
            .collect()
    }

    /// Drawable tiles of every tile layer: cell and sheet rectangle
    pub fn tiles(&self) -> impl Iterator<Item = (UVec2, SourceRect)> + '_ {
        let cols = self.grid.width().max(1);
        self.level
            .layers
            .iter()
            .filter(|layer| layer.is_tile_layer())
            .flat_map(|layer| layer.data.iter().enumerate())
            .filter_map(move |(k, &index)| {
                let rect = u32::try_from(index).ok().and_then(|i| self.tileset.source_rect(i))?;
                let k = k as u32;
                Some((UVec2::new(k % cols, k / cols), rect))
            })
    }
}
