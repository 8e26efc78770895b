//! Level files exported by the Ogmo level editor
//!
//! Tile layers store sheet indices in `data` (-1 for empty). Grid layers
//! store one character per cell in `grid` ("0" for empty).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use super::merge::HitboxTemplate;
use crate::consts::MAX_LEVEL_CELLS;
use crate::error::TileMapError;
use crate::geom::Vector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelFile {
    #[serde(default)]
    pub ogmo_version: String,
    /// Level size in pixels
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    pub layers: Vec<LevelLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelLayer {
    pub name: String,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
    pub grid_cell_width: u32,
    pub grid_cell_height: u32,
    pub grid_cells_x: u32,
    pub grid_cells_y: u32,
    #[serde(default)]
    pub tileset: String,
    #[serde(default)]
    pub data: Vec<i32>,
    #[serde(default)]
    pub grid: Vec<String>,
}

impl LevelLayer {
    /// Layers whose name starts with '_' hold metadata, not drawn tiles
    pub fn is_tile_layer(&self) -> bool {
        !self.name.starts_with('_')
    }

    pub fn cell_count(&self) -> usize {
        (self.grid_cells_x as usize).saturating_mul(self.grid_cells_y as usize)
    }
}

impl LevelFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TileMapError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({}x{}, {} layers)",
            path.as_ref().display(),
            level.width,
            level.height,
            level.layers.len()
        );
        Ok(level)
    }

    pub fn from_json(json: &str) -> Result<Self, TileMapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn layer(&self, name: &str) -> Option<&LevelLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// First layer; it defines the cell grid for the whole level
    pub fn base_layer(&self) -> Result<&LevelLayer, TileMapError> {
        self.layers.first().ok_or(TileMapError::NoLayers)
    }

    /// Cells across and down
    pub fn cells(&self) -> Result<(u32, u32), TileMapError> {
        let base = self.base_layer()?;
        if base.cell_count() > MAX_LEVEL_CELLS {
            return Err(TileMapError::LevelTooLarge {
                cols: base.grid_cells_x,
                rows: base.grid_cells_y,
                max: MAX_LEVEL_CELLS,
            });
        }
        Ok((base.grid_cells_x, base.grid_cells_y))
    }

    pub fn cell_size(&self) -> Result<Vector, TileMapError> {
        let base = self.base_layer()?;
        Ok(Vector::new(
            base.grid_cell_width as f32,
            base.grid_cell_height as f32,
        ))
    }

    /// Template grid of the named hitbox layer.
    ///
    /// '0' is empty, '1'..'9' pick `templates[d - 1]`, any other character
    /// picks the first template.
    pub fn hitbox_grid(
        &self,
        layer_name: &str,
        templates: &[HitboxTemplate],
    ) -> Result<TileGrid<HitboxTemplate>, TileMapError> {
        let layer = self
            .layer(layer_name)
            .ok_or_else(|| TileMapError::MissingLayer(layer_name.to_string()))?;
        let (cols, rows) = self.cells()?;
        let expected = cols as usize * rows as usize;
        if layer.grid.len() != expected {
            return Err(TileMapError::GridSizeMismatch {
                layer: layer.name.clone(),
                expected,
                actual: layer.grid.len(),
            });
        }

        let mut grid = TileGrid::new(cols, rows);
        for (i, cell) in layer.grid.iter().enumerate() {
            let c = cell.chars().next().unwrap_or('0');
            if c == '0' {
                continue;
            }
            let (x, y) = (i as u32 % cols, i as u32 / cols);
            let index = match c.to_digit(10) {
                Some(d) => d as usize - 1,
                None => 0,
            };
            let template = templates.get(index).ok_or(if templates.is_empty() {
                TileMapError::MissingTemplates
            } else {
                TileMapError::UnknownTemplate {
                    x,
                    y,
                    index,
                    available: templates.len(),
                }
            })?;
            grid.set(x, y, template.clone());
        }
        Ok(grid)
    }
}
