//! Tile hitbox merging
//!
//! Folds a grid of per-cell hitbox templates into fewer rectangles:
//! - Runs grow right first, then down one full row at a time
//! - Only cells with an identical template join a run
//! - Consumed cells are emptied, so every cell ends up in exactly one output

use glam::UVec2;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use crate::collision::Hitbox;
use crate::geom::Vector;
use crate::space::SpaceId;

/// Hitbox description repeated in every cell of a tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitboxTemplate {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub layer: u8,
    /// Size of one cell's hitbox
    pub size: Vector,
    /// Extra offset applied to the merged hitbox (game units, Y up)
    #[serde(default)]
    pub offset: Vector,
}

impl HitboxTemplate {
    pub fn new(size: Vector) -> Self {
        Self {
            tag: String::new(),
            layer: 0,
            size,
            offset: Vector::ZERO,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_offset(mut self, offset: Vector) -> Self {
        self.offset = offset;
        self
    }

    /// Rectangle hitbox of `size` bound to `space`, carrying the template's tag and layer
    pub fn instantiate(&self, space: SpaceId, size: Vector, offset: Vector) -> Hitbox {
        Hitbox::rectangle(space)
            .with_tag(self.tag.clone())
            .with_layer(self.layer)
            .with_locked_size(size)
            .with_offset(self.offset + offset)
    }
}

/// One rectangle produced by `merge` or `place`
#[derive(Debug, Clone, PartialEq)]
pub struct MergedHitbox {
    pub template: HitboxTemplate,
    /// Top-left cell of the run
    pub cell: UVec2,
    /// Run length in cells (columns, rows)
    pub span: UVec2,
    /// `template.size * span`
    pub size: Vector,
}

impl MergedHitbox {
    fn new(template: HitboxTemplate, cell: UVec2, span: UVec2) -> Self {
        let size = template.size * span.as_vec2();
        Self {
            template,
            cell,
            span,
            size,
        }
    }

    /// Local top-left corner for cells laid out every `pitch` units (Y down)
    #[inline]
    pub fn origin(&self, pitch: Vector) -> Vector {
        self.cell.as_vec2() * pitch
    }

    /// Local top-left corner using the template size as cell pitch
    #[inline]
    pub fn top_left(&self) -> Vector {
        self.origin(self.template.size)
    }

    pub fn center(&self) -> Vector {
        self.top_left() + self.size / 2.0
    }

    /// Whether the run covers `cell`
    pub fn covers(&self, cell: UVec2) -> bool {
        cell.cmpge(self.cell).all() && cell.cmplt(self.cell + self.span).all()
    }
}

/// Greedy maximal-run merge.
///
/// Scans row-major. From each remaining cell the run extends right while the
/// neighbour holds an equal template, then down while every cell of the next
/// row under the run does. The scan continues after the run instead of
/// restarting; every cell before it is already empty, so the result is the
/// same.
pub fn merge(grid: &TileGrid<HitboxTemplate>) -> Vec<MergedHitbox> {
    let mut cells = grid.clone();
    let (cols, rows) = (cells.width(), cells.height());
    let mut out = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let Some(template) = cells.take(x, y) else {
                continue;
            };

            let mut width = 1;
            while x + width < cols && cells.get(x + width, y) == Some(&template) {
                cells.take(x + width, y);
                width += 1;
            }

            let mut height = 1;
            while y + height < rows
                && (0..width).all(|k| cells.get(x + k, y + height) == Some(&template))
            {
                for k in 0..width {
                    cells.take(x + k, y + height);
                }
                height += 1;
            }

            out.push(MergedHitbox::new(
                template,
                UVec2::new(x, y),
                UVec2::new(width, height),
            ));
        }
    }

    log::debug!(
        "Merged {} tile hitboxes into {}",
        grid.occupied_count(),
        out.len()
    );
    out
}

/// One 1x1 hitbox per occupied cell, row-major
pub fn place(grid: &TileGrid<HitboxTemplate>) -> Vec<MergedHitbox> {
    grid.occupied()
        .map(|(cell, template)| MergedHitbox::new(template.clone(), cell, UVec2::ONE))
        .collect()
}
