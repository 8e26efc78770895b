//! Sprite-sheet layout of a tile set

use glam::UVec2;
use serde::{Deserialize, Serialize};

/// Sheet of equally sized tiles with optional spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSet {
    /// Sheet size in pixels
    pub sheet_size: UVec2,
    pub tile_size: UVec2,
    /// Gap between neighbouring tiles
    #[serde(default)]
    pub separation: UVec2,
    /// Border around the whole sheet
    #[serde(default)]
    pub margin: UVec2,
}

/// Pixel rectangle inside the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileSet {
    pub fn new(sheet_size: UVec2, tile_size: UVec2) -> Self {
        Self {
            sheet_size,
            tile_size,
            separation: UVec2::ZERO,
            margin: UVec2::ZERO,
        }
    }

    /// Distance between the origins of neighbouring tiles
    #[inline]
    fn stride(&self) -> UVec2 {
        (self.tile_size + self.separation).max(UVec2::ONE)
    }

    #[inline]
    fn usable(&self) -> UVec2 {
        self.sheet_size.saturating_sub(self.margin * 2) + self.separation
    }

    /// Tiles per sheet row
    pub fn columns(&self) -> u32 {
        self.usable().x / self.stride().x
    }

    /// Tiles per sheet column
    pub fn rows(&self) -> u32 {
        self.usable().y / self.stride().y
    }

    pub fn len(&self) -> u32 {
        self.columns() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sheet index of the tile at column `i`, row `j`
    pub fn index_of(&self, i: u32, j: u32) -> u32 {
        i + j * self.columns()
    }

    /// Sheet cell of a tile index; `None` past the end of the sheet
    pub fn source_rect(&self, index: u32) -> Option<SourceRect> {
        if index >= self.len() {
            return None;
        }
        let columns = self.columns();
        let stride = self.stride();
        Some(SourceRect {
            x: self.margin.x + (index % columns) * stride.x,
            y: self.margin.y + (index / columns) * stride.y,
            width: self.tile_size.x,
            height: self.tile_size.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sheet() {
        let set = TileSet::new(UVec2::new(64, 32), UVec2::splat(16));
        assert_eq!((set.columns(), set.rows()), (4, 2));
        assert_eq!(set.len(), 8);
        assert_eq!(
            set.source_rect(5),
            Some(SourceRect { x: 16, y: 16, width: 16, height: 16 })
        );
        assert_eq!(set.source_rect(8), None);
        assert_eq!(set.index_of(1, 1), 5);
    }

    #[test]
    fn test_separation_and_margin() {
        // 2 px margin, 1 px gaps: 2 + 16 + 1 + 16 + 2 = 37
        let set = TileSet {
            sheet_size: UVec2::new(37, 20),
            tile_size: UVec2::splat(16),
            separation: UVec2::ONE,
            margin: UVec2::splat(2),
        };
        assert_eq!((set.columns(), set.rows()), (2, 1));
        assert_eq!(
            set.source_rect(1),
            Some(SourceRect { x: 19, y: 2, width: 16, height: 16 })
        );
    }

    #[test]
    fn test_sheet_smaller_than_tile() {
        let tiny = TileSet::new(UVec2::new(8, 8), UVec2::splat(16));
        assert!(tiny.is_empty());
        assert!(tiny.source_rect(0).is_none());
    }
}
