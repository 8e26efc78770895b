//! Dense 2D grid of optional cells, row-major

use glam::UVec2;

#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<Option<T>>,
}

impl<T> TileGrid<T> {
    /// Empty grid of `width` x `height` cells
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    /// Grid over row-major `cells`; `None` when the length does not match
    pub fn from_cells(width: u32, height: u32, cells: Vec<Option<T>>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Cell contents; out-of-range cells read as empty
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    /// Store a value, returning the previous one. Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: T) -> Option<T> {
        let i = self.index(x, y)?;
        self.cells[i].replace(value)
    }

    /// Empty a cell, returning what it held
    pub fn take(&mut self, x: u32, y: u32) -> Option<T> {
        let i = self.index(x, y)?;
        self.cells[i].take()
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (UVec2, &T)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|v| (UVec2::new(i as u32 % width, i as u32 / width), v))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
