// src/grid.rs
//
// Glyph grid - partitions a font image into addressable cells.
//
// This module is the single source of truth for "which pixels belong to cell
// (row, col)?" and its inverse "which cell holds pixel (x, y)?".

use crate::error::{FontError, Result};
use crate::surface::GlyphRect;

/// One grid-partitioned region of the source image.
///
/// Recomputed whenever the grid resolution changes; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphCell {
    pub row: usize,
    pub col: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GlyphCell {
    /// The cell's pixel rectangle, detached from its grid address.
    pub fn rect(&self) -> GlyphRect {
        GlyphRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Splits a fixed-size image into `rows` x `cols` equally sized cells.
///
/// Cell size is `image / resolution` by integer division. Remainder pixels on
/// the right and bottom edges belong to no cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    image_width: u32,
    image_height: u32,
    rows: usize,
    cols: usize,
    cell_width: u32,
    cell_height: u32,
}

impl GlyphGrid {
    /// Creates a grid over an image of the given size.
    pub fn new(image_width: u32, image_height: u32, rows: usize, cols: usize) -> Result<Self> {
        let mut grid = GlyphGrid {
            image_width,
            image_height,
            rows: 0,
            cols: 0,
            cell_width: 0,
            cell_height: 0,
        };
        grid.set_resolution(rows, cols)?;
        Ok(grid)
    }

    /// Changes the grid resolution.
    ///
    /// Fails with `InvalidResolution` (leaving the grid unchanged) when either
    /// dimension is zero or the resulting cells would have zero area.
    pub fn set_resolution(&mut self, rows: usize, cols: usize) -> Result<()> {
        let invalid = FontError::InvalidResolution {
            rows,
            cols,
            width: self.image_width,
            height: self.image_height,
        };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }
        let cell_width = (self.image_width as u64 / cols as u64) as u32;
        let cell_height = (self.image_height as u64 / rows as u64) as u32;
        if cell_width == 0 || cell_height == 0 {
            return Err(invalid);
        }

        self.rows = rows;
        self.cols = cols;
        self.cell_width = cell_width;
        self.cell_height = cell_height;
        log::debug!(
            "Grid resolution set to {}x{} ({}x{} px cells)",
            rows,
            cols,
            cell_width,
            cell_height
        );
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Size of every cell in pixels, `(width, height)`.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Size of the underlying image, `(width, height)`.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Returns the cell at `(row, col)`.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<GlyphCell> {
        if row >= self.rows || col >= self.cols {
            return Err(FontError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(GlyphCell {
            row,
            col,
            x: col as u32 * self.cell_width,
            y: row as u32 * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        })
    }

    /// The inverse lookup: maps an image pixel to its `(row, col)`.
    ///
    /// Returns `None` for pixels outside the image or in the unused
    /// remainder strip on the right/bottom edge.
    pub fn cell_at_point(&self, px: u32, py: u32) -> Option<(usize, usize)> {
        let col = (px / self.cell_width) as usize;
        let row = (py / self.cell_height) as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((row, col))
    }

    /// Like [`cell_at_point`](Self::cell_at_point) but clamps to the nearest
    /// cell instead of failing.
    pub fn clamped_cell_at_point(&self, px: u32, py: u32) -> (usize, usize) {
        let col = ((px / self.cell_width) as usize).min(self.cols - 1);
        let row = ((py / self.cell_height) as usize).min(self.rows - 1);
        (row, col)
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GlyphCell> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| GlyphCell {
                row,
                col,
                x: col as u32 * self.cell_width,
                y: row as u32 * self.cell_height,
                width: self.cell_width,
                height: self.cell_height,
            })
        })
    }

    /// Bounding rectangle of the cells between two corners (inclusive, any order).
    pub fn span_rect(&self, a: (usize, usize), b: (usize, usize)) -> Result<GlyphRect> {
        let first = self.cell_at(a.0.min(b.0), a.1.min(b.1))?;
        let last = self.cell_at(a.0.max(b.0), a.1.max(b.1))?;
        Ok(first.rect().union(&last.rect()))
    }
}
