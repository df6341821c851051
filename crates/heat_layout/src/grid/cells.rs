//! Cell layout with optional halo cells around the interior region.
//!
//! The rasterizer renders each component into a buffer padded by one full board
//! width on every side, so that rotated or overflowing footprints never index
//! out of bounds before they are cropped back to the interior.

/// A 2D cell layout of `width × height` interior cells surrounded by `halo` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellGrid {
    /// Number of interior cells in X (columns).
    pub width: usize,
    /// Number of interior cells in Y (rows).
    pub height: usize,
    /// Halo cell count on each side.
    pub halo: usize,
}

impl CellGrid {
    /// Interior-only grid of `width × height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            halo: 0,
        }
    }

    /// Square grid of `n × n` cells.
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Sets the halo size.
    pub fn with_halo(mut self, halo: usize) -> Self {
        self.halo = halo;
        self
    }

    /// Total width including halo regions.
    pub fn total_width(&self) -> usize {
        self.width + 2 * self.halo
    }

    /// Total height including halo regions.
    pub fn total_height(&self) -> usize {
        self.height + 2 * self.halo
    }

    /// Number of stored cells including halo.
    pub fn len(&self) -> usize {
        self.total_width() * self.total_height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same layout without its halo.
    pub fn interior(&self) -> Self {
        Self::new(self.width, self.height)
    }

    /// Converts interior cell coordinates (negative values reach into the halo) to a
    /// linear storage index, or `None` when the cell lies outside the padded buffer.
    pub fn storage_index(&self, ix: isize, iy: isize) -> Option<usize> {
        let px = ix + self.halo as isize;
        let py = iy + self.halo as isize;
        if px < 0 || py < 0 {
            return None;
        }
        let (px, py) = (px as usize, py as usize);
        if px >= self.total_width() || py >= self.total_height() {
            return None;
        }
        Some(py * self.total_width() + px)
    }

    /// Whether interior coordinates address a cell of the interior region.
    pub fn is_interior(&self, ix: isize, iy: isize) -> bool {
        ix >= 0 && iy >= 0 && (ix as usize) < self.width && (iy as usize) < self.height
    }

    /// Whether interior coordinates address any stored cell, halo included.
    pub fn contains(&self, ix: isize, iy: isize) -> bool {
        self.storage_index(ix, iy).is_some()
    }

    /// Interior coordinates of the storage slot `i`.
    pub fn coords_of(&self, i: usize) -> (isize, isize) {
        let w = self.total_width();
        let px = (i % w) as isize;
        let py = (i / w) as isize;
        (px - self.halo as isize, py - self.halo as isize)
    }
}
