//! Raster storage for per-cell values.
//!
//! Stores one value per cell of a [`CellGrid`], halo included. Coordinates are
//! `(ix, iy)` = `(column, row)` relative to the interior origin.
use std::ops::AddAssign;

use super::cells::CellGrid;
use crate::error::{Error, Result};

/// A row-major raster with a cell grid for spatial reference.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Raster<T> {
    pub grid: CellGrid,
    pub data: Vec<T>,
}

impl<T: Copy + Default> Raster<T> {
    /// Create a new raster with the given cell grid, initializing all values to `T::default()`.
    pub fn new(grid: CellGrid) -> Self {
        Self {
            grid,
            data: vec![T::default(); grid.len()],
        }
    }

    /// Wrap existing row-major data; the length must match the grid including halo.
    pub fn from_vec(grid: CellGrid, data: Vec<T>) -> Result<Self> {
        if data.len() != grid.len() {
            return Err(Error::InvalidConfig(format!(
                "raster data has {} values, grid needs {}",
                data.len(),
                grid.len()
            )));
        }
        Ok(Self { grid, data })
    }

    /// Get the size of the raster as `(width, height)`, including halo regions.
    pub fn size(&self) -> (usize, usize) {
        (self.grid.total_width(), self.grid.total_height())
    }

    /// Get the value at the given cell, returning `T::default()` if out of bounds.
    pub fn get(&self, ix: isize, iy: isize) -> T {
        self.grid
            .storage_index(ix, iy)
            .map(|i| self.data[i])
            .unwrap_or_default()
    }

    /// Value at `(row, col)` of the interior.
    pub fn at(&self, row: usize, col: usize) -> T {
        self.get(col as isize, row as isize)
    }

    pub fn get_mut(&mut self, ix: isize, iy: isize) -> Option<&mut T> {
        let i = self.grid.storage_index(ix, iy)?;
        self.data.get_mut(i)
    }

    /// Set the value at the given cell; returns `false` when the cell is out of bounds.
    pub fn set(&mut self, ix: isize, iy: isize, value: T) -> bool {
        match self.get_mut(ix, iy) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Copy the interior region into a raster without halo.
    pub fn crop_interior(&self) -> Raster<T> {
        let interior = self.grid.interior();
        let mut data = Vec::with_capacity(interior.len());
        for iy in 0..interior.height as isize {
            for ix in 0..interior.width as isize {
                data.push(self.get(ix, iy));
            }
        }
        Raster {
            grid: interior,
            data,
        }
    }

    /// Iterate `(ix, iy, value)` over every stored cell, halo included.
    pub fn cells(&self) -> impl Iterator<Item = (isize, isize, T)> + '_ {
        self.data.iter().enumerate().map(|(i, v)| {
            let (ix, iy) = self.grid.coords_of(i);
            (ix, iy, *v)
        })
    }

    /// Iterate `(row, col, value)` over the interior cells only.
    pub fn interior_cells(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        self.cells().filter_map(|(ix, iy, v)| {
            self.grid
                .is_interior(ix, iy)
                .then_some((iy as usize, ix as usize, v))
        })
    }

    /// Apply `f` to every value.
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        F: Fn(T) -> U,
    {
        Raster {
            grid: self.grid,
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }

    /// Count the stored cells satisfying `pred`.
    pub fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(T) -> bool,
    {
        self.data.iter().filter(|v| pred(**v)).count()
    }
}

impl<T: Copy + Default + AddAssign> Raster<T> {
    /// Add `other` cell by cell. Both rasters must share the same grid.
    pub fn accumulate(&mut self, other: &Raster<T>) {
        debug_assert_eq!(self.grid, other.grid, "accumulate requires matching grids");
        for (dst, src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst += *src;
        }
    }
}

impl<T: Copy + Default + PartialOrd> Raster<T> {
    /// Largest stored value, or `None` for an empty raster.
    pub fn max_value(&self) -> Option<T> {
        self.data.iter().copied().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_grid() -> CellGrid {
        CellGrid::new(2, 2).with_halo(1)
    }

    #[test]
    fn new_initializes_with_zeroes() {
        let raster: Raster<f64> = Raster::new(make_grid());
        assert_eq!(raster.size(), (4, 4));
        assert!(raster.data.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn get_returns_default_outside_bounds() {
        let raster: Raster<u32> = Raster::new(make_grid());
        assert_eq!(raster.get(-2, -2), 0);
        assert_eq!(raster.get(10, 10), 0);
    }

    #[test]
    fn crop_interior_drops_halo() {
        let mut raster: Raster<u32> = Raster::new(make_grid());
        assert!(raster.set(-1, -1, 9));
        assert!(raster.set(1, 0, 3));
        assert!(!raster.set(3, 0, 1));

        let cropped = raster.crop_interior();
        assert_eq!(cropped.grid, CellGrid::new(2, 2));
        assert_eq!(cropped.data, vec![0, 3, 0, 0]);
        assert_eq!(cropped.at(0, 1), 3);
    }

    #[test]
    fn accumulate_and_max() {
        let grid = CellGrid::square(2);
        let mut a = Raster::from_vec(grid, vec![1u32, 0, 0, 1]).unwrap();
        let b = Raster::from_vec(grid, vec![1u32, 1, 0, 0]).unwrap();
        a.accumulate(&b);
        assert_eq!(a.data, vec![2, 1, 0, 1]);
        assert_eq!(a.max_value(), Some(2));
        assert_eq!(a.count_where(|v| v > 1), 1);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Raster::from_vec(CellGrid::square(2), vec![0.0f64; 3]).is_err());
    }

    #[test]
    fn interior_cells_report_row_and_col() {
        let mut raster: Raster<u8> = Raster::new(make_grid());
        raster.set(1, 0, 1);
        raster.set(-1, 0, 1);
        let hits: Vec<_> = raster
            .interior_cells()
            .filter(|(_, _, v)| *v > 0)
            .map(|(r, c, _)| (r, c))
            .collect();
        assert_eq!(hits, vec![(0, 1)]);
    }
}
