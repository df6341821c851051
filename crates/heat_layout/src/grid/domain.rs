//! Physical board description and the physical-to-cell mapping.
use std::fmt;
use std::str::FromStr;

use super::cells::CellGrid;
use crate::error::{Error, Result};

/// Outline of the board. Only square boards are discretized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardShape {
    #[default]
    Square,
}

impl FromStr for BoardShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "s" | "square" => Ok(BoardShape::Square),
            other => Err(Error::InvalidConfig(format!(
                "board shape '{other}' is not supported (square)"
            ))),
        }
    }
}

impl fmt::Display for BoardShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardShape::Square => f.write_str("square"),
        }
    }
}

/// Immutable board: physical side length in metres and cells per side.
///
/// Cell `i` sits at physical coordinate `i / resolution * side_length`; a physical
/// coordinate maps back with [`Domain::cell_index`], rounding half to even.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    shape: BoardShape,
    side_length: f64,
    resolution: usize,
}

impl Domain {
    /// Creates a square domain, rejecting non-positive lengths and empty grids.
    pub fn try_new(side_length: f64, resolution: usize) -> Result<Self> {
        Self::with_shape(BoardShape::Square, side_length, resolution)
    }

    pub fn with_shape(shape: BoardShape, side_length: f64, resolution: usize) -> Result<Self> {
        if !side_length.is_finite() || side_length <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "side_length must be > 0, got {side_length}"
            )));
        }
        if resolution == 0 {
            return Err(Error::InvalidConfig("grid resolution must be > 0".into()));
        }
        Ok(Self {
            shape,
            side_length,
            resolution,
        })
    }

    pub fn shape(&self) -> BoardShape {
        self.shape
    }

    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Physical edge length of one cell.
    pub fn cell_size(&self) -> f64 {
        self.side_length / self.resolution as f64
    }

    /// Continuous cell coordinate of a physical coordinate.
    #[inline]
    pub fn to_cells(&self, coord: f64) -> f64 {
        coord / self.side_length * self.resolution as f64
    }

    /// Nearest cell index of a physical coordinate (ties to even).
    #[inline]
    pub fn cell_index(&self, coord: f64) -> isize {
        self.to_cells(coord).round_ties_even() as isize
    }

    /// Cell index containing a physical coordinate.
    #[inline]
    pub fn cell_index_floor(&self, coord: f64) -> isize {
        self.to_cells(coord).floor() as isize
    }

    /// Physical coordinate of the centre of cell `i`.
    #[inline]
    pub fn cell_centre(&self, i: isize) -> f64 {
        (i as f64 + 0.5) / self.resolution as f64 * self.side_length
    }

    /// The `resolution × resolution` output grid.
    pub fn grid(&self) -> CellGrid {
        CellGrid::square(self.resolution)
    }

    /// Working buffer: the output grid padded by one full board width on every side.
    pub fn padded_grid(&self) -> CellGrid {
        CellGrid::square(self.resolution).with_halo(self.resolution)
    }
}
