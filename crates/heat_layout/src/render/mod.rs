//! Rasterization of component sets into intensity and overlap grids.
//!
//! Each component is stamped unrotated into a padded `3N × 3N` buffer (halo of
//! `N` cells on every side), rotated there when needed, cropped to the `N × N`
//! board and added to the running totals.
use tracing::trace;

use crate::error::{Error, Result};
use crate::grid::{CellGrid, Raster};
use crate::layout::{ComponentSet, SourceSelection};

pub mod rotate;
pub mod shape;

pub use rotate::rotate_footprint;

/// Intensity and overlap rasters sharing one grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Footprint {
    /// Summed intensity per cell.
    pub intensity: Raster<f64>,
    /// Number of components covering each cell.
    pub overlap: Raster<u32>,
}

impl Footprint {
    pub fn zeros(grid: CellGrid) -> Self {
        Self {
            intensity: Raster::new(grid),
            overlap: Raster::new(grid),
        }
    }

    pub fn grid(&self) -> CellGrid {
        self.overlap.grid
    }

    pub fn crop_interior(&self) -> Self {
        Self {
            intensity: self.intensity.crop_interior(),
            overlap: self.overlap.crop_interior(),
        }
    }

    pub fn accumulate(&mut self, other: &Footprint) {
        self.intensity.accumulate(&other.intensity);
        self.overlap.accumulate(&other.overlap);
    }
}

/// Renders the components of a [`ComponentSet`] onto its board.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer<'a> {
    components: &'a ComponentSet,
}

impl<'a> Rasterizer<'a> {
    pub fn new(components: &'a ComponentSet) -> Self {
        Self { components }
    }

    /// Render every selected component with its sampled intensity and sum the results.
    ///
    /// `intensities` holds one value per component in set order. Deterministic:
    /// all randomness is already folded into `intensities` and `selection`.
    pub fn rasterize(&self, intensities: &[f64], selection: &SourceSelection) -> Result<Footprint> {
        if intensities.len() != self.components.len() {
            return Err(Error::ShapeMismatch {
                field: "intensities",
                expected: self.components.len(),
                found: intensities.len(),
            });
        }

        let mut total = Footprint::zeros(self.components.domain().grid());
        for (index, own) in intensities.iter().enumerate() {
            if selection.is_excluded(index) {
                trace!("Component {} is switched off for this sample.", index);
                continue;
            }
            let intensity = match selection {
                SourceSelection::SharedConstant => intensities[0],
                _ => *own,
            };
            total.accumulate(&self.render_component(index, intensity)?);
        }
        Ok(total)
    }

    /// Render component `index` alone with the given intensity, cropped to the board.
    pub fn render_component(&self, index: usize, intensity: f64) -> Result<Footprint> {
        let component = self.components.get(index).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "component index {index} out of range for {} component(s)",
                self.components.len()
            ))
        })?;
        let domain = self.components.domain();

        let mut padded = Footprint::zeros(domain.padded_grid());
        shape::stamp(
            domain,
            component,
            intensity,
            self.components.gaussian_param(),
            &mut padded,
        );

        if component.is_axis_aligned() {
            Ok(padded.crop_interior())
        } else {
            rotate_footprint(domain, index, component, &padded)
        }
    }

    /// Cells covered by component `index`, rendered with unit intensity.
    pub fn footprint(&self, index: usize) -> Result<Raster<u32>> {
        Ok(self.render_component(index, 1.0)?.overlap)
    }
}
