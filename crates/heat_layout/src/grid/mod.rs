//! Discretized board geometry shared by every stage of sample generation.
//!
//! [`Domain`] maps physical board coordinates onto cell indices, [`CellGrid`]
//! describes a (possibly halo-padded) cell layout and [`Raster`] stores one value
//! per cell of such a layout.
pub mod cells;
pub mod domain;
pub mod raster;

pub use cells::CellGrid;
pub use domain::{BoardShape, Domain};
pub use raster::Raster;
