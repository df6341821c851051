//! Heat-source components placed on the board.
//!
//! A [`ComponentSet`] is validated once from per-component arrays and then shared
//! read-only by every sample of a generation job.
pub mod component;
pub mod special;

pub use component::{
    AngleUnit, Component, ComponentArrays, ComponentSet, Geometry, LayoutOptions, PositionUnit,
    PowerDistribution, ANGLE_TOLERANCE,
};
pub use special::{SourceSelection, SpecialSources};
