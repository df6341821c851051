#![forbid(unsafe_code)]
//! heat_layout: heat-source layout rasterization and sampling for temperature-field
//! reconstruction datasets.
//!
//! Modules:
//! - grid: board domain, halo-padded cell grids and rasters
//! - layout: components, validated component sets, special (switched-off) sources
//! - sampling: intensity distributions and random primitives
//! - render: footprint rasterization and inverse-mapped rotation
//! - monitor: monitoring-point masks (random, uniform, center)
//! - generate: sample tasks, job configuration, worker pool, events
//!
//! The PDE solve is not part of this crate; generated layouts are handed to a
//! [`generate::SampleConsumer`] together with the job's monitoring mask.
pub mod error;
pub mod generate;
pub mod grid;
pub mod layout;
pub mod monitor;
pub mod render;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use heat_layout::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::generate::{
        BoundarySpec, EventSink, FnSink, GenerationEvent, GenerationEventKind, GenerationJob,
        JobConfig, JobSummary, SampleConsumer, SampleResult, SampleTask, VecSink,
    };
    pub use crate::grid::{BoardShape, CellGrid, Domain, Raster};
    pub use crate::layout::{
        AngleUnit, Component, ComponentArrays, ComponentSet, Geometry, LayoutOptions,
        PositionUnit, PowerDistribution, SourceSelection, SpecialSources,
    };
    pub use crate::monitor::{
        CenterMonitoring, MonitorMask, MonitorSampling, MonitorStrategy, RandomMonitoring,
        UniformMonitoring,
    };
    pub use crate::render::{Footprint, Rasterizer};
    pub use crate::sampling::{IntensitySampler, IntensitySpec};
}
