#![forbid(unsafe_code)]

mod dataset;
mod rendering;

pub use dataset::{load_job_config, DatasetWriter, SampleRecord};
pub use rendering::{
    heatmap_image, init_tracing, render_field_to_png, render_mask_to_png, HeatmapConfig,
};
