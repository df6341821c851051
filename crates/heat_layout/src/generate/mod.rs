//! Dataset generation: per-sample tasks, job configuration, the worker pool and
//! its events.
pub mod config;
pub mod events;
pub mod runner;
pub mod task;

pub use config::{BoundarySpec, JobConfig, DEFAULT_DIRICHLET_VALUE};
pub use events::{EventSink, FnSink, GenerationEvent, GenerationEventKind, VecSink};
pub use runner::{GenerationJob, JobSummary, SampleConsumer};
pub use task::{SampleResult, SampleTask, DEFAULT_MAX_ATTEMPTS};
