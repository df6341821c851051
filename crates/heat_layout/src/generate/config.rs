//! Job configuration for dataset generation.
use crate::error::{Error, Result};
use crate::generate::task::DEFAULT_MAX_ATTEMPTS;
use crate::grid::{BoardShape, Domain};
use crate::layout::{ComponentArrays, ComponentSet, LayoutOptions};
use crate::monitor::MonitorStrategy;

/// Default Dirichlet temperature, in kelvin.
pub const DEFAULT_DIRICHLET_VALUE: f64 = 298.0;

/// Boundary condition handed through to the external solver.
///
/// `line` is `[[x0, y0], [x1, y1]]` in physical coordinates. Unset temperatures
/// fall back to [`JobConfig::dirichlet_value`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundarySpec {
    /// Constant temperature along a segment.
    Sink {
        line: [[f64; 2]; 2],
        #[cfg_attr(feature = "serde", serde(default))]
        value: Option<f64>,
    },
    /// Sinusoidal temperature profile along a segment.
    SineWave {
        line: [[f64; 2]; 2],
        #[cfg_attr(feature = "serde", serde(default))]
        base: Option<f64>,
        amplitude: f64,
    },
}

impl BoundarySpec {
    pub fn line(&self) -> [[f64; 2]; 2] {
        match self {
            BoundarySpec::Sink { line, .. } | BoundarySpec::SineWave { line, .. } => *line,
        }
    }

    /// Base temperature, or `default` when none is configured.
    pub fn base_value(&self, default: f64) -> f64 {
        match self {
            BoundarySpec::Sink { value, .. } => value.unwrap_or(default),
            BoundarySpec::SineWave { base, .. } => base.unwrap_or(default),
        }
    }

    fn validate(&self, side_length: f64) -> Result<()> {
        let [a, b] = self.line();
        let on_board = |p: [f64; 2]| {
            p.iter()
                .all(|v| v.is_finite() && (0.0..=side_length).contains(v))
        };
        if !on_board(a) || !on_board(b) {
            return Err(Error::InvalidConfig(format!(
                "boundary segment {a:?}..{b:?} leaves the board"
            )));
        }
        if a == b {
            return Err(Error::InvalidConfig(format!(
                "boundary segment at {a:?} has zero length"
            )));
        }
        Ok(())
    }
}

/// Everything a generation job needs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JobConfig {
    pub board_shape: BoardShape,
    /// Board side length in metres.
    pub length: f64,
    /// Cells per board side.
    pub resolution: usize,
    pub components: ComponentArrays,
    pub layout: LayoutOptions,
    pub monitoring: MonitorStrategy,
    /// Number of samples to produce.
    pub samples: usize,
    /// Worker threads.
    pub workers: usize,
    pub seed: u64,
    /// Intensity draws per sample before giving up.
    pub max_attempts: usize,
    pub boundaries: Vec<BoundarySpec>,
    pub dirichlet_value: f64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            board_shape: BoardShape::Square,
            length: 0.1,
            resolution: 200,
            components: ComponentArrays::new(),
            layout: LayoutOptions::default(),
            monitoring: MonitorStrategy::Uniform { rows: 4, cols: 4 },
            samples: 1,
            workers: 1,
            seed: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            boundaries: Vec::new(),
            dirichlet_value: DEFAULT_DIRICHLET_VALUE,
        }
    }
}

impl JobConfig {
    /// Creates a new [`JobConfig`] for a square board.
    pub fn new(length: f64, resolution: usize) -> Self {
        Self {
            length,
            resolution,
            ..Default::default()
        }
    }

    pub fn with_components(mut self, components: ComponentArrays) -> Self {
        self.components = components;
        self
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_monitoring(mut self, monitoring: MonitorStrategy) -> Self {
        self.monitoring = monitoring;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundarySpec) -> Self {
        self.boundaries.push(boundary);
        self
    }

    pub fn with_dirichlet_value(mut self, value: f64) -> Self {
        self.dirichlet_value = value;
        self
    }

    /// Validates the job-level settings. Component placement is checked by
    /// [`JobConfig::component_set`].
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be >= 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        if !self.dirichlet_value.is_finite() {
            return Err(Error::InvalidConfig("dirichlet_value must be finite".into()));
        }
        let domain = self.domain()?;
        for boundary in &self.boundaries {
            boundary.validate(domain.side_length())?;
        }
        Ok(())
    }

    pub fn domain(&self) -> Result<Domain> {
        Domain::with_shape(self.board_shape, self.length, self.resolution)
    }

    pub fn component_set(&self) -> Result<ComponentSet> {
        ComponentSet::from_arrays(self.domain()?, &self.components, self.layout)
    }

    /// Parse a RON job description.
    #[cfg(feature = "ron")]
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::InvalidConfig(format!("job config: {e}")))
    }
}
