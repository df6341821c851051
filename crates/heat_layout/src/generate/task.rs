//! Production of a single sample: intensity draw, special selection and rasterization.
use rand::Rng as RngCore;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::grid::Raster;
use crate::layout::ComponentSet;
use crate::render::Rasterizer;
use crate::sampling::IntensitySampler;

/// Intensity draws per sample before the task gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// One generated layout.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleResult {
    /// Layout intensity field `F`, indexed `(row = y, col = x)`.
    pub f: Raster<f64>,
    /// Number of components covering each cell.
    pub overlap: Raster<u32>,
    /// Sampled intensity per component, in component order.
    pub intensities: Vec<f64>,
    /// Intensity draws needed to obtain a usable sample.
    pub attempts: usize,
}

/// Produces samples from a shared [`ComponentSet`].
#[derive(Clone, Copy, Debug)]
pub struct SampleTask<'a> {
    components: &'a ComponentSet,
    max_attempts: usize,
}

impl<'a> SampleTask<'a> {
    pub fn new(components: &'a ComponentSet) -> Self {
        Self {
            components,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn components(&self) -> &'a ComponentSet {
        self.components
    }

    /// Draw intensities, select special sources and rasterize.
    ///
    /// A draw with any non-finite intensity is discarded and redrawn, up to
    /// `max_attempts` times ([`Error::SamplingExhausted`]). Overlapping components
    /// fail with [`Error::LayoutOverlap`] and are never retried.
    pub fn produce_sample(&self, rng: &mut dyn RngCore) -> Result<SampleResult> {
        let sampler = IntensitySampler::new(self.components);
        let rasterizer = Rasterizer::new(self.components);

        for attempt in 1..=self.max_attempts {
            let intensities = sampler.sample(rng);
            if let Some(bad) = intensities.iter().position(|v| !v.is_finite()) {
                warn!(
                    "Attempt {}/{}: component {} drew a non-finite intensity; redrawing.",
                    attempt, self.max_attempts, bad
                );
                continue;
            }

            let selection = self
                .components
                .special()
                .select(self.components.len(), rng);
            let footprint = rasterizer.rasterize(&intensities, &selection)?;
            let result = SampleResult {
                f: footprint.intensity,
                overlap: footprint.overlap,
                intensities,
                attempts: attempt,
            };
            check_overlap(&result.overlap)?;
            debug!(
                "Sample ready after {} attempt(s) with selection {:?}.",
                attempt, selection
            );
            return Ok(result);
        }

        Err(Error::SamplingExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Whether any cell of `sample` is covered by more than one component.
    pub fn is_overlapping(sample: &SampleResult) -> bool {
        sample.overlap.max_value().is_some_and(|m| m > 1)
    }
}

fn check_overlap(overlap: &Raster<u32>) -> Result<()> {
    let max_count = overlap.max_value().unwrap_or(0);
    if max_count <= 1 {
        return Ok(());
    }
    let cells = overlap.count_where(|v| v > 1);
    error!(
        "Layout overlap: {} cell(s) covered by up to {} components.",
        cells, max_count
    );
    Err(Error::LayoutOverlap { cells, max_count })
}
