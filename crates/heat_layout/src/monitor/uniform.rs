//! Regular lattice of monitoring points.
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::layout::ComponentSet;
use crate::monitor::{evenly_spaced, MonitorMask, MonitorSampling};

/// Evenly spaced rows crossed with evenly spaced columns. Uses no randomness.
#[derive(Debug, Clone)]
pub struct UniformMonitoring {
    pub rows: usize,
    pub cols: usize,
}

impl UniformMonitoring {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl MonitorSampling for UniformMonitoring {
    fn plan(&self, components: &ComponentSet, _rng: &mut dyn RngCore) -> Result<MonitorMask> {
        let n = components.domain().resolution();
        for (name, count) in [("rows", self.rows), ("cols", self.cols)] {
            if count < 1 || count >= n {
                return Err(Error::InvalidConfig(format!(
                    "uniform monitoring {name} must be in 1..{n}, got {count}"
                )));
            }
        }

        let cols = evenly_spaced(n, self.cols);
        let mut mask = MonitorMask::new(components.domain().grid());
        for row in evenly_spaced(n, self.rows) {
            for &col in &cols {
                mask.mark(row, col);
            }
        }
        Ok(mask)
    }
}
