//! Monitoring points anchored on components, board edges and free space.
use rand::Rng as RngCore;
use tracing::warn;

use crate::error::{Error, Result};
use crate::layout::{ComponentSet, SourceSelection};
use crate::monitor::{evenly_spaced, MonitorMask, MonitorSampling};
use crate::render::Rasterizer;
use crate::sampling::choose_distinct;

/// Upper bound (exclusive) on points per component.
pub const COMPONENT_POINTS_MAX: usize = 200;
/// Upper bound (exclusive) on background points.
pub const REGION_POINTS_MAX: usize = 50_000;

/// Component-centred monitoring.
///
/// * `component`: `1` marks each component's centre cell; larger values add
///   `component - 1` random cells of that component's own footprint.
/// * `boundary`: evenly spaced points along all four board edges.
/// * `region`: random cells covered by no component.
#[derive(Debug, Clone)]
pub struct CenterMonitoring {
    pub component: usize,
    pub boundary: usize,
    pub region: usize,
}

impl CenterMonitoring {
    pub fn new(component: usize, boundary: usize, region: usize) -> Self {
        Self {
            component,
            boundary,
            region,
        }
    }

    fn validate(&self, n: usize) -> Result<()> {
        let limits = [
            ("component", self.component, COMPONENT_POINTS_MAX),
            ("boundary", self.boundary, n),
            ("region", self.region, REGION_POINTS_MAX),
        ];
        for (name, count, max) in limits {
            if count >= max {
                return Err(Error::InvalidConfig(format!(
                    "center monitoring {name} count must be below {max}, got {count}"
                )));
            }
        }
        Ok(())
    }
}

impl MonitorSampling for CenterMonitoring {
    fn plan(&self, components: &ComponentSet, rng: &mut dyn RngCore) -> Result<MonitorMask> {
        let domain = components.domain();
        let n = domain.resolution();
        self.validate(n)?;

        let mut mask = MonitorMask::new(domain.grid());
        let rasterizer = Rasterizer::new(components);
        let last = n as isize - 1;

        if self.component >= 1 {
            for c in components {
                let col = domain.cell_index_floor(c.position.x).clamp(0, last);
                let row = domain.cell_index_floor(c.position.y).clamp(0, last);
                mask.mark(row as usize, col as usize);
            }
        }
        if self.component > 1 {
            for index in 0..components.len() {
                let covered: Vec<(usize, usize)> = rasterizer
                    .footprint(index)?
                    .interior_cells()
                    .filter(|(_, _, v)| *v > 0)
                    .map(|(r, c, _)| (r, c))
                    .collect();
                for (row, col) in choose_distinct(&covered, self.component - 1, rng) {
                    mask.mark(row, col);
                }
            }
        }

        for m in evenly_spaced(n, self.boundary) {
            mask.mark(m, 0);
            mask.mark(0, m);
            mask.mark(n - 1, m);
            mask.mark(m, n - 1);
        }

        if self.region > 0 {
            let ones = vec![1.0; components.len()];
            let free: Vec<(usize, usize)> = rasterizer
                .rasterize(&ones, &SourceSelection::All)?
                .overlap
                .interior_cells()
                .filter(|(_, _, v)| *v == 0)
                .map(|(r, c, _)| (r, c))
                .collect();
            if self.region > free.len() {
                warn!(
                    "Requested {} background monitoring points but only {} free cells exist.",
                    self.region,
                    free.len()
                );
            }
            for (row, col) in choose_distinct(&free, self.region, rng) {
                mask.mark(row, col);
            }
        }

        Ok(mask)
    }
}
