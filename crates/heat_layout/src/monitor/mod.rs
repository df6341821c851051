//! Monitoring-point planning.
//!
//! A [`MonitorMask`] marks the cells where the solved temperature field is
//! observed. It is planned once per generation job and shared read-only by every
//! sample.
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::grid::{CellGrid, Raster};
use crate::layout::ComponentSet;

pub mod center;
pub mod random;
pub mod uniform;

pub use center::CenterMonitoring;
pub use random::RandomMonitoring;
pub use uniform::UniformMonitoring;

/// Trait for monitoring-point placement.
pub trait MonitorSampling: Send + Sync {
    fn plan(&self, components: &ComponentSet, rng: &mut dyn RngCore) -> Result<MonitorMask>;
}

/// Binary mask over the board; `1` marks a monitoring point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorMask {
    raster: Raster<u8>,
}

impl MonitorMask {
    /// Empty mask over `grid`.
    pub fn new(grid: CellGrid) -> Self {
        Self {
            raster: Raster::new(grid),
        }
    }

    pub fn grid(&self) -> CellGrid {
        self.raster.grid
    }

    pub fn raster(&self) -> &Raster<u8> {
        &self.raster
    }

    /// Mark `(row, col)`; out-of-board cells are ignored.
    pub fn mark(&mut self, row: usize, col: usize) {
        self.raster.set(col as isize, row as isize, 1);
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.raster.at(row, col) != 0
    }

    /// Number of monitoring points.
    pub fn count(&self) -> usize {
        self.raster.count_where(|v| v != 0)
    }

    /// Monitoring points as `(row, col)` in row-major order.
    pub fn points(&self) -> Vec<(usize, usize)> {
        self.raster
            .interior_cells()
            .filter(|(_, _, v)| *v != 0)
            .map(|(r, c, _)| (r, c))
            .collect()
    }

    /// Observed field `u ⊙ mask`.
    pub fn observe(&self, u: &Raster<f64>) -> Result<Raster<f64>> {
        if u.grid != self.raster.grid {
            return Err(Error::InvalidConfig(format!(
                "field grid {}x{} does not match monitor grid {}x{}",
                u.grid.width, u.grid.height, self.raster.grid.width, self.raster.grid.height
            )));
        }
        let data = u
            .data
            .iter()
            .zip(self.raster.data.iter())
            .map(|(v, m)| if *m != 0 { *v } else { 0.0 })
            .collect();
        Raster::from_vec(u.grid, data)
    }
}

/// Serializable choice of monitoring strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonitorStrategy {
    /// `count` random cells; more than `N²` is an error.
    Random {
        count: usize,
    },
    Uniform {
        rows: usize,
        cols: usize,
    },
    Center {
        component: usize,
        boundary: usize,
        region: usize,
    },
}

impl MonitorStrategy {
    /// Parse the list form `tag, counts...`, e.g. `("uniform", [4, 6])`.
    ///
    /// `uniform` with a single count uses it for rows and columns. `center`
    /// counts default to zero for the boundary and region when omitted.
    pub fn from_tagged(tag: &str, params: &[i64]) -> Result<Self> {
        let counts = params
            .iter()
            .map(|&p| {
                usize::try_from(p).map_err(|_| {
                    Error::InvalidConfig(format!("monitor count must be >= 0, got {p}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let arity = |allowed: std::ops::RangeInclusive<usize>| -> Result<()> {
            if allowed.contains(&counts.len()) {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "monitor strategy '{tag}' takes {}..={} count(s), got {}",
                    allowed.start(),
                    allowed.end(),
                    counts.len()
                )))
            }
        };

        match tag {
            "random" => {
                arity(1..=1)?;
                Ok(Self::Random { count: counts[0] })
            }
            "uniform" => {
                arity(1..=2)?;
                Ok(Self::Uniform {
                    rows: counts[0],
                    cols: counts.get(1).copied().unwrap_or(counts[0]),
                })
            }
            "center" => {
                arity(1..=3)?;
                Ok(Self::Center {
                    component: counts[0],
                    boundary: counts.get(1).copied().unwrap_or(0),
                    region: counts.get(2).copied().unwrap_or(0),
                })
            }
            other => Err(Error::InvalidConfig(format!(
                "monitor strategy '{other}' is not supported (random, uniform, center)"
            ))),
        }
    }

    /// Runtime strategy for this definition.
    pub fn to_sampling(&self) -> Box<dyn MonitorSampling> {
        match *self {
            Self::Random { count } => Box::new(RandomMonitoring::new(count)),
            Self::Uniform { rows, cols } => Box::new(UniformMonitoring::new(rows, cols)),
            Self::Center {
                component,
                boundary,
                region,
            } => Box::new(CenterMonitoring::new(component, boundary, region)),
        }
    }

    pub fn plan(&self, components: &ComponentSet, rng: &mut dyn RngCore) -> Result<MonitorMask> {
        self.to_sampling().plan(components, rng)
    }
}

/// Evenly spaced indices in `0..n`: the middle index for a single point,
/// otherwise every `n / (count - 1)` cells from 0 with a final `n` pulled back to `n - 1`.
///
/// The stride is floored, so more than `count` indices may come back.
pub(crate) fn evenly_spaced(n: usize, count: usize) -> Vec<usize> {
    match count {
        0 => Vec::new(),
        1 => vec![n / 2],
        _ => {
            let step = (n / (count - 1)).max(1);
            let mut indices: Vec<usize> = (0..=n).step_by(step).collect();
            if let Some(last) = indices.last_mut() {
                if *last == n {
                    *last = n.saturating_sub(1);
                }
            }
            indices
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evenly_spaced_clamps_the_far_edge() {
        assert_eq!(evenly_spaced(10, 1), vec![5]);
        assert_eq!(evenly_spaced(10, 2), vec![0, 9]);
        assert_eq!(evenly_spaced(10, 3), vec![0, 5, 9]);
        assert_eq!(evenly_spaced(10, 4), vec![0, 3, 6, 9]);
        assert_eq!(evenly_spaced(8, 4), vec![0, 2, 4, 6, 7]);
        assert!(evenly_spaced(10, 0).is_empty());
    }

    #[test]
    fn from_tagged_fills_defaults() {
        assert_eq!(
            MonitorStrategy::from_tagged("uniform", &[4]).unwrap(),
            MonitorStrategy::Uniform { rows: 4, cols: 4 }
        );
        assert_eq!(
            MonitorStrategy::from_tagged("center", &[2, 5]).unwrap(),
            MonitorStrategy::Center {
                component: 2,
                boundary: 5,
                region: 0
            }
        );
        assert_eq!(
            MonitorStrategy::from_tagged("random", &[30]).unwrap(),
            MonitorStrategy::Random { count: 30 }
        );
    }

    #[test]
    fn from_tagged_rejects_bad_input() {
        assert!(MonitorStrategy::from_tagged("random", &[-1]).is_err());
        assert!(MonitorStrategy::from_tagged("random", &[1, 2]).is_err());
        assert!(MonitorStrategy::from_tagged("center", &[]).is_err());
        assert!(MonitorStrategy::from_tagged("spiral", &[3]).is_err());
    }

    #[test]
    fn observe_masks_field() {
        let grid = CellGrid::square(2);
        let mut mask = MonitorMask::new(grid);
        mask.mark(0, 1);
        mask.mark(7, 7);
        assert_eq!(mask.count(), 1);
        assert_eq!(mask.points(), vec![(0, 1)]);
        assert!(mask.contains(0, 1));
        assert!(!mask.contains(1, 0));

        let u = Raster::from_vec(grid, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(mask.observe(&u).unwrap().data, vec![0.0, 2.0, 0.0, 0.0]);

        let wrong: Raster<f64> = Raster::new(CellGrid::square(3));
        assert!(mask.observe(&wrong).is_err());
    }
}
