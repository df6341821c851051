//! Uniformly random monitoring points.
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::layout::ComponentSet;
use crate::monitor::{MonitorMask, MonitorSampling};
use crate::sampling::choose_distinct;

/// `count` distinct cells drawn uniformly over the whole board.
///
/// Planning fails with [`Error::InvalidConfig`] when `count` exceeds the `N²`
/// cells of the board.
#[derive(Debug, Clone)]
pub struct RandomMonitoring {
    pub count: usize,
}

impl RandomMonitoring {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl MonitorSampling for RandomMonitoring {
    fn plan(&self, components: &ComponentSet, rng: &mut dyn RngCore) -> Result<MonitorMask> {
        let grid = components.domain().grid();
        let cells = grid.len();
        if self.count > cells {
            return Err(Error::InvalidConfig(format!(
                "random monitoring asks for {} points on a board of {cells} cells",
                self.count
            )));
        }

        let linear: Vec<usize> = (0..cells).collect();
        let mut mask = MonitorMask::new(grid);
        for i in choose_distinct(&linear, self.count, rng) {
            mask.mark(i / grid.width, i % grid.width);
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::grid::Domain;
    use crate::layout::{ComponentArrays, LayoutOptions};

    fn empty_board(n: usize) -> ComponentSet {
        ComponentSet::from_arrays(
            Domain::try_new(0.1, n).unwrap(),
            &ComponentArrays::new(),
            LayoutOptions::new(),
        )
        .unwrap()
    }

    #[test]
    fn marks_exactly_count_cells() {
        let set = empty_board(10);
        let mut rng = StdRng::seed_from_u64(11);
        let mask = RandomMonitoring::new(37).plan(&set, &mut rng).unwrap();
        assert_eq!(mask.count(), 37);
    }

    #[test]
    fn whole_board_and_overflow() {
        let set = empty_board(4);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(RandomMonitoring::new(16).plan(&set, &mut rng).unwrap().count(), 16);
        assert!(RandomMonitoring::new(17).plan(&set, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_mask() {
        let set = empty_board(12);
        let a = RandomMonitoring::new(20)
            .plan(&set, &mut StdRng::seed_from_u64(4))
            .unwrap();
        let b = RandomMonitoring::new(20)
            .plan(&set, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(a, b);
    }
}
