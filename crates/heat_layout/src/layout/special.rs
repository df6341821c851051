//! Special sources: components whose power is randomly switched off per sample.
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::sampling::choose_distinct;

/// Set-level configuration of randomly zeroed components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpecialSources {
    /// Whether special handling is active at all.
    pub enabled: bool,
    /// Number of components to zero per sample, `0..=N_c`.
    pub count: usize,
}

/// Which components contribute to one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSelection {
    /// Every component contributes its own sampled intensity.
    All,
    /// The listed component indices contribute nothing.
    Excluding(Vec<usize>),
    /// Every component contributes, all with the first sampled intensity.
    SharedConstant,
}

impl SourceSelection {
    pub fn is_excluded(&self, index: usize) -> bool {
        match self {
            SourceSelection::Excluding(indices) => indices.contains(&index),
            SourceSelection::All | SourceSelection::SharedConstant => false,
        }
    }
}

impl SpecialSources {
    /// No special handling.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Zero `count` randomly chosen components per sample.
    pub fn zeroing(count: usize) -> Self {
        Self {
            enabled: true,
            count,
        }
    }

    pub fn validate(&self, component_count: usize) -> Result<()> {
        if self.enabled && self.count > component_count {
            return Err(Error::InvalidConfig(format!(
                "special source count {} exceeds component count {component_count}",
                self.count
            )));
        }
        Ok(())
    }

    /// Draw the per-sample selection.
    ///
    /// `count == 0` consumes no randomness so it stays identical to disabled handling.
    /// `count == component_count` does not zero anything; instead every component
    /// shares the first sampled intensity.
    pub fn select(&self, component_count: usize, rng: &mut dyn RngCore) -> SourceSelection {
        if !self.enabled || self.count == 0 {
            return SourceSelection::All;
        }
        if self.count == component_count {
            return SourceSelection::SharedConstant;
        }
        let indices: Vec<usize> = (0..component_count).collect();
        SourceSelection::Excluding(choose_distinct(&indices, self.count, rng))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng as RngCore, SeedableRng};

    use super::*;

    #[test]
    fn zero_count_consumes_no_randomness() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        assert_eq!(SpecialSources::zeroing(0).select(4, &mut a), SourceSelection::All);
        assert_eq!(SpecialSources::disabled().select(4, &mut b), SourceSelection::All);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn full_count_selects_shared_constant() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            SpecialSources::zeroing(3).select(3, &mut rng),
            SourceSelection::SharedConstant
        );
    }

    #[test]
    fn partial_count_excludes_distinct_indices() {
        let mut rng = StdRng::seed_from_u64(2);
        match SpecialSources::zeroing(2).select(5, &mut rng) {
            SourceSelection::Excluding(mut idx) => {
                idx.sort_unstable();
                idx.dedup();
                assert_eq!(idx.len(), 2);
                assert!(idx.iter().all(|i| *i < 5));
            }
            other => panic!("unexpected selection {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_count_above_components() {
        assert!(SpecialSources::zeroing(4).validate(3).is_err());
        assert!(SpecialSources::zeroing(3).validate(3).is_ok());
        assert!(SpecialSources {
            enabled: false,
            count: 9
        }
        .validate(3)
        .is_ok());
    }
}
