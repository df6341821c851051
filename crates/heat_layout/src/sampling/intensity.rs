//! Per-component intensity (power) sampling.
//!
//! Each component carries an [`IntensitySpec`]; [`IntensitySampler::sample`] draws one
//! value per component, in component order, once per generated sample.
use rand::Rng as RngCore;

use crate::error::{Error, Result};
use crate::layout::ComponentSet;
use crate::sampling::{box_muller_pair, rand01, rand_index, rand_open01};

/// Euler–Mascheroni constant as used by the Gumbel moment conversion.
const EULER_GAMMA: f64 = 0.57721;

/// Distribution a component's intensity is drawn from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntensitySpec {
    /// Uniform choice among literal candidate values.
    Choice(Vec<f64>),
    /// Continuous uniform in `[low, high]`.
    Uniform { low: f64, high: f64 },
    /// Uniform over `{low, low + step, ..., high}`.
    UniformStep { low: f64, high: f64, step: f64 },
    /// Normal with the given mean and standard deviation.
    Normal { mean: f64, std: f64 },
    /// Lognormal whose final (non-log) distribution has the given mean and std.
    LogNormal { mean: f64, std: f64 },
    /// Gumbel whose final distribution has the given mean and std.
    Gumbel { mean: f64, std: f64 },
}

impl IntensitySpec {
    /// A single fixed value.
    pub fn fixed(value: f64) -> Self {
        IntensitySpec::Choice(vec![value])
    }

    /// Parse the tagged list form `tag, p1, p2[, p3]`, e.g. `("uniform", [1e4, 2e4, 100])`.
    pub fn from_tagged(tag: &str, params: &[f64]) -> Result<Self> {
        let spec = match (tag, params) {
            ("uniform", &[low, high]) => IntensitySpec::Uniform { low, high },
            ("uniform", &[low, high, step]) => IntensitySpec::UniformStep { low, high, step },
            ("normal", &[mean, std]) => IntensitySpec::Normal { mean, std },
            ("lognormal", &[mean, std]) => IntensitySpec::LogNormal { mean, std },
            ("gumbel", &[mean, std]) => IntensitySpec::Gumbel { mean, std },
            ("uniform" | "normal" | "lognormal" | "gumbel", _) => {
                return Err(Error::InvalidConfig(format!(
                    "intensity '{tag}' got {} parameter(s)",
                    params.len()
                )))
            }
            (other, _) => {
                return Err(Error::UnsupportedDistribution {
                    tag: other.to_owned(),
                })
            }
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(Error::InvalidConfig(msg));
        match self {
            IntensitySpec::Choice(values) => {
                if values.is_empty() {
                    return bad("intensity choice list is empty".into());
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return bad("intensity choice list contains non-finite values".into());
                }
            }
            IntensitySpec::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite()) || low > high {
                    return bad(format!("uniform intensity needs low <= high, got [{low}, {high}]"));
                }
            }
            IntensitySpec::UniformStep { low, high, step } => {
                if !(low.is_finite() && high.is_finite()) || low > high {
                    return bad(format!("uniform intensity needs low <= high, got [{low}, {high}]"));
                }
                if !step.is_finite() || *step <= 0.0 {
                    return bad(format!("uniform intensity step must be > 0, got {step}"));
                }
            }
            IntensitySpec::Normal { mean, std } | IntensitySpec::Gumbel { mean, std } => {
                if !mean.is_finite() || !std.is_finite() || *std < 0.0 {
                    return bad(format!("invalid mean/std ({mean}, {std})"));
                }
            }
            IntensitySpec::LogNormal { mean, std } => {
                if !mean.is_finite() || *mean <= 0.0 || !std.is_finite() || *std < 0.0 {
                    return bad(format!(
                        "lognormal intensity needs mean > 0 and std >= 0, got ({mean}, {std})"
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parameters `(mu, sigma)` of the underlying normal for a lognormal target mean/std.
    pub fn lognormal_params(mean: f64, std: f64) -> (f64, f64) {
        let m2 = mean * mean;
        let var = std * std;
        let mu = (m2 / (m2 + var).sqrt()).ln();
        let sigma = (1.0 + var / m2).ln().sqrt();
        (mu, sigma)
    }

    /// Location and scale `(mu, beta)` of a Gumbel with the target mean/std.
    pub fn gumbel_params(mean: f64, std: f64) -> (f64, f64) {
        let beta = (6.0 * std * std / (core::f64::consts::PI * core::f64::consts::PI)).sqrt();
        (mean - EULER_GAMMA * beta, beta)
    }

    /// Draw one value.
    pub fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        match self {
            IntensitySpec::Choice(values) => values[rand_index(rng, values.len())],
            IntensitySpec::Uniform { low, high } => low + rand01(rng) * (high - low),
            IntensitySpec::UniformStep { low, high, step } => {
                let steps = ((high - low) / step + 1e-9).floor() as usize;
                low + rand_index(rng, steps + 1) as f64 * step
            }
            IntensitySpec::Normal { mean, std } => mean + std * box_muller_pair(rng).0,
            IntensitySpec::LogNormal { mean, std } => {
                let (mu, sigma) = Self::lognormal_params(*mean, *std);
                (mu + sigma * box_muller_pair(rng).0).exp()
            }
            IntensitySpec::Gumbel { mean, std } => {
                let (mu, beta) = Self::gumbel_params(*mean, *std);
                mu - beta * (-rand_open01(rng).ln()).ln()
            }
        }
    }
}

/// Draws one intensity per component of a [`ComponentSet`].
#[derive(Clone, Copy, Debug)]
pub struct IntensitySampler<'a> {
    components: &'a ComponentSet,
}

impl<'a> IntensitySampler<'a> {
    pub fn new(components: &'a ComponentSet) -> Self {
        Self { components }
    }

    /// One value per component, in component index order.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| c.intensity.draw(rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn moments(spec: &IntensitySpec, n: usize, seed: u64) -> (f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let draws: Vec<f64> = (0..n).map(|_| spec.draw(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        (mean, var.sqrt())
    }

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        assert!(
            (actual - expected).abs() <= rel * expected.abs(),
            "{actual} not within {rel} of {expected}"
        );
    }

    #[test]
    fn lognormal_recovers_target_moments() {
        let spec = IntensitySpec::LogNormal {
            mean: 10.0,
            std: 2.0,
        };
        let (mean, std) = moments(&spec, 100_000, 7);
        assert_close(mean, 10.0, 0.02);
        assert_close(std, 2.0, 0.02);
    }

    #[test]
    fn gumbel_recovers_target_moments() {
        let spec = IntensitySpec::Gumbel {
            mean: 50.0,
            std: 5.0,
        };
        let (mean, std) = moments(&spec, 100_000, 13);
        assert_close(mean, 50.0, 0.02);
        assert_close(std, 5.0, 0.02);
    }

    #[test]
    fn normal_recovers_moments() {
        let spec = IntensitySpec::Normal {
            mean: 1000.0,
            std: 100.0,
        };
        let (mean, std) = moments(&spec, 100_000, 17);
        assert_close(mean, 1000.0, 0.02);
        assert_close(std, 100.0, 0.02);
    }

    #[test]
    fn parameter_conversions_match_closed_form() {
        let (mu, sigma) = IntensitySpec::lognormal_params(1.0, 0.0);
        assert!(mu.abs() < 1e-12 && sigma.abs() < 1e-12);

        let (mu, beta) = IntensitySpec::gumbel_params(10.0, core::f64::consts::PI);
        assert!((beta - 6f64.sqrt()).abs() < 1e-12);
        assert!((mu - (10.0 - 0.57721 * 6f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn uniform_step_hits_lattice_including_both_ends() {
        let spec = IntensitySpec::UniformStep {
            low: 10.0,
            high: 20.0,
            step: 5.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let v = spec.draw(&mut rng);
            let k = ((v - 10.0) / 5.0).round() as usize;
            assert!((v - (10.0 + 5.0 * k as f64)).abs() < 1e-12);
            seen[k] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn uniform_stays_in_range() {
        let spec = IntensitySpec::Uniform {
            low: 1e4,
            high: 2e4,
        };
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1_000 {
            let v = spec.draw(&mut rng);
            assert!((1e4..=2e4).contains(&v));
        }
    }

    #[test]
    fn choice_only_returns_candidates() {
        let spec = IntensitySpec::Choice(vec![3.0, 7.0]);
        let mut rng = StdRng::seed_from_u64(4);
        let draws: Vec<f64> = (0..200).map(|_| spec.draw(&mut rng)).collect();
        assert!(draws.iter().all(|v| *v == 3.0 || *v == 7.0));
        assert!(draws.contains(&3.0) && draws.contains(&7.0));
    }

    #[test]
    fn from_tagged_dispatches_on_parameter_count() {
        assert_eq!(
            IntensitySpec::from_tagged("uniform", &[1.0, 2.0]).unwrap(),
            IntensitySpec::Uniform {
                low: 1.0,
                high: 2.0
            }
        );
        assert!(matches!(
            IntensitySpec::from_tagged("uniform", &[1.0, 2.0, 0.5]).unwrap(),
            IntensitySpec::UniformStep { .. }
        ));
        assert!(matches!(
            IntensitySpec::from_tagged("uniform", &[1.0]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            IntensitySpec::from_tagged("weibull", &[1.0, 2.0]),
            Err(Error::UnsupportedDistribution { ref tag }) if tag == "weibull"
        ));
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(IntensitySpec::Choice(vec![]).validate().is_err());
        assert!(IntensitySpec::Uniform {
            low: 2.0,
            high: 1.0
        }
        .validate()
        .is_err());
        assert!(IntensitySpec::LogNormal {
            mean: 0.0,
            std: 1.0
        }
        .validate()
        .is_err());
        assert!(IntensitySpec::UniformStep {
            low: 0.0,
            high: 1.0,
            step: 0.0
        }
        .validate()
        .is_err());
    }
}
