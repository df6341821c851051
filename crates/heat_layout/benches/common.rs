#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use heat_layout::prelude::{
    ComponentArrays, ComponentSet, Domain, Geometry, IntensitySpec, LayoutOptions,
    PowerDistribution,
};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const BOARD_LENGTH: f64 = 0.1;
pub const RESOLUTIONS: [usize; 3] = [50, 100, 200];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn cells_throughput(resolution: usize) -> Throughput {
    Throughput::Elements((resolution * resolution).max(1) as u64)
}

/// Nine components on a 3x3 lattice, one of each geometry per row.
/// `angle` is applied to every component.
pub fn lattice_set(resolution: usize, angle: f64) -> ComponentSet {
    let geometries = [Geometry::Rectangle, Geometry::Circle, Geometry::Capsule];
    let mut arrays = ComponentArrays::new();
    for (row, &geometry) in geometries.iter().enumerate() {
        for col in 0..3 {
            let position = [0.02 + 0.03 * col as f64, 0.02 + 0.03 * row as f64];
            let power = if col % 2 == 0 {
                PowerDistribution::Uniform
            } else {
                PowerDistribution::Gaussian
            };
            arrays = arrays.with_component(
                geometry,
                [0.016, 0.008],
                angle,
                IntensitySpec::Uniform {
                    low: 1e4,
                    high: 2e4,
                },
                power,
                position,
            );
        }
    }
    let domain = Domain::try_new(BOARD_LENGTH, resolution).expect("valid bench domain");
    ComponentSet::from_arrays(domain, &arrays, LayoutOptions::new()).expect("valid bench layout")
}
