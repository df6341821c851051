mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use heat_layout::prelude::MonitorStrategy;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn strategies(resolution: usize) -> [(&'static str, MonitorStrategy); 3] {
    [
        (
            "random",
            MonitorStrategy::Random {
                count: resolution * resolution / 10,
            },
        ),
        (
            "uniform",
            MonitorStrategy::Uniform {
                rows: resolution / 4,
                cols: resolution / 4,
            },
        ),
        (
            "center",
            MonitorStrategy::Center {
                component: 5,
                boundary: resolution / 4,
                region: resolution,
            },
        ),
    ]
}

fn monitor_benches(c: &mut Criterion) {
    for &resolution in &common::RESOLUTIONS {
        let set = common::lattice_set(resolution, 0.0);
        let mut group = c.benchmark_group(format!("monitor/plan/n_{resolution}"));
        group.throughput(common::cells_throughput(resolution));

        for (label, strategy) in strategies(resolution) {
            let mut rng = StdRng::seed_from_u64(0xA11CE ^ resolution as u64);
            group.bench_with_input(BenchmarkId::from_parameter(label), &strategy, |b, s| {
                b.iter(|| {
                    let mask = s.plan(&set, &mut rng).expect("plan");
                    black_box(mask.count());
                });
            });
        }

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = monitor_benches
}
criterion_main!(benches);
