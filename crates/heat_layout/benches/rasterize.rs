mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use heat_layout::prelude::{Rasterizer, SampleTask, SourceSelection};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ANGLES: [(&str, f64); 2] = [("axis_aligned", 0.0), ("rotated", 0.5)];

fn rasterize_benches(c: &mut Criterion) {
    for &(label, angle) in &ANGLES {
        let mut group = c.benchmark_group(format!("render/rasterize/{label}"));

        for &resolution in &common::RESOLUTIONS {
            let set = common::lattice_set(resolution, angle);
            let intensities = vec![1.5e4; set.len()];
            group.throughput(common::cells_throughput(resolution));

            group.bench_with_input(
                BenchmarkId::from_parameter(resolution),
                &resolution,
                |b, _| {
                    let rasterizer = Rasterizer::new(&set);
                    b.iter(|| {
                        let out = rasterizer
                            .rasterize(&intensities, &SourceSelection::All)
                            .expect("rasterize");
                        black_box(out.overlap.max_value());
                    });
                },
            );
        }

        group.finish();
    }
}

fn sample_task_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate/produce_sample");

    for &resolution in &common::RESOLUTIONS {
        let set = common::lattice_set(resolution, 0.5);
        let task = SampleTask::new(&set);
        let mut rng = StdRng::seed_from_u64(0x5EED ^ resolution as u64);
        group.throughput(common::cells_throughput(resolution));

        group.bench_with_input(
            BenchmarkId::from_parameter(resolution),
            &resolution,
            |b, _| {
                b.iter(|| {
                    let sample = task.produce_sample(&mut rng).expect("sample");
                    black_box(sample.intensities.len());
                });
            },
        );
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = rasterize_benches, sample_task_benches
}
criterion_main!(benches);
