use heat_layout::prelude::*;
use heat_layout_examples::{init_tracing, render_field_to_png, HeatmapConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let domain = Domain::try_new(0.1, 100)?;
    let components = ComponentSet::from_arrays(domain, &layout(), LayoutOptions::new())?;

    // One fixed-intensity sample as a backdrop for every mask.
    let mut rng = StdRng::seed_from_u64(7);
    let sample = SampleTask::new(&components).produce_sample(&mut rng)?;

    let strategies = [
        ("random", MonitorStrategy::Random { count: 200 }),
        ("uniform", MonitorStrategy::Uniform { rows: 10, cols: 10 }),
        (
            "center",
            MonitorStrategy::Center {
                component: 5,
                boundary: 12,
                region: 150,
            },
        ),
    ];

    let config = HeatmapConfig::new(6).with_marker([255, 255, 0]);
    for (name, strategy) in strategies {
        let mask = strategy.plan(&components, &mut rng)?;
        info!("{name}: {} monitoring point(s).", mask.count());
        render_field_to_png(
            &sample.f,
            Some(&mask),
            &config,
            format!("monitor-strategies-{name}.png"),
        )?;
    }
    Ok(())
}

fn layout() -> ComponentArrays {
    let mut arrays = ComponentArrays::new();
    for (i, (x, y)) in [(0.25, 0.25), (0.75, 0.3), (0.5, 0.7)].into_iter().enumerate() {
        let geometry = [Geometry::Rectangle, Geometry::Circle, Geometry::Capsule][i];
        arrays = arrays.with_component(
            geometry,
            [0.02, 0.015],
            0.0,
            IntensitySpec::fixed(5000.0),
            PowerDistribution::Gaussian,
            [x * 0.1, y * 0.1],
        );
    }
    arrays
}
