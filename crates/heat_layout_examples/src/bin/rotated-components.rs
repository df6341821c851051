use glam::DVec2;
use heat_layout::prelude::*;
use heat_layout_examples::{init_tracing, render_field_to_png, HeatmapConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The same capsule ring, turned step by step.
    let domain = Domain::try_new(0.1, 120)?;
    let centre = DVec2::splat(0.05);
    let config = HeatmapConfig::new(4);
    let mut rng = StdRng::seed_from_u64(3);

    for turn in [0.0, 15.0, 30.0, 45.0, 90.0] {
        let mut arrays = ComponentArrays::new();
        for k in 0..6 {
            let phi = k as f64 * std::f64::consts::TAU / 6.0;
            let position = centre + DVec2::from_angle(phi) * 0.03;
            arrays = arrays.with_component(
                Geometry::Capsule,
                [0.016, 0.006],
                phi.to_degrees() + turn,
                IntensitySpec::Uniform {
                    low: 3000.0,
                    high: 6000.0,
                },
                PowerDistribution::Uniform,
                position,
            );
        }

        let options = LayoutOptions::new().with_angle_unit(AngleUnit::Degrees);
        let components = ComponentSet::from_arrays(domain, &arrays, options)?;
        let sample = SampleTask::new(&components).produce_sample(&mut rng)?;
        let covered = sample.overlap.count_where(|v| v > 0);
        info!("turn {turn}°: {covered} covered cell(s).");

        render_field_to_png(
            &sample.f,
            None,
            &config,
            format!("rotated-components-{turn:.0}.png"),
        )?;
    }
    Ok(())
}
