use std::path::PathBuf;

use heat_layout::prelude::*;
use heat_layout_examples::{
    init_tracing, load_job_config, render_mask_to_png, DatasetWriter, HeatmapConfig,
};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Usage: generate-dataset [config.ron] [output dir]
    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs/default.ron"));
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dataset"));

    let config = load_job_config(&config_path)?;
    info!(
        "Loaded {} ({} component(s), {} sample(s)).",
        config_path.display(),
        config.components.len(),
        config.samples
    );

    let job = GenerationJob::new(config)?;
    let preview = HeatmapConfig::new(4);
    let mut writer = DatasetWriter::create(&out_dir)?.with_previews(preview.clone());
    render_mask_to_png(job.mask(), &preview, out_dir.join("monitoring.png"))?;

    let mut events = FnSink::new(|event| match event {
        GenerationEvent::SampleRetried { index, attempts } => {
            warn!("Sample {index} needed attempt {attempts}.")
        }
        GenerationEvent::JobAborted { index, message } => {
            warn!("Job aborted at {index:?}: {message}")
        }
        _ => {}
    });

    let summary = job.run(&mut writer, &mut events)?;
    info!(
        "Wrote {} sample(s) with {} worker(s) to {}.",
        summary.samples,
        summary.workers,
        out_dir.display()
    );
    Ok(())
}
