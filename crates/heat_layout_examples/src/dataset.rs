//! Per-sample RON records written next to optional PNG previews.
use std::fs;
use std::path::{Path, PathBuf};

use heat_layout::prelude::{
    Error, JobConfig, MonitorMask, Raster, Result, SampleConsumer, SampleResult,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rendering::{render_field_to_png, HeatmapConfig};

/// One sample as stored on disk. Grids are row-major, `row = y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub index: usize,
    #[serde(rename = "F")]
    pub f: Vec<Vec<f64>>,
    pub overlap: Vec<Vec<u32>>,
    /// Monitoring mask.
    pub u_pos: Vec<Vec<u8>>,
    pub intensities: Vec<f64>,
}

fn rows<T: Copy + Default>(raster: &Raster<T>) -> Vec<Vec<T>> {
    let grid = raster.grid.interior();
    (0..grid.height)
        .map(|row| (0..grid.width).map(|col| raster.at(row, col)).collect())
        .collect()
}

impl SampleRecord {
    pub fn new(index: usize, sample: &SampleResult, mask: &MonitorMask) -> Self {
        Self {
            index,
            f: rows(&sample.f),
            overlap: rows(&sample.overlap),
            u_pos: rows(mask.raster()),
            intensities: sample.intensities.clone(),
        }
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Other(format!("serialize sample {}: {e}", self.index)))
    }

    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Other(format!("parse sample record: {e}")))
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron(&fs::read_to_string(path)?)
    }
}

/// [`SampleConsumer`] that writes `<prefix><index>.ron` into a directory.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    dir: PathBuf,
    prefix: String,
    previews: Option<HeatmapConfig>,
    written: usize,
}

impl DatasetWriter {
    /// Create the writer, creating `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: "Example".into(),
            previews: None,
            written: 0,
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Also write a `<prefix><index>.png` heatmap of `F` with the monitoring points.
    pub fn with_previews(mut self, config: HeatmapConfig) -> Self {
        self.previews = Some(config);
        self
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn record_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}{index}.ron", self.prefix))
    }
}

impl SampleConsumer for DatasetWriter {
    fn consume(&mut self, index: usize, sample: SampleResult, mask: &MonitorMask) -> Result<()> {
        let record = SampleRecord::new(index, &sample, mask);
        let path = self.record_path(index);
        fs::write(&path, record.to_ron()?)?;

        if let Some(config) = &self.previews {
            let png = path.with_extension("png");
            render_field_to_png(&sample.f, Some(mask), config, &png)
                .map_err(|e| Error::Other(format!("preview {}: {e}", png.display())))?;
        }

        debug!("Wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}

/// Load a RON job description from disk.
pub fn load_job_config(path: impl AsRef<Path>) -> anyhow::Result<JobConfig> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    Ok(JobConfig::from_ron_str(&source)?)
}
