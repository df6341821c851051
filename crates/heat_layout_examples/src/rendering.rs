use std::path::Path;

use heat_layout::prelude::{MonitorMask, Raster};
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Heatmap rendering options.
#[derive(Debug, Clone)]
pub struct HeatmapConfig {
    /// Edge length of one grid cell in pixels.
    pub cell_px: u32,
    /// Colour of cells with value zero.
    pub background: [u8; 3],
    /// Colour of monitoring points drawn on top.
    pub marker: [u8; 3],
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            cell_px: 4,
            background: [12, 12, 40],
            marker: [255, 255, 255],
        }
    }
}

impl HeatmapConfig {
    pub fn new(cell_px: u32) -> Self {
        Self {
            cell_px: cell_px.max(1),
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_marker(mut self, marker: [u8; 3]) -> Self {
        self.marker = marker;
        self
    }
}

/// Blue to red ramp for `t` in `[0, 1]`.
fn ramp(t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let r = (255.0 * (1.5 * t).min(1.0)) as u8;
    let g = (255.0 * (1.0 - (2.0 * t - 1.0).abs())) as u8;
    let b = (255.0 * (1.0 - 1.5 * t).max(0.0)) as u8;
    [r, g, b]
}

/// Rasterize `field` (and optional monitoring points) into an image.
///
/// Row 0 of the field is the bottom edge of the board, so rows are flipped.
pub fn heatmap_image(
    field: &Raster<f64>,
    mask: Option<&MonitorMask>,
    config: &HeatmapConfig,
) -> RgbImage {
    let grid = field.grid.interior();
    let px = config.cell_px;
    let max = field
        .interior_cells()
        .map(|(_, _, v)| v)
        .fold(0.0f64, f64::max);

    let mut img = RgbImage::new(grid.width as u32 * px, grid.height as u32 * px);
    for (row, col, value) in field.interior_cells() {
        let colour = if value > 0.0 && max > 0.0 {
            ramp(value / max)
        } else {
            config.background
        };
        let colour = match mask {
            Some(m) if m.contains(row, col) => config.marker,
            _ => colour,
        };
        let y0 = (grid.height - 1 - row) as u32 * px;
        let x0 = col as u32 * px;
        for dy in 0..px {
            for dx in 0..px {
                img.put_pixel(x0 + dx, y0 + dy, Rgb(colour));
            }
        }
    }
    img
}

/// Render `field` to a PNG file at `path`.
pub fn render_field_to_png(
    field: &Raster<f64>,
    mask: Option<&MonitorMask>,
    config: &HeatmapConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    heatmap_image(field, mask, config).save(path.as_ref())?;
    Ok(())
}

/// Render a monitoring mask on its own.
pub fn render_mask_to_png(
    mask: &MonitorMask,
    config: &HeatmapConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let empty: Raster<f64> = Raster::new(mask.grid());
    render_field_to_png(&empty, Some(mask), config, path)
}
