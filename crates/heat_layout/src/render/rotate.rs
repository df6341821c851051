//! Inverse-mapped rotation of a rasterized component.
//!
//! The component is first rendered unrotated into the padded buffer. Every
//! destination cell inside a search window of `1.5 × max(size)` around the
//! centre has its centre rotated back by `-angle` about the component centre
//! and takes the value of the source cell that point falls in, so the rotated
//! footprint has no holes. Both sides sample at cell centres, which makes
//! quarter and half turns land exactly on the unrotated grid.
use glam::DVec2;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::grid::Domain;
use crate::layout::Component;
use crate::render::Footprint;

/// Search window scale relative to the longest side.
const WINDOW_SCALE: f64 = 1.5;

/// Cell-space search window `[lo, hi)` around the component centre.
pub(crate) fn search_window(domain: &Domain, component: &Component) -> ([isize; 2], [isize; 2]) {
    let half = component.size.max_element() * WINDOW_SCALE * 0.5;
    let lp = component.position - half;
    let rp = component.position + half;
    (
        [domain.cell_index(lp.x), domain.cell_index(lp.y)],
        [domain.cell_index(rp.x), domain.cell_index(rp.y)],
    )
}

/// Rotate the padded, unrotated `source` by the component's angle, staying on
/// the padded grid.
pub(crate) fn inverse_map(
    domain: &Domain,
    component: &Component,
    source: &Footprint,
) -> Footprint {
    let mut rotated = Footprint::zeros(source.grid());
    let ([x0, y0], [x1, y1]) = search_window(domain, component);
    let inverse = DVec2::from_angle(-component.angle);
    let centre = component.position;

    for col in x0..x1 {
        for row in y0..y1 {
            let point = DVec2::new(domain.cell_centre(col), domain.cell_centre(row));
            let back = centre + inverse.rotate(point - centre);
            let sx = domain.cell_index_floor(back.x);
            let sy = domain.cell_index_floor(back.y);
            if !((x0..x1).contains(&sx) && (y0..y1).contains(&sy)) {
                continue;
            }
            rotated.overlap.set(col, row, source.overlap.get(sx, sy));
            rotated.intensity.set(col, row, source.intensity.get(sx, sy));
        }
    }
    rotated
}

/// Rotate the padded, unrotated `source` of component `index` by its angle and
/// crop the result to the board.
pub fn rotate_footprint(
    domain: &Domain,
    index: usize,
    component: &Component,
    source: &Footprint,
) -> Result<Footprint> {
    let rotated = inverse_map(domain, component, source);
    check_halo(index, &rotated)?;
    Ok(rotated.crop_interior())
}

/// Fail when rotated content lies in the halo beyond the first ring of cells
/// around the board.
///
/// Placement validation checks the exact rotated extents, while the unrotated
/// stamp covers a box rounded to whole cells. At oblique angles that rounding
/// can carry one cell across the edge of a component that touches it. Content
/// in that ring is cropped; anything further out is an error.
pub(crate) fn check_halo(index: usize, footprint: &Footprint) -> Result<()> {
    let grid = footprint.overlap.grid;
    let (w, h) = (grid.width as isize, grid.height as isize);
    let mut spill = 0usize;
    let mut outside = 0usize;
    for (ix, iy, count) in footprint.overlap.cells() {
        if count == 0 || grid.is_interior(ix, iy) {
            continue;
        }
        if ix >= -1 && iy >= -1 && ix <= w && iy <= h {
            spill += 1;
        } else {
            outside += 1;
        }
    }
    if spill > 0 {
        debug!(
            "Component {} spilled {} rotated cell(s) across the board edge; cropped.",
            index, spill
        );
    }
    if outside > 0 {
        error!(
            "Component {} rotated {} cell(s) beyond the board; padding margin violated.",
            index, outside
        );
        return Err(Error::RotationBounds {
            component: index,
            cells: outside,
        });
    }
    Ok(())
}
