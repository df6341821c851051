//! Footprint membership and power falloff for each geometry.
use glam::DVec2;

use crate::grid::Domain;
use crate::layout::{Component, Geometry, PowerDistribution};
use crate::render::Footprint;

impl Geometry {
    /// Whether a point at `offset` from the centre of an unrotated `size` shape is covered.
    pub fn contains(self, size: DVec2, offset: DVec2) -> bool {
        match self {
            Geometry::Rectangle => {
                let half = size * 0.5;
                offset.x.abs() <= half.x && offset.y.abs() <= half.y
            }
            Geometry::Circle => {
                let half = size * 0.5;
                (offset.x / half.x).powi(2) + (offset.y / half.y).powi(2) < 1.0
            }
            Geometry::Capsule => {
                let radius = size.min_element() * 0.5;
                let (core_half, cap) = if size.x > size.y {
                    let a = (size.x - size.y) * 0.5;
                    (DVec2::new(a, size.y * 0.5), DVec2::new(a, 0.0))
                } else {
                    let a = (size.y - size.x) * 0.5;
                    (DVec2::new(size.x * 0.5, a), DVec2::new(0.0, a))
                };
                let in_core = offset.x.abs() <= core_half.x && offset.y.abs() <= core_half.y;
                let r2 = radius * radius;
                in_core
                    || (offset - cap).length_squared() <= r2
                    || (offset + cap).length_squared() <= r2
            }
        }
    }
}

/// Cell-space bounding box `[lo, hi)` of the unrotated component.
pub(crate) fn bounding_cells(domain: &Domain, component: &Component) -> ([isize; 2], [isize; 2]) {
    let lp = component.position - component.size * 0.5;
    let rp = component.position + component.size * 0.5;
    (
        [domain.cell_index(lp.x), domain.cell_index(lp.y)],
        [domain.cell_index(rp.x), domain.cell_index(rp.y)],
    )
}

/// Rasterize one unrotated component into `out`, which is expected to be padded.
///
/// Every cell of the bounding box whose centre lies inside the shape gets its
/// overlap count incremented and its intensity set by the
/// component's power distribution.
pub(crate) fn stamp(
    domain: &Domain,
    component: &Component,
    intensity: f64,
    gaussian_param: f64,
    out: &mut Footprint,
) {
    let ([x0, y0], [x1, y1]) = bounding_cells(domain, component);
    let reference_sq = component.gaussian_reference_sq();

    for col in x0..x1 {
        for row in y0..y1 {
            let point = DVec2::new(domain.cell_centre(col), domain.cell_centre(row));
            let offset = point - component.position;
            // Rectangles cover the whole cell box.
            let inside = component.geometry == Geometry::Rectangle
                || component.geometry.contains(component.size, offset);
            if !inside {
                continue;
            }
            if let Some(count) = out.overlap.get_mut(col, row) {
                *count += 1;
            }
            let value = match component.power_distribution {
                PowerDistribution::Uniform => intensity,
                PowerDistribution::Gaussian => {
                    intensity * (-gaussian_param * offset.length_squared() / reference_sq).exp()
                }
            };
            out.intensity.set(col, row, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_boundary_is_exclusive() {
        let size = DVec2::splat(0.5);
        assert!(Geometry::Circle.contains(size, DVec2::new(0.2, 0.0)));
        assert!(!Geometry::Circle.contains(size, DVec2::new(0.25, 0.0)));
    }

    #[test]
    fn capsule_caps_are_inclusive_and_follow_long_axis() {
        let horizontal = DVec2::new(0.75, 0.25);
        assert!(Geometry::Capsule.contains(horizontal, DVec2::new(-0.375, 0.0)));
        assert!(!Geometry::Capsule.contains(horizontal, DVec2::new(-0.375, -0.125)));
        assert!(Geometry::Capsule.contains(horizontal, DVec2::new(0.25, 0.125)));

        let vertical = DVec2::new(0.25, 0.75);
        assert!(Geometry::Capsule.contains(vertical, DVec2::new(0.0, 0.375)));
        assert!(!Geometry::Capsule.contains(vertical, DVec2::new(0.375, 0.0)));
    }

    #[test]
    fn rectangle_covers_its_box() {
        let size = DVec2::new(0.4, 0.2);
        assert!(Geometry::Rectangle.contains(size, DVec2::new(0.2, -0.1)));
        assert!(!Geometry::Rectangle.contains(size, DVec2::new(0.21, 0.0)));
    }
}
