//! Component geometry, per-component input arrays and the validated [`ComponentSet`].
use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::grid::Domain;
use crate::layout::special::SpecialSources;
use crate::sampling::IntensitySpec;

/// Angles with magnitude at or below this are rasterized without rotation.
pub const ANGLE_TOLERANCE: f64 = 1e-10;

/// Shape of a component's footprint before rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    Rectangle,
    /// Ellipse inscribed in the `length × width` box.
    Circle,
    /// Stadium: a rectangle with half-disc caps on the short ends.
    Capsule,
}

impl FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rectangle" => Ok(Geometry::Rectangle),
            "circle" => Ok(Geometry::Circle),
            "capsule" => Ok(Geometry::Capsule),
            other => Err(Error::InvalidConfig(format!(
                "geometry '{other}' is not supported (rectangle, circle, capsule)"
            ))),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Geometry::Rectangle => "rectangle",
            Geometry::Circle => "circle",
            Geometry::Capsule => "capsule",
        })
    }
}

/// Spatial falloff of intensity inside a footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerDistribution {
    #[default]
    Uniform,
    Gaussian,
}

impl FromStr for PowerDistribution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(PowerDistribution::Uniform),
            "gaussian" => Ok(PowerDistribution::Gaussian),
            other => Err(Error::InvalidConfig(format!(
                "power distribution '{other}' is not supported (gaussian, uniform)"
            ))),
        }
    }
}

/// Unit of the configured angles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// Unit of the configured positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionUnit {
    /// Physical coordinates in metres.
    #[default]
    Coord,
    /// Grid coordinates, scaled by `side_length / resolution`.
    Grid,
}

/// One validated heat source.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub geometry: Geometry,
    /// `(length, width)` before rotation; the long axis lies along X.
    pub size: DVec2,
    /// Rotation of the long axis from the X axis, radians.
    pub angle: f64,
    /// Physical centre.
    pub position: DVec2,
    pub intensity: IntensitySpec,
    pub power_distribution: PowerDistribution,
}

impl Component {
    pub fn is_axis_aligned(&self) -> bool {
        self.angle.abs() <= ANGLE_TOLERANCE
    }

    /// Axis-aligned extents after rotation.
    pub fn real_size(&self) -> DVec2 {
        let (sin, cos) = self.angle.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        DVec2::new(
            cos * self.size.x + sin * self.size.y,
            cos * self.size.y + sin * self.size.x,
        )
    }

    /// Squared reference distance of the Gaussian falloff.
    pub fn gaussian_reference_sq(&self) -> f64 {
        let half = self.size * 0.5;
        match self.geometry {
            Geometry::Rectangle => half.length_squared(),
            Geometry::Circle | Geometry::Capsule => half.max_element().powi(2),
        }
    }
}

/// Raw per-component arrays as they appear in a job configuration.
///
/// All arrays must have the same length; [`ComponentSet::from_arrays`] checks this.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentArrays {
    pub geometry: Vec<Geometry>,
    pub size: Vec<[f64; 2]>,
    pub angle: Vec<f64>,
    pub intensity: Vec<IntensitySpec>,
    pub power_distribution: Vec<PowerDistribution>,
    pub position: Vec<[f64; 2]>,
}

impl ComponentArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one component to every array.
    pub fn with_component(
        mut self,
        geometry: Geometry,
        size: impl Into<mint::Vector2<f64>>,
        angle: f64,
        intensity: IntensitySpec,
        power_distribution: PowerDistribution,
        position: impl Into<mint::Vector2<f64>>,
    ) -> Self {
        let size = size.into();
        let position = position.into();
        self.geometry.push(geometry);
        self.size.push([size.x, size.y]);
        self.angle.push(angle);
        self.intensity.push(intensity);
        self.power_distribution.push(power_distribution);
        self.position.push([position.x, position.y]);
        self
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    fn check_lengths(&self) -> Result<()> {
        let expected = self.geometry.len();
        let lengths = [
            ("size", self.size.len()),
            ("angle", self.angle.len()),
            ("intensity", self.intensity.len()),
            ("power_distribution", self.power_distribution.len()),
            ("position", self.position.len()),
        ];
        for (field, found) in lengths {
            if found != expected {
                return Err(Error::ShapeMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Set-level options applied while building a [`ComponentSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    pub angle_unit: AngleUnit,
    pub position_unit: PositionUnit,
    /// Falloff strength of [`PowerDistribution::Gaussian`].
    pub gaussian_param: f64,
    pub special: SpecialSources,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Radians,
            position_unit: PositionUnit::Coord,
            gaussian_param: 1.0,
            special: SpecialSources::disabled(),
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    pub fn with_position_unit(mut self, unit: PositionUnit) -> Self {
        self.position_unit = unit;
        self
    }

    pub fn with_gaussian_param(mut self, gaussian_param: f64) -> Self {
        self.gaussian_param = gaussian_param;
        self
    }

    pub fn with_special(mut self, special: SpecialSources) -> Self {
        self.special = special;
        self
    }
}

/// Validated, immutable collection of components on a [`Domain`].
#[derive(Clone, Debug)]
pub struct ComponentSet {
    domain: Domain,
    components: Vec<Component>,
    gaussian_param: f64,
    special: SpecialSources,
}

impl ComponentSet {
    /// Validate raw arrays and build the set.
    ///
    /// Fails with [`Error::ShapeMismatch`] for unequal array lengths and with
    /// [`Error::InvalidConfig`] for out-of-range parameters or placements.
    pub fn from_arrays(
        domain: Domain,
        arrays: &ComponentArrays,
        options: LayoutOptions,
    ) -> Result<Self> {
        arrays.check_lengths()?;
        let n = arrays.len();
        if n == 0 {
            warn!("Component set is empty; every sample will be all zeros.");
        }
        if !options.gaussian_param.is_finite() || options.gaussian_param < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "gaussian_param must be >= 0, got {}",
                options.gaussian_param
            )));
        }
        options.special.validate(n)?;

        let position_scale = match options.position_unit {
            PositionUnit::Coord => 1.0,
            PositionUnit::Grid => domain.cell_size(),
        };

        let mut components = Vec::with_capacity(n);
        for i in 0..n {
            arrays.intensity[i].validate().map_err(|e| {
                Error::InvalidConfig(format!("component {i}: {e}"))
            })?;
            let angle = match options.angle_unit {
                AngleUnit::Radians => arrays.angle[i],
                AngleUnit::Degrees => arrays.angle[i].to_radians(),
            };
            let component = Component {
                geometry: arrays.geometry[i],
                size: DVec2::from(arrays.size[i]),
                angle,
                position: DVec2::from(arrays.position[i]) * position_scale,
                intensity: arrays.intensity[i].clone(),
                power_distribution: arrays.power_distribution[i],
            };
            check_placement(&domain, i, &component)?;
            components.push(component);
        }

        debug!(
            "Validated {} component(s) on a {} board of {} m, {} cells per side.",
            n,
            domain.shape(),
            domain.side_length(),
            domain.resolution()
        );

        Ok(Self {
            domain,
            components,
            gaussian_param: options.gaussian_param,
            special: options.special,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Component> {
        self.components.iter()
    }

    pub fn gaussian_param(&self) -> f64 {
        self.gaussian_param
    }

    pub fn special(&self) -> SpecialSources {
        self.special
    }

    /// Rotated axis-aligned extents of component `index`.
    pub fn real_size(&self, index: usize) -> Option<DVec2> {
        self.get(index).map(Component::real_size)
    }

    /// `real_size.x * real_size.y` of component `index`.
    pub fn real_area(&self, index: usize) -> Option<f64> {
        self.real_size(index).map(|s| s.x * s.y)
    }

    /// Unrotated size of component `index` in whole cells.
    pub fn size_cells(&self, index: usize) -> Option<(isize, isize)> {
        self.get(index).map(|c| {
            (
                self.domain.cell_index(c.size.x),
                self.domain.cell_index(c.size.y),
            )
        })
    }

    /// Rotated extents of component `index` in whole cells.
    pub fn real_size_cells(&self, index: usize) -> Option<(isize, isize)> {
        self.real_size(index).map(|s| {
            (
                self.domain.cell_index(s.x),
                self.domain.cell_index(s.y),
            )
        })
    }
}

impl<'a> IntoIterator for &'a ComponentSet {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

fn check_placement(domain: &Domain, index: usize, c: &Component) -> Result<()> {
    let side = domain.side_length();
    let tol = side * 1e-9;
    let fail = |msg: String| Err(Error::InvalidConfig(format!("component {index}: {msg}")));

    if !(c.size.is_finite() && c.size.x > 0.0 && c.size.y > 0.0) {
        return fail(format!("size must be positive, got {:?}", c.size));
    }
    if !c.angle.is_finite() || !c.position.is_finite() {
        return fail("angle and position must be finite".into());
    }
    if c.position.min_element() < -tol || c.position.max_element() > side + tol {
        return fail(format!("centre {:?} lies outside the board", c.position));
    }

    let real = c.real_size();
    if real.max_element() > side + tol {
        return fail(format!("rotated extent {real:?} exceeds the board side {side}"));
    }

    let lp = c.position - c.size * 0.5;
    let rp = c.position + c.size * 0.5;
    if c.is_axis_aligned() {
        if lp.min_element() < -tol || rp.max_element() > side + tol {
            return fail(format!("bounding box {lp:?}..{rp:?} leaves the board"));
        }
    } else {
        // The unrotated box may overflow by up to one board width; the rotated one may not.
        if lp.min_element() <= -side || rp.max_element() > 2.0 * side {
            return fail(format!(
                "unrotated bounding box {lp:?}..{rp:?} exceeds the padding margin"
            ));
        }
        let real_lp = c.position - real * 0.5;
        let real_rp = c.position + real * 0.5;
        if real_lp.min_element() < -tol || real_rp.max_element() > side + tol {
            return fail(format!(
                "rotated bounding box {real_lp:?}..{real_rp:?} leaves the board"
            ));
        }
        let n = domain.resolution() as isize;
        let half_window = c.size.max_element() * 0.75;
        let lo = (c.position - half_window).min_element();
        let hi = (c.position + half_window).max_element();
        if domain.cell_index(lo) < -n || domain.cell_index(hi) > 2 * n {
            return fail("rotation search window exceeds the padding margin".into());
        }
    }

    if domain.cell_index(c.size.min_element()) == 0 {
        warn!(
            "Component {} ({}) is smaller than one cell and may not cover any cell.",
            index, c.geometry
        );
    }
    Ok(())
}
