use glint_math::{DVec2, DVec3};

use crate::color::Color;
use crate::mapping::Reducer;
use crate::{RaytraceError, RaytraceResult};

use super::{Medium, MediumBase};

/// Grid line width of the grid patterns, as a fraction of a cell.
const GRID_LINE: f64 = 1.0 / 16.0;

/// Dot radius of the dots patterns, as a fraction of a cell.
const DOT_RADIUS: f64 = 0.3;

/// A repeating color function over unit cells.
///
/// Surface patterns work on 2D texture coordinates; volumetric ones on the
/// object-space point itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// The first palette color everywhere.
    Simple,
    /// Alternating half-cell squares.
    Checkerboard,
    /// Stripes running along `u + v`.
    Diagonal,
    /// A dot centered in every cell over a background.
    Dots,
    /// Thin lines around every cell over a background.
    Grid,
    VolumetricCheckerboard,
    VolumetricDots,
    VolumetricGrid,
}

impl Pattern {
    /// Number of palette colors the pattern needs.
    pub fn palette_size(&self) -> usize {
        match self {
            Pattern::Simple => 1,
            _ => 2,
        }
    }

    pub fn is_volumetric(&self) -> bool {
        matches!(
            self,
            Pattern::VolumetricCheckerboard | Pattern::VolumetricDots | Pattern::VolumetricGrid
        )
    }

    /// Palette index for a texture coordinate.
    pub fn surface_index(&self, uv: DVec2) -> usize {
        match self {
            Pattern::Simple => 0,
            Pattern::Checkerboard | Pattern::VolumetricCheckerboard => {
                parity((uv.x * 2.0).floor() + (uv.y * 2.0).floor())
            }
            Pattern::Diagonal => {
                let sum = uv.x.rem_euclid(1.0) + uv.y.rem_euclid(1.0);
                parity((sum * 2.0).floor())
            }
            Pattern::Dots | Pattern::VolumetricDots => {
                let offset = cell_offset(uv.x).hypot(cell_offset(uv.y));
                usize::from(offset < DOT_RADIUS)
            }
            Pattern::Grid | Pattern::VolumetricGrid => {
                usize::from(inside_grid_cell(uv.x) && inside_grid_cell(uv.y))
            }
        }
    }

    /// Palette index for a volumetric point.
    pub fn volume_index(&self, p: DVec3) -> usize {
        match self {
            Pattern::VolumetricCheckerboard => {
                parity((p.x * 2.0).floor() + (p.y * 2.0).floor() + (p.z * 2.0).floor())
            }
            Pattern::VolumetricDots => {
                let offset = DVec3::new(cell_offset(p.x), cell_offset(p.y), cell_offset(p.z));
                usize::from(offset.length() < DOT_RADIUS)
            }
            Pattern::VolumetricGrid => usize::from(
                inside_grid_cell(p.x) && inside_grid_cell(p.y) && inside_grid_cell(p.z),
            ),
            _ => self.surface_index(p.truncate()),
        }
    }
}

fn parity(value: f64) -> usize {
    usize::from((value as i64).rem_euclid(2) == 1)
}

/// Distance of a coordinate from the middle of its cell.
fn cell_offset(value: f64) -> f64 {
    (0.5 - value.rem_euclid(1.0)).abs()
}

fn inside_grid_cell(value: f64) -> bool {
    let fraction = value.rem_euclid(1.0);
    GRID_LINE < fraction && fraction <= 1.0 - GRID_LINE
}

/// An opaque medium colored by a [`Pattern`].
///
/// Surface patterns reduce the point with the medium's mapper when one is
/// set, and otherwise use the point's `x` and `y`.
#[derive(Debug, Clone)]
pub struct Patterned {
    base: MediumBase,
    pattern: Pattern,
    palette: Vec<Color>,
    scale: f64,
}

impl Patterned {
    pub fn new(pattern: Pattern, palette: Vec<Color>) -> RaytraceResult<Self> {
        if palette.len() != pattern.palette_size() {
            return Err(RaytraceError::PaletteSize {
                expected: pattern.palette_size(),
                actual: palette.len(),
            });
        }
        Ok(Self {
            base: MediumBase::new(),
            pattern,
            palette,
            scale: 1.0,
        })
    }

    /// Replace the shared parameters. The diffuse color stays patterned.
    pub fn with_base(mut self, base: MediumBase) -> Self {
        self.base = base;
        self
    }

    pub fn with_mapper(mut self, mapper: Reducer) -> Self {
        self.base.mapper = Some(mapper);
        self
    }

    /// Cells per unit of object space (or texture space).
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    fn color_at(&self, point: DVec3) -> Color {
        let index = if self.pattern.is_volumetric() {
            self.pattern.volume_index(point * self.scale)
        } else {
            let uv = match &self.base.mapper {
                Some(mapper) => mapper(point),
                None => point.truncate(),
            };
            self.pattern.surface_index(uv * self.scale)
        };
        self.palette[index.min(self.palette.len() - 1)]
    }
}

impl Medium for Patterned {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn ambient(&self, point: DVec3) -> Color {
        self.color_at(point) * self.base.ambient_scale
    }

    fn diffuse(&self, point: DVec3) -> Color {
        self.color_at(point)
    }
}
