use glint_math::DVec3;

use crate::color::{clamp, Color};

use super::{Medium, MediumBase, Radiosity};

/// A surface that gives off its own light on top of being lit.
#[derive(Debug, Clone)]
pub struct Emissive {
    base: MediumBase,
    emission: Color,
}

impl Emissive {
    /// Emits `color * intensity`, clamped to displayable range.
    pub fn new(color: Color, intensity: f64) -> Self {
        Self {
            base: MediumBase::new().with_diffuse(color),
            emission: clamp(color * intensity),
        }
    }

    pub fn with_base(mut self, base: MediumBase) -> Self {
        self.base = base;
        self
    }
}

impl Medium for Emissive {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn emissive(&self, _point: DVec3) -> Color {
        self.emission
    }

    fn radiosity(
        &self,
        _point: DVec3,
        _refractive_index: f64,
        _incident_angle: f64,
        _transmitted_angle: f64,
    ) -> Radiosity {
        Radiosity {
            emitted: 1.0,
            reflected: 1.0,
            transmitted: 0.0,
        }
    }
}
