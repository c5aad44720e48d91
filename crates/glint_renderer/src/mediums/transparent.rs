use glint_math::DVec3;

use crate::color::{colors, interpolate, Color};
use crate::laws;

use super::{smoothness, Medium, MediumBase, Radiosity};

/// A dielectric dominated by transmitted light, like glass or water.
///
/// Light traveling through it fades toward its tint following Beer's law
/// with `fade` as the absorption coefficient.
#[derive(Debug, Clone)]
pub struct Transparent {
    base: MediumBase,
    fade: f64,
}

impl Transparent {
    pub fn new(eta: f64, fade: f64, tint: Color) -> Self {
        Self {
            base: MediumBase::new()
                .with_diffuse(tint)
                .with_refractive_index(eta)
                .with_smoothness(smoothness::MIRROR)
                .with_tightness(super::roughness::TIGHT),
            fade: fade.max(0.0),
        }
    }

    pub fn fade(&self) -> f64 {
        self.fade
    }
}

impl Medium for Transparent {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn radiosity(
        &self,
        point: DVec3,
        refractive_index: f64,
        incident_angle: f64,
        transmitted_angle: f64,
    ) -> Radiosity {
        let reflected = laws::fresnel(
            refractive_index,
            self.refractive_index(point),
            incident_angle,
            transmitted_angle,
        );
        Radiosity {
            emitted: 0.0,
            reflected,
            transmitted: 1.0 - reflected,
        }
    }

    fn absorbance(&self, distance: f64, color: Color) -> Color {
        if self.fade <= 0.0 {
            return color;
        }
        // infinite distances leave only the tint
        let remaining = laws::beers(DVec3::new(distance, 0.0, 0.0), self.fade);
        interpolate(color, self.base.diffuse, remaining)
    }
}

/// Lossless transparent space. Scenes start out in this.
pub fn vacuum() -> Transparent {
    Transparent::new(refractive_index::VACUUM, 0.0, colors::WHITE)
}

/// Air that slowly fades to a light blue over long distances.
pub fn earth_atmosphere() -> Transparent {
    Transparent::new(refractive_index::AIR, 0.004, Color::new(0.678, 0.847, 0.902))
}

/// Refractive indices of common materials.
pub mod refractive_index {
    pub const VACUUM: f64 = 1.0;
    /// At 1 atm and 0 degrees C.
    pub const AIR: f64 = 1.000293;
    /// At 1 atm and 20 degrees C.
    pub const WATER: f64 = 1.333;
    pub const OIL: f64 = 1.47;
    pub const ICE: f64 = 1.31;
    pub const QUARTZ: f64 = 1.46;
    pub const GLASS: f64 = 1.52;
    pub const LEXAN: f64 = 1.58;
    pub const SAPPHIRE: f64 = 1.77;
    pub const ZIRCONIA: f64 = 2.15;
    pub const DIAMOND: f64 = 2.42;
    pub const MOISSANITE: f64 = 2.65;
}
