use glint_math::DVec3;
use rand::RngCore;

use crate::color::Color;
use crate::mapping::golden_ratio_mapper;

use super::{Medium, MediumBase};

/// Number of distinct directions fuzz is drawn from.
const FUZZ_DIRECTIONS: usize = 79;

/// A conductor. Its highlights take on its own color and its reflections
/// can be blurred by a fuzz factor.
#[derive(Debug, Clone)]
pub struct Metal {
    base: MediumBase,
    specularity: Color,
    fuzz: f64,
}

impl Metal {
    /// Smoothness and fuzz are clamped to `[0, 1]`.
    pub fn new(color: Color, smoothness: f64, tightness: f64, fuzz: f64) -> Self {
        Self {
            base: MediumBase::new()
                .with_diffuse(color)
                .with_smoothness(smoothness)
                .with_tightness(tightness),
            specularity: color,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// The same metal with a different fuzz factor.
    pub fn with_fuzz(mut self, fuzz: f64) -> Self {
        self.fuzz = fuzz.clamp(0.0, 1.0);
        self
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Medium for Metal {
    fn base(&self) -> &MediumBase {
        &self.base
    }

    fn specular(&self, point: DVec3, scaling: f64, light_color: Color) -> Color {
        if scaling > 0.0 {
            scaling.powf(self.specular_tightness(point)) * (self.specularity * light_color)
        } else {
            Color::ZERO
        }
    }

    fn perturbation(&self, _point: DVec3, rng: &mut dyn RngCore) -> DVec3 {
        if self.fuzz > 0.0 {
            let index = rng.next_u32() as usize % FUZZ_DIRECTIONS;
            golden_ratio_mapper(index, FUZZ_DIRECTIONS) * self.fuzz
        } else {
            DVec3::ZERO
        }
    }
}

/// Common metals.
pub mod metals {
    use super::Metal;
    use crate::color::Color;
    use crate::mediums::{roughness, smoothness};

    pub const ALUMINUM: Color = Color::new(0.7725, 0.7725, 0.7725);
    pub const BRASS: Color = Color::new(0.7098, 0.6509, 0.2588);
    pub const BRONZE: Color = Color::new(0.8039, 0.4980, 0.1961);
    pub const CHROME: Color = Color::new(0.8588, 0.8941, 0.9216);
    pub const COPPER: Color = Color::new(0.7216, 0.4510, 0.2000);
    pub const GOLD: Color = Color::new(1.0, 0.8431, 0.0);
    pub const SILVER: Color = Color::new(0.7529, 0.7529, 0.7529);
    pub const STAINLESS: Color = Color::new(0.8784, 0.8745, 0.8588);
    pub const STEEL: Color = Color::new(0.4627, 0.5216, 0.5725);
    pub const TIN: Color = Color::new(0.5686, 0.5255, 0.5255);

    pub fn aluminum() -> Metal {
        Metal::new(ALUMINUM, smoothness::SMALL, roughness::LOOSE, 0.0)
    }

    pub fn brass() -> Metal {
        Metal::new(BRASS, smoothness::POLISHED - 0.1, roughness::TIGHT, 0.0)
    }

    pub fn bronze() -> Metal {
        Metal::new(BRONZE, smoothness::SMALL, roughness::LOOSE, 0.0)
    }

    pub fn chrome() -> Metal {
        Metal::new(CHROME, smoothness::POLISHED + 0.2, roughness::TIGHT, 0.0)
    }

    pub fn copper() -> Metal {
        Metal::new(COPPER, smoothness::POLISHED + 0.2, roughness::TIGHT, 0.0)
    }

    pub fn gold() -> Metal {
        Metal::new(GOLD, smoothness::POLISHED, roughness::TIGHT, 0.0)
    }

    pub fn silver() -> Metal {
        Metal::new(SILVER, smoothness::POLISHED + 0.2, roughness::TIGHT, 0.0)
    }

    pub fn stainless() -> Metal {
        Metal::new(STAINLESS, smoothness::POLISHED + 0.2, roughness::TIGHT, 0.0)
    }

    pub fn steel() -> Metal {
        Metal::new(STEEL, smoothness::POLISHED, roughness::TIGHT, 0.0)
    }

    pub fn tin() -> Metal {
        Metal::new(TIN, smoothness::BARELY, roughness::LOOSE, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;
    use crate::mediums::{roughness, smoothness};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_metal_specular_is_tinted() {
        let gold = metals::gold();
        let highlight = gold.specular(DVec3::ZERO, 1.0, colors::WHITE);
        assert!((highlight - metals::GOLD).length() < 1e-12);
        assert_eq!(gold.specular(DVec3::ZERO, -0.2, colors::WHITE), Color::ZERO);
    }

    #[test]
    fn test_metal_smooth_metal_has_no_perturbation() {
        let mut rng = StdRng::seed_from_u64(42);
        let chrome = metals::chrome();
        for _ in 0..10 {
            assert_eq!(chrome.perturbation(DVec3::ZERO, &mut rng), DVec3::ZERO);
        }
    }

    #[test]
    fn test_metal_fuzz_is_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let brushed = Metal::new(colors::GREY, smoothness::POLISHED, roughness::MEDIUM, 3.0);
        assert_eq!(brushed.fuzz(), 1.0);

        let fuzzy = brushed.with_fuzz(0.25);
        for _ in 0..50 {
            let jitter = fuzzy.perturbation(DVec3::ZERO, &mut rng);
            assert!((jitter.length() - 0.25).abs() < 1e-9);
        }
    }
}
