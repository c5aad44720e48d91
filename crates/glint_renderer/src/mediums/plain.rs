use crate::color::Color;

use super::{Medium, MediumBase};

/// A single-colored opaque medium.
#[derive(Debug, Clone)]
pub struct Plain {
    base: MediumBase,
}

impl Plain {
    pub fn new(diffuse: Color, ambient_scale: f64, smoothness: f64, tightness: f64) -> Self {
        Self {
            base: MediumBase::new()
                .with_diffuse(diffuse)
                .with_ambient(diffuse, ambient_scale)
                .with_smoothness(smoothness)
                .with_tightness(tightness),
        }
    }

    /// A plain medium from fully specified parameters.
    pub fn from_base(base: MediumBase) -> Self {
        Self { base }
    }
}

impl Medium for Plain {
    fn base(&self) -> &MediumBase {
        &self.base
    }
}

/// Common plain media.
pub mod plains {
    use super::Plain;
    use crate::color::colors;
    use crate::mediums::{ambient, roughness, smoothness};

    /// Grey with no shine. Objects start out with this.
    pub fn dull() -> Plain {
        Plain::new(colors::GREY, ambient::NONE, smoothness::NONE, roughness::LOOSE)
    }

    pub fn glossy(color: crate::color::Color) -> Plain {
        Plain::new(color, ambient::DIM, smoothness::SMALL, roughness::TIGHT)
    }
}
