//! Render settings.

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FIELD_OF_VIEW};
use crate::image::AAA_MASK_DISABLED;
use crate::RaytraceResult;

/// How the scene picks objects to test against a ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Culling {
    /// Test every object.
    #[default]
    BruteForce,
    /// Skip objects whose world bounds the ray misses.
    BoundingBox,
}

/// Settings for one render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels, must be even
    pub width: usize,
    /// Image height in pixels, must be even
    pub height: usize,
    /// Horizontal field of view in degrees
    pub field_of_view: f64,
    /// Subsamples per pixel
    pub samples: usize,
    /// Maximum reflection/refraction recursion
    pub depth: usize,
    /// Edge strength (0-255) a pixel needs to get the full sample count.
    /// 255 disables the adaptive pass.
    pub mask_threshold: u8,
    /// Reflections contributing less than this are not traced
    pub reflection_threshold: f64,
    pub culling: Culling,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            samples: 1,
            depth: 4,
            mask_threshold: AAA_MASK_DISABLED,
            reflection_threshold: 0.01,
            culling: Culling::BruteForce,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolution(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_field_of_view(mut self, degrees: f64) -> Self {
        self.field_of_view = degrees;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: usize, depth: usize) -> Self {
        self.samples = samples;
        self.depth = depth;
        self
    }

    pub fn with_mask_threshold(mut self, threshold: u8) -> Self {
        self.mask_threshold = threshold;
        self
    }

    pub fn with_reflection_threshold(mut self, threshold: f64) -> Self {
        self.reflection_threshold = threshold;
        self
    }

    pub fn with_culling(mut self, culling: Culling) -> Self {
        self.culling = culling;
        self
    }

    pub fn is_adaptive(&self) -> bool {
        self.mask_threshold != AAA_MASK_DISABLED
    }

    /// A camera with this resolution and field of view.
    pub fn camera(&self) -> RaytraceResult<Camera> {
        Camera::new(self.height, self.width, self.field_of_view)
    }
}
