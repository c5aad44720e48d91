//! Paired cameras for stereoscopic renders.
//!
//! The two eyes sit either side of the requested position, a `separation`
//! apart along the view's right vector, and both toe in toward the same
//! look-at point. Their captures merge into one image, side by side or
//! stacked.

use glint_math::{nearly_zero, DVec3};

use crate::camera::Camera;
use crate::image::Image;
use crate::{RaytraceError, RaytraceResult};

/// Where each eye lands in the merged image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StereoLayout {
    /// Left eye on the left half.
    #[default]
    LeftRight,
    /// Left eye on the top half.
    TopBottom,
}

#[derive(Debug, Clone)]
pub struct StereoCamera {
    left: Camera,
    right: Camera,
    separation: f64,
    layout: StereoLayout,
    /// Angle between the view direction and each eye's own, in radians.
    toe_in: f64,
}

impl StereoCamera {
    /// Two `height` by `width` eyes at the origin looking down `+X`.
    pub fn new(
        height: usize,
        width: usize,
        field_of_view: f64,
        separation: f64,
        layout: StereoLayout,
    ) -> RaytraceResult<Self> {
        if !(separation >= 0.0 && separation.is_finite()) {
            return Err(RaytraceError::NegativeSeparation(separation));
        }
        let mut stereo = Self {
            left: Camera::new(height, width, field_of_view)?,
            right: Camera::new(height, width, field_of_view)?,
            separation,
            layout,
            toe_in: 0.0,
        };
        stereo.move_to(DVec3::ZERO, DVec3::X)?;
        Ok(stereo)
    }

    /// Center the eyes on `from`, both looking toward `at`.
    pub fn move_to(&mut self, from: DVec3, at: DVec3) -> RaytraceResult<()> {
        let look = at - from;
        if nearly_zero(look.length()) {
            return Err(RaytraceError::CoincidentLook);
        }
        let right = look.normalize().cross(DVec3::Z);
        if nearly_zero(right.length()) {
            return Err(RaytraceError::VerticalLook);
        }
        let offset = right.normalize() * (self.separation * 0.5);
        let left_eye = from - offset;
        self.left.move_to(left_eye, at)?;
        self.right.move_to(from + offset, at)?;
        self.toe_in = look.angle_between(at - left_eye);
        log::debug!(
            "Stereo eyes {:.3} apart at {:?}, toe-in {:.4} degrees",
            self.separation,
            from,
            self.toe_in.to_degrees()
        );
        Ok(())
    }

    pub fn set_field_of_view(&mut self, field_of_view: f64) {
        self.left.set_field_of_view(field_of_view);
        self.right.set_field_of_view(field_of_view);
    }

    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn layout(&self) -> StereoLayout {
        self.layout
    }

    /// Radians each eye turns inward from the shared view direction.
    pub fn toe_in(&self) -> f64 {
        self.toe_in
    }

    pub fn left(&self) -> &Camera {
        &self.left
    }

    pub fn right(&self) -> &Camera {
        &self.right
    }

    /// Both eyes, left first, for rendering into.
    pub fn cameras_mut(&mut self) -> [&mut Camera; 2] {
        [&mut self.left, &mut self.right]
    }

    /// The two captures in one image laid out per [`StereoLayout`].
    pub fn merge_images(&self) -> RaytraceResult<Image> {
        let left = self.left.capture();
        let right = self.right.capture();
        let (height, width) = (left.height(), left.width());
        let (merged_height, merged_width, shift) = match self.layout {
            StereoLayout::LeftRight => (height, width * 2, (0, width)),
            StereoLayout::TopBottom => (height * 2, width, (height, 0)),
        };
        let mut merged = Image::new(merged_height, merged_width)?;
        for y in 0..height {
            for x in 0..width {
                merged.set(y, x, left.at(y, x));
                merged.set(y + shift.0, x + shift.1, right.at(y, x));
            }
        }
        Ok(merged)
    }
}
