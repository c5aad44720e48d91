//! Pinhole camera with an image plane through the look-at point.
//!
//! World `+Z` is up. Raster `x` grows to the camera's right and raster `y`
//! grows downward, with the principal point at the image center.

use glint_math::{nearly_zero, DVec2, DVec3, Ray};

use crate::image::Image;
use crate::{RaytraceError, RaytraceResult};

/// Default field of view in degrees.
pub const DEFAULT_FIELD_OF_VIEW: f64 = 55.0;

/// The viewing geometry, separate from the capture so it can be shared with
/// render workers while the capture is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    from: DVec3,
    at: DVec3,
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    /// Horizontal field of view in degrees.
    field_of_view: f64,
    /// World size of one pixel on the image plane.
    pixel_scale: f64,
    principal: DVec2,
}

impl Lens {
    fn new(height: usize, width: usize, field_of_view: f64) -> Self {
        Self {
            from: DVec3::ZERO,
            at: DVec3::X,
            forward: DVec3::X,
            right: DVec3::NEG_Y,
            up: DVec3::Z,
            field_of_view,
            pixel_scale: 0.0,
            principal: DVec2::new(width as f64 / 2.0, height as f64 / 2.0),
        }
    }

    fn look(&mut self, from: DVec3, at: DVec3) -> RaytraceResult<()> {
        let look = at - from;
        if nearly_zero(look.length()) {
            return Err(RaytraceError::CoincidentLook);
        }
        let forward = look.normalize();
        let left = DVec3::Z.cross(forward);
        if nearly_zero(left.length()) {
            return Err(RaytraceError::VerticalLook);
        }
        let left = left.normalize();
        self.from = from;
        self.at = at;
        self.forward = forward;
        self.right = -left;
        self.up = forward.cross(left);
        self.rescale();
        Ok(())
    }

    fn rescale(&mut self) {
        let distance = (self.at - self.from).length();
        let half_width = distance * (self.field_of_view.to_radians() / 2.0).tan();
        self.pixel_scale = 2.0 * half_width / (self.principal.x * 2.0).max(1.0);
    }

    /// World point on the image plane under a raster point.
    pub fn plane_point(&self, raster: DVec2) -> DVec3 {
        let offset = (raster - self.principal) * self.pixel_scale;
        self.at + self.right * offset.x - self.up * offset.y
    }

    /// Ray from the image plane away from the eye, through `raster`.
    pub fn cast(&self, raster: DVec2) -> Ray {
        let point = self.plane_point(raster);
        Ray::new(point, (point - self.from).normalize())
    }

    pub fn position(&self) -> DVec3 {
        self.from
    }

    pub fn at(&self) -> DVec3 {
        self.at
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }
}

/// A lens plus the image it captures into.
#[derive(Debug, Clone)]
pub struct Camera {
    lens: Lens,
    capture: Image,
}

impl Camera {
    /// A camera at the origin looking down `+X`.
    pub fn new(height: usize, width: usize, field_of_view: f64) -> RaytraceResult<Self> {
        let capture = Image::new(height, width)?;
        let mut lens = Lens::new(height, width, field_of_view);
        lens.look(DVec3::ZERO, DVec3::X)?;
        Ok(Self { lens, capture })
    }

    /// Place the eye at `from` looking toward `at`.
    pub fn move_to(&mut self, from: DVec3, at: DVec3) -> RaytraceResult<()> {
        self.lens.look(from, at)?;
        log::debug!("Camera moved to {:?} looking at {:?}", from, at);
        Ok(())
    }

    pub fn set_field_of_view(&mut self, field_of_view: f64) {
        self.lens.field_of_view = field_of_view;
        self.lens.rescale();
    }

    pub fn cast(&self, raster: DVec2) -> Ray {
        self.lens.cast(raster)
    }

    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    pub fn position(&self) -> DVec3 {
        self.lens.from
    }

    pub fn at(&self) -> DVec3 {
        self.lens.at
    }

    pub fn forward(&self) -> DVec3 {
        self.lens.forward
    }

    pub fn field_of_view(&self) -> f64 {
        self.lens.field_of_view
    }

    pub fn capture(&self) -> &Image {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut Image {
        &mut self.capture
    }

    pub fn width(&self) -> usize {
        self.capture.width()
    }

    pub fn height(&self) -> usize {
        self.capture.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_ray_passes_through_look_at() {
        let mut camera = Camera::new(480, 640, 55.0).unwrap();
        camera
            .move_to(DVec3::new(0.0, -10.0, 5.0), DVec3::new(0.0, 0.0, 1.0))
            .unwrap();
        let ray = camera.cast(DVec2::new(320.0, 240.0));
        assert!((ray.origin - camera.at()).length() < 1e-9);
        assert!((ray.direction - camera.forward()).length() < 1e-9);
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_looks_down_x() {
        let camera = Camera::new(4, 4, DEFAULT_FIELD_OF_VIEW).unwrap();
        assert_eq!(camera.position(), DVec3::ZERO);
        assert_eq!(camera.forward(), DVec3::X);
        assert_eq!(camera.lens().up(), DVec3::Z);
    }

    #[test]
    fn test_field_of_view_spans_image_width() {
        let mut camera = Camera::new(100, 200, 90.0).unwrap();
        camera.move_to(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0)).unwrap();
        // the left edge sits 45 degrees off axis, 10 units to the left
        let left = camera.lens().plane_point(DVec2::new(0.0, 50.0));
        assert!((left - DVec3::new(10.0, 10.0, 0.0)).length() < 1e-9);
        let right = camera.lens().plane_point(DVec2::new(200.0, 50.0));
        assert!((right - DVec3::new(10.0, -10.0, 0.0)).length() < 1e-9);
        // raster y grows downward
        let top = camera.lens().plane_point(DVec2::new(100.0, 0.0));
        assert!(top.z > 0.0);

        camera.set_field_of_view(45.0);
        let left = camera.lens().plane_point(DVec2::new(0.0, 50.0));
        assert!(left.y < 10.0);
    }

    #[test]
    fn test_move_to_rejects_degenerate_looks() {
        let mut camera = Camera::new(2, 2, 55.0).unwrap();
        assert_eq!(
            camera.move_to(DVec3::ONE, DVec3::ONE).unwrap_err(),
            RaytraceError::CoincidentLook
        );
        assert_eq!(
            camera.move_to(DVec3::ZERO, DVec3::new(0.0, 0.0, 5.0)).unwrap_err(),
            RaytraceError::VerticalLook
        );
        // the previous view is kept
        assert_eq!(camera.forward(), DVec3::X);
    }

    #[test]
    fn test_camera_rejects_odd_image() {
        assert!(Camera::new(3, 4, 55.0).is_err());
    }
}
