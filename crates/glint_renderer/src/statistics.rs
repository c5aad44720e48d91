//! Render counters.
//!
//! A `Statistics` value is threaded through tracing by `&mut` so that every
//! worker owns its counters; partial results are merged afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Counts of the work done during a trace or render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Primary rays cast from the camera
    pub cast_rays_from_camera: usize,
    /// Calls to the tracer, including recursion
    pub traced_rays: usize,
    /// Object intersection tests performed
    pub intersections: usize,
    /// Intersection tests skipped by bounding-box culling
    pub culled_objects: usize,
    /// Surfaces which checked their lights for shadows
    pub shadow_rays: usize,
    /// Individual light samples taken
    pub sampled_rays: usize,
    /// Light samples which reached the light
    pub color_sampled_rays: usize,
    /// Light samples which were blocked
    pub point_in_shadow: usize,
    /// Reflection rays followed
    pub bounced_rays: usize,
    /// Refraction rays followed
    pub transmitted_rays: usize,
    /// Bounces skipped by the adaptive reflection threshold
    pub saved_ray_traces: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another set of counters into this one.
    pub fn merge(&mut self, other: &Statistics) {
        *self += *other;
    }
}

impl AddAssign for Statistics {
    fn add_assign(&mut self, other: Self) {
        self.cast_rays_from_camera += other.cast_rays_from_camera;
        self.traced_rays += other.traced_rays;
        self.intersections += other.intersections;
        self.culled_objects += other.culled_objects;
        self.shadow_rays += other.shadow_rays;
        self.sampled_rays += other.sampled_rays;
        self.color_sampled_rays += other.color_sampled_rays;
        self.point_in_shadow += other.point_in_shadow;
        self.bounced_rays += other.bounced_rays;
        self.transmitted_rays += other.transmitted_rays;
        self.saved_ray_traces += other.saved_ray_traces;
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "camera rays: {}, traced: {}, intersections: {} (culled {}), shadow: {}, sampled: {} (lit {}, shadowed {}), bounced: {}, transmitted: {}, saved: {}",
            self.cast_rays_from_camera,
            self.traced_rays,
            self.intersections,
            self.culled_objects,
            self.shadow_rays,
            self.sampled_rays,
            self.color_sampled_rays,
            self.point_in_shadow,
            self.bounced_rays,
            self.transmitted_rays,
            self.saved_ray_traces,
        )
    }
}
