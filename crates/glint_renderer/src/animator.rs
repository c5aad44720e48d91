//! Keyframed camera paths.
//!
//! An [`Animator`] walks a list of [`Anchor`]s, yielding one set of camera
//! [`Attributes`] per frame. Time is an integer frame count from the start
//! of the whole animation, and each anchor knows when it began, so frames
//! stay evenly spaced across anchor boundaries.

use std::fmt;
use std::sync::Arc;

use glint_math::DVec3;

use crate::camera::{Camera, DEFAULT_FIELD_OF_VIEW};
use crate::{RaytraceError, RaytraceResult};

/// Camera placement at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes {
    pub from: DVec3,
    pub at: DVec3,
    /// Horizontal field of view in degrees.
    pub fov: f64,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            from: DVec3::new(0.0, 10.0, 10.0),
            at: DVec3::ZERO,
            fov: DEFAULT_FIELD_OF_VIEW,
        }
    }
}

impl Attributes {
    pub fn new(from: DVec3, at: DVec3, fov: f64) -> Self {
        Self { from, at, fov }
    }

    /// Point the camera as described.
    pub fn apply(&self, camera: &mut Camera) -> RaytraceResult<()> {
        camera.move_to(self.from, self.at)?;
        camera.set_field_of_view(self.fov);
        Ok(())
    }
}

/// Shapes the fraction of an anchor that has elapsed.
#[derive(Clone, Default)]
pub enum Mapper {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl Mapper {
    /// Maps `t` in `[0, 1]` onto `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Mapper::Linear => t,
            Mapper::EaseIn => t * t,
            Mapper::EaseOut => t * (2.0 - t),
            Mapper::EaseInOut => t * t * (3.0 - 2.0 * t),
            Mapper::Custom(f) => f(t),
        }
    }

    fn lerp<T>(&self, start: T, limit: T, t: f64) -> T
    where
        T: Copy + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + std::ops::Mul<f64, Output = T>,
    {
        start + (limit - start) * self.apply(t)
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapper::Linear => write!(f, "Linear"),
            Mapper::EaseIn => write!(f, "EaseIn"),
            Mapper::EaseOut => write!(f, "EaseOut"),
            Mapper::EaseInOut => write!(f, "EaseInOut"),
            Mapper::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// One mapper per attribute.
#[derive(Debug, Clone, Default)]
pub struct Mappers {
    pub from: Mapper,
    pub at: Mapper,
    pub fov: Mapper,
}

/// A transition from `start` to `limit` over `duration` seconds.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub start: Attributes,
    pub limit: Attributes,
    pub mappers: Mappers,
    pub duration: f64,
}

impl Anchor {
    pub fn new(start: Attributes, limit: Attributes, duration: f64) -> Self {
        Self {
            start,
            limit,
            mappers: Mappers::default(),
            duration,
        }
    }

    pub fn with_mappers(mut self, mappers: Mappers) -> Self {
        self.mappers = mappers;
        self
    }

    fn interpolate(&self, t: f64) -> Attributes {
        Attributes {
            from: self.mappers.from.lerp(self.start.from, self.limit.from, t),
            at: self.mappers.at.lerp(self.start.at, self.limit.at, t),
            fov: self.mappers.fov.lerp(self.start.fov, self.limit.fov, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Pending,
    Running,
    Finished,
}

/// Yields camera attributes frame by frame.
#[derive(Debug, Clone)]
pub struct Animator {
    frame_rate: f64,
    anchors: Vec<Anchor>,
    index: usize,
    /// Frames taken since the animation began.
    frame: u64,
    /// Seconds at which the current anchor began.
    start: f64,
    started: bool,
}

impl Animator {
    pub fn new(frame_rate: f64, anchors: Vec<Anchor>) -> RaytraceResult<Self> {
        if !(frame_rate > 0.0 && frame_rate.is_finite()) {
            return Err(RaytraceError::InvalidFrameRate(frame_rate));
        }
        if let Some(anchor) = anchors
            .iter()
            .find(|anchor| !(anchor.duration > 0.0 && anchor.duration.is_finite()))
        {
            return Err(RaytraceError::InvalidDuration(anchor.duration));
        }
        log::debug!(
            "Animator created at {} fps ({} s per frame) with {} anchors",
            frame_rate,
            1.0 / frame_rate,
            anchors.len()
        );
        Ok(Self {
            frame_rate,
            anchors,
            index: 0,
            frame: 0,
            start: 0.0,
            started: false,
        })
    }

    pub fn state(&self) -> AnimatorState {
        if self.index >= self.anchors.len() {
            AnimatorState::Finished
        } else if self.started {
            AnimatorState::Running
        } else {
            AnimatorState::Pending
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == AnimatorState::Finished
    }

    /// Index of the anchor the next frame comes from.
    pub fn anchor_index(&self) -> usize {
        self.index
    }

    /// The next frame, or the default attributes once finished.
    pub fn step(&mut self) -> Attributes {
        self.next().unwrap_or_default()
    }
}

impl Iterator for Animator {
    type Item = Attributes;

    fn next(&mut self) -> Option<Attributes> {
        let anchor = self.anchors.get(self.index)?;
        self.started = true;
        let now = self.frame as f64 / self.frame_rate;
        let attributes = anchor.interpolate((now - self.start) / anchor.duration);
        self.frame += 1;
        let next = self.frame as f64 / self.frame_rate;
        // tolerate rounding so an exact frame lands on the anchor's end
        while let Some(anchor) = self.anchors.get(self.index) {
            let end = self.start + anchor.duration;
            if next <= end * (1.0 + f64::EPSILON * 4.0) {
                break;
            }
            self.start = end;
            self.index += 1;
        }
        Some(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_animator_steps_single_anchor() {
        let anchor = Anchor::new(
            Attributes::new(DVec3::new(0.0, 10.0, 10.0), DVec3::ZERO, 55.0),
            Attributes::new(DVec3::new(10.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -10.0), 45.0),
            1.0,
        );
        let mut animator = Animator::new(10.0, vec![anchor]).unwrap();
        assert_eq!(animator.state(), AnimatorState::Pending);
        for i in 0..11 {
            assert!(!animator.is_finished());
            let cam = animator.step();
            let i = i as f64;
            assert_point(cam.from, DVec3::new(i, 10.0 - i, 10.0));
            assert_point(cam.at, DVec3::new(0.0, 0.0, -i));
            assert!((cam.fov - (55.0 - i)).abs() < 1e-9);
        }
        assert!(animator.is_finished());
        assert_eq!(animator.next(), None);
        assert_eq!(animator.step(), Attributes::default());
    }

    #[test]
    fn test_animator_moves_through_anchors() {
        let a = Attributes::default();
        let b = Attributes::new(DVec3::new(0.0, 20.0, 10.0), DVec3::ZERO, 55.0);
        let anchors = vec![Anchor::new(a, b, 0.5), Anchor::new(b, a, 0.5)];
        let mut animator = Animator::new(4.0, anchors).unwrap();
        let frames: Vec<Attributes> = animator.by_ref().collect();
        // the shared end point of the two anchors is shown once
        assert_eq!(frames.len(), 5);
        assert_point(frames[2].from, b.from);
        assert_point(frames[3].from, (a.from + b.from) * 0.5);
        assert_point(frames[4].from, a.from);
        assert_eq!(animator.state(), AnimatorState::Finished);
    }

    #[test]
    fn test_animator_frames_evenly_spaced_across_anchors() {
        let at = |fov| Attributes::new(DVec3::new(0.0, 10.0, 10.0), DVec3::ZERO, fov);
        let anchors = vec![
            Anchor::new(at(40.0), at(50.0), 0.5),
            Anchor::new(at(50.0), at(60.0), 0.5),
        ];
        let animator = Animator::new(4.0, anchors).unwrap();
        let fovs: Vec<f64> = animator.map(|frame| frame.fov).collect();
        let expected = [40.0, 45.0, 50.0, 55.0, 60.0];
        assert_eq!(fovs.len(), expected.len());
        for (fov, want) in fovs.iter().zip(expected) {
            assert!((fov - want).abs() < 1e-9, "{:?}", fovs);
        }
    }

    #[test]
    fn test_animator_skips_anchors_shorter_than_a_frame() {
        let at = |fov| Attributes::new(DVec3::new(0.0, 10.0, 10.0), DVec3::ZERO, fov);
        let anchors = vec![
            Anchor::new(at(10.0), at(20.0), 1.0),
            Anchor::new(at(20.0), at(30.0), 0.1),
            Anchor::new(at(30.0), at(40.0), 0.9),
        ];
        let mut animator = Animator::new(2.0, anchors).unwrap();
        let fovs: Vec<f64> = animator.by_ref().map(|frame| frame.fov).collect();
        // frames at 0, 0.5, 1.0, 1.5 and 2.0 seconds
        let expected = [10.0, 15.0, 20.0, 30.0 + 10.0 * 0.4 / 0.9, 40.0];
        assert_eq!(fovs.len(), expected.len());
        for (fov, want) in fovs.iter().zip(expected) {
            assert!((fov - want).abs() < 1e-9, "{:?}", fovs);
        }
        assert!(animator.is_finished());
    }

    #[test]
    fn test_mappers_shape_progress() {
        assert_eq!(Mapper::Linear.apply(0.25), 0.25);
        assert_eq!(Mapper::EaseIn.apply(0.5), 0.25);
        assert_eq!(Mapper::EaseOut.apply(0.5), 0.75);
        assert_eq!(Mapper::EaseInOut.apply(0.5), 0.5);
        assert_eq!(Mapper::EaseInOut.apply(2.0), 1.0);
        let custom = Mapper::Custom(Arc::new(|t| t.sqrt()));
        assert!((custom.apply(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_animator_rejects_bad_timing() {
        assert_eq!(
            Animator::new(0.0, vec![]).unwrap_err(),
            RaytraceError::InvalidFrameRate(0.0)
        );
        let anchor = Anchor::new(Attributes::default(), Attributes::default(), -1.0);
        assert_eq!(
            Animator::new(24.0, vec![anchor]).unwrap_err(),
            RaytraceError::InvalidDuration(-1.0)
        );
        assert!(Animator::new(24.0, vec![]).unwrap().is_finished());
    }

    #[test]
    fn test_attributes_point_camera() {
        let mut camera = Camera::new(4, 4, 90.0).unwrap();
        let attributes = Attributes::new(DVec3::new(0.0, -5.0, 1.0), DVec3::ZERO, 30.0);
        attributes.apply(&mut camera).unwrap();
        assert_eq!(camera.position(), attributes.from);
        assert_eq!(camera.field_of_view(), 30.0);
    }
}
