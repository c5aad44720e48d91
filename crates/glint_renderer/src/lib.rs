//! glint - a Whitted-style CPU ray tracer.
//!
//! Rays are cast from a pinhole [`Camera`] into a [`Scene`] of implicit
//! surfaces. Each hit is shaded from its [`Medium`](mediums::Medium)
//! (ambient, diffuse and specular terms plus shadow-tested light samples)
//! and recursively reflected and refracted up to a fixed depth.
//!
//! Surfaces live in [`objects`], materials in [`mediums`] and light
//! sources in [`lights`]. The optics in [`laws`] and the parametrizations
//! in [`mapping`] are plain functions.

pub mod animator;
pub mod bounds;
pub mod camera;
pub mod color;
pub mod config;
pub mod entity;
pub mod error;
pub mod image;
pub mod laws;
pub mod lights;
pub mod mapping;
pub mod mediums;
pub mod objects;
pub mod scene;
pub mod statistics;
pub mod stereo;

pub use animator::{Anchor, Animator, Attributes, Mapper, Mappers};
pub use bounds::Bounds;
pub use camera::{Camera, Lens};
pub use color::{colors, Color};
pub use config::{Culling, RenderConfig};
pub use entity::Entity;
pub use error::{RaytraceError, RaytraceResult};
pub use crate::image::{Image, Rgb8, RowNotifier, AAA_MASK_DISABLED, AAA_MASK_ENABLED};
pub use lights::{Emission, Falloff, Light};
pub use mediums::Medium;
pub use objects::{Hit, Object};
pub use scene::{Background, Scene};
pub use statistics::Statistics;
pub use stereo::{StereoCamera, StereoLayout};

/// Re-export the math types from glint_math
pub use glint_math::{DVec2, DVec3, Interval, Ray, EPSILON};
