//! Scene graph and the recursive Whitted tracer.
//!
//! A [`Scene`] owns its objects and lights, the medium everything sits in
//! and a background for rays that escape. [`Scene::trace`] shades one ray
//! and [`Scene::render`] drives a camera's capture through it.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;

use glint_math::{DVec2, Ray, EPSILON};
use rand::RngCore;

use crate::camera::Camera;
use crate::color::{self, colors, Color};
use crate::config::{Culling, RenderConfig};
use crate::image::{Image, RowNotifier, AAA_MASK_DISABLED};
use crate::lights::Light;
use crate::mediums::{vacuum, Medium};
use crate::objects::{Hit, Object};
use crate::statistics::Statistics;
use crate::stereo::StereoCamera;
use crate::RaytraceResult;

/// Color seen along a ray that hits nothing.
pub type Background = Arc<dyn Fn(&Ray) -> Color + Send + Sync>;

/// A background that fades from `bottom` to `top` with the ray's elevation.
pub fn gradient(bottom: Color, top: Color) -> Background {
    Arc::new(move |ray: &Ray| {
        let elevation = ray.direction.normalize_or_zero().z;
        color::interpolate(top, bottom, 0.5 * (elevation + 1.0))
    })
}

pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    lights: Vec<Box<dyn Light>>,
    media: Arc<dyn Medium>,
    background: Background,
    reflection_threshold: f64,
    culling: Culling,
}

impl Scene {
    /// An empty scene in a vacuum with a black background.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            media: Arc::new(vacuum()),
            background: Arc::new(|_: &Ray| colors::BLACK),
            reflection_threshold: RenderConfig::default().reflection_threshold,
            culling: Culling::default(),
        }
    }

    /// An empty scene using the thresholds and culling from `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            reflection_threshold: config.reflection_threshold,
            culling: config.culling,
            ..Self::new()
        }
    }

    pub fn add_object(&mut self, object: Box<dyn Object>) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    /// Replace the medium the scene is immersed in.
    pub fn add_media(&mut self, media: Arc<dyn Medium>) {
        self.media = media;
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn set_reflection_threshold(&mut self, threshold: f64) {
        self.reflection_threshold = threshold;
    }

    pub fn set_culling(&mut self, culling: Culling) {
        self.culling = culling;
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.lights.clear();
    }

    pub fn objects(&self) -> &[Box<dyn Object>] {
        &self.objects
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    pub fn media(&self) -> &dyn Medium {
        self.media.as_ref()
    }

    /// The closest hit more than `EPSILON` along the ray, with its
    /// distance from the ray's origin.
    pub fn nearest_hit(&self, world_ray: &Ray, stats: &mut Statistics) -> Option<(Hit<'_>, f64)> {
        let mut nearest: Option<(Hit<'_>, f64)> = None;
        for object in &self.objects {
            if self.culling == Culling::BoundingBox {
                let bounds = object.world_bounds();
                if !bounds.is_infinite() && !bounds.intersects_ray(world_ray) {
                    stats.culled_objects += 1;
                    continue;
                }
            }
            stats.intersections += 1;
            let Some(hit) = object.intersect(world_ray) else {
                continue;
            };
            if hit.t <= EPSILON {
                continue;
            }
            let distance = (hit.point - world_ray.origin).length();
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((hit, distance));
            }
        }
        nearest
    }

    /// Color seen along `world_ray` travelling through `media`.
    ///
    /// `depth` bounds the recursion and `contribution` is how much the
    /// result matters to the final pixel.
    pub fn trace(
        &self,
        world_ray: &Ray,
        media: &dyn Medium,
        depth: usize,
        contribution: f64,
        rng: &mut dyn RngCore,
        stats: &mut Statistics,
    ) -> Color {
        stats.traced_rays += 1;
        let Some((hit, distance)) = self.nearest_hit(world_ray, stats) else {
            return media.absorbance(f64::INFINITY, (self.background)(world_ray));
        };

        let object = hit.object;
        let medium = object.medium();
        let object_point = object.entity().reverse_transform(hit.point);
        let direction = world_ray.direction.normalize_or_zero();
        let normal = hit.normal;
        // leaving the object rather than entering it
        let inside_out = normal.dot(direction) > 0.0;
        let facing = if inside_out { -normal } else { normal };

        let reflection = object.reflection(world_ray, hit.point, rng);
        let (n1, n2) = if inside_out {
            (
                medium.refractive_index(object_point),
                self.media.refractive_index(hit.point),
            )
        } else {
            (
                media.refractive_index(hit.point),
                medium.refractive_index(object_point),
            )
        };
        let refraction = object.refraction(world_ray, hit.point, n1, n2);

        let incident_angle = (-direction).dot(facing).clamp(-1.0, 1.0).acos();
        let transmitted_angle = if !refraction.is_null() {
            let refracted = refraction.direction.normalize();
            refracted.dot(-facing).clamp(-1.0, 1.0).acos()
        } else if n1 > 0.0 && n2 > 0.0 {
            // total internal reflection
            FRAC_PI_2
        } else {
            0.0
        };
        // radiosity is always asked from the outside of the surface
        let radiosity = if inside_out {
            medium.radiosity(object_point, n2, transmitted_angle, incident_angle)
        } else {
            medium.radiosity(object_point, n1, incident_angle, transmitted_angle)
        };

        let emitted = if radiosity.emitted > 0.0 {
            medium.emissive(object_point) * radiosity.emitted
        } else {
            colors::BLACK
        };

        let mut reflected = colors::BLACK;
        if radiosity.reflected > 0.0 {
            let mirror = reflection.direction.normalize_or_zero();
            let mut surface_colors = Vec::with_capacity(self.lights.len() + 1);
            surface_colors.push(medium.ambient(object_point));
            for light in &self.lights {
                stats.shadow_rays += 1;
                let samples: Vec<Color> = (0..light.number_of_samples())
                    .map(|index| {
                        self.light_sample(light.as_ref(), index, &hit, object_point, mirror, stats)
                    })
                    .collect();
                surface_colors.push(color::blend_samples(&samples));
            }
            let surface = color::accumulate_samples(&surface_colors);

            let smoothness = medium.smoothness(object_point);
            reflected = if depth > 0 && smoothness > 0.0 {
                if contribution < self.reflection_threshold {
                    stats.saved_ray_traces += depth;
                    surface
                } else {
                    stats.bounced_rays += 1;
                    let incoming = self.trace(
                        &reflection,
                        media,
                        depth - 1,
                        contribution * smoothness,
                        rng,
                        stats,
                    );
                    let bounced = medium.bounced(object_point, incoming);
                    color::interpolate(bounced, surface, smoothness)
                }
            } else {
                surface
            };
        }

        let mut transparency = 0.0;
        let mut transmitted = colors::BLACK;
        if depth > 0 && radiosity.transmitted > 0.0 && !refraction.is_null() {
            stats.transmitted_rays += 1;
            transparency = radiosity.transmitted;
            let next_media = if inside_out { self.media.as_ref() } else { medium };
            transmitted = self.trace(&refraction, next_media, depth - 1, contribution, rng, stats);
        }

        let surface_color = color::accumulate(
            color::interpolate(transmitted, reflected, transparency),
            emitted,
        );
        media.absorbance(distance, surface_color)
    }

    /// One shadow-tested sample of a light at a surface hit.
    fn light_sample(
        &self,
        light: &dyn Light,
        index: usize,
        hit: &Hit<'_>,
        object_point: glint_math::DVec3,
        mirror: glint_math::DVec3,
        stats: &mut Statistics,
    ) -> Color {
        stats.sampled_rays += 1;
        let incident = light.incident(hit.point, index);
        let light_distance = incident.direction.length();
        let to_light = incident.direction.normalize_or_zero();
        let shadow_ray = Ray::new(hit.point, to_light);
        let blocked = match self.nearest_hit(&shadow_ray, stats) {
            None => false,
            Some(_) if light.is_directional() => true,
            Some((_, distance)) => distance < light_distance,
        };
        if blocked {
            stats.point_in_shadow += 1;
            return colors::BLACK;
        }
        stats.color_sampled_rays += 1;
        let medium = hit.object.medium();
        let light_color = light.color_at(hit.point);
        let incident_scaling = to_light.dot(hit.normal);
        let diffuse = if incident_scaling > 0.0 {
            medium.diffuse(object_point) * light_color * incident_scaling
        } else {
            colors::BLACK
        };
        let specular = medium.specular(object_point, to_light.dot(mirror), light_color);
        diffuse + specular
    }

    /// Render the scene into `camera`'s capture.
    ///
    /// With a `mask_threshold` other than [`AAA_MASK_DISABLED`] the first
    /// pass takes a single sample per pixel, then pixels along edges
    /// strong enough to pass the threshold are redone with `samples`.
    pub fn render(
        &self,
        camera: &mut Camera,
        samples: usize,
        depth: usize,
        row_notifier: Option<&RowNotifier<'_>>,
        mask_threshold: u8,
        stats: &mut Statistics,
    ) {
        let adaptive = mask_threshold != AAA_MASK_DISABLED;
        log::info!(
            "Rendering {}x{} with {} objects, {} lights, {} samples, depth {}{}",
            camera.width(),
            camera.height(),
            self.objects.len(),
            self.lights.len(),
            samples,
            depth,
            if adaptive { " (adaptive)" } else { "" }
        );
        let lens = *camera.lens();
        let media = self.media.as_ref();
        let tracer = |raster: DVec2, rng: &mut dyn RngCore, stats: &mut Statistics| {
            let ray = lens.cast(raster);
            stats.cast_rays_from_camera += 1;
            self.trace(&ray, media, depth, 1.0, rng, stats)
        };

        let capture = camera.capture_mut();
        capture.fill_mask(AAA_MASK_DISABLED);
        let first_samples = if adaptive { 1 } else { samples };
        *stats += capture.generate_each(&tracer, first_samples, row_notifier, AAA_MASK_DISABLED);
        if adaptive {
            if let Some(notify) = row_notifier {
                for y in 0..capture.height() {
                    notify(y, false);
                }
            }
            capture.compute_mask();
            *stats += capture.generate_each(&tracer, samples, row_notifier, mask_threshold);
        }
        log::info!("Render finished: {}", stats);
    }

    /// Render using the sample count, depth and mask threshold of `config`.
    pub fn render_with(
        &self,
        camera: &mut Camera,
        config: &RenderConfig,
        row_notifier: Option<&RowNotifier<'_>>,
        stats: &mut Statistics,
    ) {
        self.render(
            camera,
            config.samples,
            config.depth,
            row_notifier,
            config.mask_threshold,
            stats,
        );
    }

    /// Render both eyes of `stereo` and merge them into one image.
    pub fn render_stereo(
        &self,
        stereo: &mut StereoCamera,
        config: &RenderConfig,
        row_notifier: Option<&RowNotifier<'_>>,
        stats: &mut Statistics,
    ) -> RaytraceResult<Image> {
        for camera in stereo.cameras_mut() {
            self.render_with(camera, config, row_notifier, stats);
        }
        stereo.merge_images()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects.len())
            .field("lights", &self.lights.len())
            .field("reflection_threshold", &self.reflection_threshold)
            .field("culling", &self.culling)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::AAA_MASK_ENABLED;
    use crate::lights::Speck;
    use crate::mediums::{ambient, refractive_index, roughness, smoothness, Plain, Transparent};
    use crate::objects::{Plane, Sphere};
    use crate::stereo::StereoLayout;
    use glint_math::DVec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white(ambient: f64, smoothness: f64) -> Arc<dyn Medium> {
        Arc::new(Plain::new(colors::WHITE, ambient, smoothness, roughness::LOOSE))
    }

    fn lit_sphere() -> Scene {
        let mut scene = Scene::new();
        let mut sphere = Sphere::new(DVec3::ZERO, 1.0).unwrap();
        sphere.set_medium(white(ambient::NONE, smoothness::NONE));
        scene.add_object(Box::new(sphere));
        let speck = Speck::new(DVec3::new(0.0, 0.0, 10.0), colors::WHITE, 100.0).unwrap();
        scene.add_light(Box::new(speck));
        scene
    }

    #[test]
    fn test_lit_sphere_is_brighter_than_background() {
        let scene = lit_sphere();
        let mut rng = StdRng::seed_from_u64(42);
        let mut stats = Statistics::new();

        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z);
        let lit = scene.trace(&ray, scene.media(), 2, 1.0, &mut rng, &mut stats);
        let miss = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::Z);
        let background = scene.trace(&miss, scene.media(), 2, 1.0, &mut rng, &mut stats);

        assert_eq!(background, colors::BLACK);
        assert!(lit.x > 0.5 && lit.y > 0.5 && lit.z > 0.5, "{:?}", lit);
        assert_eq!(stats.traced_rays, 2);
        assert_eq!(stats.shadow_rays, 1);
        assert_eq!(stats.color_sampled_rays, 1);
        assert_eq!(stats.point_in_shadow, 0);
    }

    #[test]
    fn test_shadowed_point_gets_only_ambient() {
        let mut scene = Scene::new();
        let mut floor = Plane::new(DVec3::ZERO);
        floor.set_medium(white(ambient::DIM, smoothness::NONE));
        scene.add_object(Box::new(floor));
        let blocker = Sphere::new(DVec3::new(0.0, 0.0, 2.0), 1.0).unwrap();
        scene.add_object(Box::new(blocker));
        let speck = Speck::new(DVec3::new(0.0, 0.0, 10.0), colors::WHITE, 100.0).unwrap();
        scene.add_light(Box::new(speck));

        let mut rng = StdRng::seed_from_u64(42);
        let mut stats = Statistics::new();
        // passes beside the blocker and lands on the origin
        let ray = Ray::new(DVec3::new(0.0, -5.0, 5.0), DVec3::new(0.0, 1.0, -1.0));
        let shaded = scene.trace(&ray, scene.media(), 0, 1.0, &mut rng, &mut stats);
        assert!((shaded - DVec3::splat(ambient::DIM)).length() < 1e-9, "{:?}", shaded);
        assert_eq!(stats.point_in_shadow, 1);
        assert_eq!(stats.color_sampled_rays, 0);

        // a lit spot on the same floor is brighter than the ambient level
        let ray = Ray::new(DVec3::new(5.0, -5.0, 5.0), DVec3::new(0.0, 1.0, -1.0));
        let lit = scene.trace(&ray, scene.media(), 0, 1.0, &mut rng, &mut stats);
        assert!(lit.x > ambient::DIM);
    }

    #[test]
    fn test_bounding_box_culling_skips_missed_objects() {
        let mut scene = lit_sphere();
        let ray = Ray::new(DVec3::new(10.0, 10.0, 10.0), DVec3::X);

        let mut stats = Statistics::new();
        assert!(scene.nearest_hit(&ray, &mut stats).is_none());
        assert_eq!(stats.intersections, 1);
        assert_eq!(stats.culled_objects, 0);

        scene.set_culling(Culling::BoundingBox);
        let mut stats = Statistics::new();
        assert!(scene.nearest_hit(&ray, &mut stats).is_none());
        assert_eq!(stats.intersections, 0);
        assert_eq!(stats.culled_objects, 1);

        // a ray toward the sphere still reaches it
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z);
        assert!(scene.nearest_hit(&ray, &mut stats).is_some());
    }

    #[test]
    fn test_reflection_threshold_saves_traces() {
        let mut scene = lit_sphere();
        let mut mirror = Sphere::new(DVec3::ZERO, 1.0).unwrap();
        mirror.set_medium(white(ambient::NONE, smoothness::MIRROR));
        scene.clear();
        scene.add_object(Box::new(mirror));
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(42);

        let mut stats = Statistics::new();
        scene.trace(&ray, scene.media(), 3, 1.0, &mut rng, &mut stats);
        assert_eq!(stats.bounced_rays, 1);
        assert_eq!(stats.saved_ray_traces, 0);

        scene.set_reflection_threshold(2.0);
        let mut stats = Statistics::new();
        scene.trace(&ray, scene.media(), 3, 1.0, &mut rng, &mut stats);
        assert_eq!(stats.bounced_rays, 0);
        assert_eq!(stats.saved_ray_traces, 3);
    }

    #[test]
    fn test_glass_sphere_transmits_through_both_walls() {
        let mut scene = Scene::new();
        let mut glass = Sphere::new(DVec3::ZERO, 1.0).unwrap();
        glass.set_medium(Arc::new(Transparent::new(
            refractive_index::GLASS,
            0.0,
            colors::WHITE,
        )));
        scene.add_object(Box::new(glass));
        scene.set_background(Arc::new(|_: &Ray| colors::WHITE));

        let mut rng = StdRng::seed_from_u64(42);
        let mut stats = Statistics::new();
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z);
        let seen = scene.trace(&ray, scene.media(), 2, 1.0, &mut rng, &mut stats);
        assert_eq!(stats.transmitted_rays, 2);
        // most of the white background makes it through
        assert!(seen.x > 0.5, "{:?}", seen);
    }

    #[test]
    fn test_render_adaptive_pass() {
        let mut scene = lit_sphere();
        let front = Speck::new(DVec3::new(-10.0, 0.0, 0.0), colors::WHITE, 100.0).unwrap();
        scene.add_light(Box::new(front));
        let mut camera = Camera::new(4, 4, 20.0).unwrap();
        // the image plane sits at the look-at point, in front of the sphere
        camera.move_to(DVec3::new(-10.0, 0.0, 0.0), DVec3::new(-5.0, 0.0, 0.0)).unwrap();
        let mut stats = Statistics::new();
        scene.render(&mut camera, 4, 1, None, AAA_MASK_ENABLED, &mut stats);

        // everything is redone at full samples when the mask is enabled
        assert_eq!(stats.cast_rays_from_camera, 16 + 16 * 4);
        let capture = camera.capture();
        assert_eq!(capture.at(0, 0), crate::image::Rgb8::default());
        assert!(capture.at(2, 2).r > capture.at(0, 0).r);
    }

    #[test]
    fn test_render_stereo_pair() {
        let mut scene = lit_sphere();
        let front = Speck::new(DVec3::new(-10.0, 0.0, 0.0), colors::WHITE, 100.0).unwrap();
        scene.add_light(Box::new(front));
        let mut stereo = StereoCamera::new(4, 4, 20.0, 0.2, StereoLayout::LeftRight).unwrap();
        stereo.move_to(DVec3::new(-10.0, 0.0, 0.0), DVec3::new(-5.0, 0.0, 0.0)).unwrap();
        let config = RenderConfig::new()
            .with_resolution(4, 4)
            .with_quality(1, 1)
            .with_mask_threshold(AAA_MASK_DISABLED);

        let mut stats = Statistics::new();
        let merged = scene.render_stereo(&mut stereo, &config, None, &mut stats).unwrap();
        assert_eq!((merged.height(), merged.width()), (4, 8));
        assert!(stats.cast_rays_from_camera >= 32);
        // the sphere shows up in the middle of both halves
        for x in [2, 6] {
            assert!(merged.at(2, x).r > merged.at(0, x - 2).r);
        }
    }

    #[test]
    fn test_gradient_background() {
        let sky = gradient(colors::BLACK, colors::WHITE);
        assert_eq!(sky(&Ray::new(DVec3::ZERO, DVec3::Z)), colors::WHITE);
        assert_eq!(sky(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)), colors::BLACK);
        let horizon = sky(&Ray::new(DVec3::ZERO, DVec3::X));
        assert!(horizon.x > 0.0 && horizon.x < 1.0);
        assert!((horizon.x - horizon.z).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_hit_keeps_close_surfaces() {
        let mut scene = Scene::new();
        scene.add_object(Box::new(Sphere::new(DVec3::ZERO, 1.0).unwrap()));
        let mut stats = Statistics::new();

        // half a thousandth above the top of the sphere
        let ray = Ray::new(DVec3::new(0.0, 0.0, 1.0005), DVec3::NEG_Z);
        let (hit, distance) = scene.nearest_hit(&ray, &mut stats).unwrap();
        assert!((hit.t - 0.0005).abs() < 1e-9);
        assert!((distance - 0.0005).abs() < 1e-9);
        assert!((hit.point - DVec3::Z).length() < 1e-9);

        // leaving the surface does not hit the point the ray starts on
        let ray = Ray::new(DVec3::Z, DVec3::Z);
        assert!(scene.nearest_hit(&ray, &mut stats).is_none());
    }
}
