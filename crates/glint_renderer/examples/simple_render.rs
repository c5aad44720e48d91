//! Simple ray tracer example.
//!
//! Renders a handful of surfaces over a checkered floor and saves the
//! capture as a PNG. Pass a JSON render config path to override the
//! defaults, and `--stereo` to save a side-by-side pair instead.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glint_renderer::lights::{Beam, Bulb};
use glint_renderer::mediums::{
    ambient, earth_atmosphere, metals, plains, refractive_index, roughness, smoothness, Pattern,
    Patterned, Perlin, Plain, Transparent,
};
use glint_renderer::objects::{Cone, Cuboid, Overlap, OverlapKind, Plane, Polygon, Sphere, Torus};
use glint_renderer::{
    colors, scene, Culling, DVec3, Image, Object, RenderConfig, RowNotifier, Scene, Statistics,
    StereoCamera, StereoLayout,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stereo = std::env::args().any(|arg| arg == "--stereo");
    let config = match std::env::args().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading render config {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => RenderConfig::new()
            .with_resolution(640, 480)
            .with_quality(4, 4)
            .with_mask_threshold(32)
            .with_culling(Culling::BoundingBox),
    };

    let start = Instant::now();
    let scene = build_scene(&config)?;
    log::info!("Scene built in {:?}", start.elapsed());

    // the image plane sits at the look-at point, so keep it ahead of the scene
    let from = DVec3::new(-12.0, -16.0, 9.0);
    let at = DVec3::new(-9.0, -12.0, 7.0);

    let rows = config.height;
    let progress: &RowNotifier<'_> = &move |row: usize, done: bool| {
        if done && row % 64 == 0 {
            log::debug!("row {} of {} done", row, rows);
        }
    };

    let start = Instant::now();
    let mut stats = Statistics::new();
    let (capture, filename) = if stereo {
        let mut pair = StereoCamera::new(
            config.height,
            config.width,
            config.field_of_view,
            0.3,
            StereoLayout::LeftRight,
        )?;
        pair.move_to(from, at)?;
        let merged = scene.render_stereo(&mut pair, &config, Some(progress), &mut stats)?;
        (merged, "glint_stereo.png")
    } else {
        let mut camera = config.camera()?;
        camera.move_to(from, at)?;
        scene.render_with(&mut camera, &config, Some(progress), &mut stats);
        (camera.capture().clone(), "glint_demo.png")
    };
    log::info!("Rendered in {:?}", start.elapsed());
    log::info!("{}", serde_json::to_string(&stats)?);
    save(&capture, filename)
}

fn save(capture: &Image, filename: &str) -> Result<()> {
    image::RgbImage::from_raw(
        capture.width() as u32,
        capture.height() as u32,
        capture.as_bytes().to_vec(),
    )
    .context("capture size doesn't match its pixels")?
    .save(filename)?;
    log::info!("Saved to {}", filename);
    Ok(())
}

fn build_scene(config: &RenderConfig) -> Result<Scene> {
    let mut scene = Scene::from_config(config);
    scene.set_background(scene::gradient(colors::WHITE, colors::DARK_BLUE));
    scene.add_media(Arc::new(earth_atmosphere()));

    let mut floor = Plane::new(DVec3::ZERO);
    floor.set_medium(Arc::new(Patterned::new(
        Pattern::Checkerboard,
        vec![colors::WHITE, colors::DARK_GREY],
    )?));
    scene.add_object(Box::new(floor));

    let mut glass = Sphere::new(DVec3::new(0.0, 0.0, 1.5), 1.5)?;
    glass.set_medium(Arc::new(Transparent::new(
        refractive_index::GLASS,
        0.05,
        colors::CYAN,
    )));
    scene.add_object(Box::new(glass));

    let mut ring = Torus::new(DVec3::new(3.5, 2.0, 0.5), 1.5, 0.5)?;
    ring.set_medium(Arc::new(metals::gold()));
    scene.add_object(Box::new(ring));

    let mut block = Cuboid::new(DVec3::new(-3.5, 2.5, 1.0), 1.0, 1.0, 1.0)?;
    block.rotate_xyz(0.0, 0.0, 30f64.to_radians());
    block.set_medium(Arc::new(Plain::new(
        colors::RED,
        ambient::DIM,
        smoothness::SMALL,
        roughness::TIGHT,
    )));
    scene.add_object(Box::new(block));

    let mut cone = Cone::finite(DVec3::new(2.0, -3.0, 0.0), 1.0, 2.5)?;
    cone.set_medium(Arc::new(plains::glossy(colors::GREEN)));
    scene.add_object(Box::new(cone));

    // a ball with a cube bitten out of its top
    let ball = Sphere::new(DVec3::ZERO, 1.0)?;
    let bite = Cuboid::new(DVec3::new(0.6, -0.6, 0.6), 0.6, 0.6, 0.6)?;
    let mut carved = Overlap::new(
        DVec3::new(-1.0, -4.0, 1.0),
        Box::new(ball),
        Box::new(bite),
        OverlapKind::Subtractive,
    )?;
    carved.set_medium(Arc::new(Perlin::new(colors::BLUE, colors::WHITE, 4.0, 7)));
    scene.add_object(Box::new(carved));

    let mut tile = Polygon::regular(6, 1.2, DVec3::new(-5.0, -1.0, 0.01))?;
    tile.set_medium(Arc::new(metals::silver()));
    scene.add_object(Box::new(tile));

    scene.add_light(Box::new(Bulb::new(
        DVec3::new(-5.0, -5.0, 12.0),
        0.5,
        colors::WHITE,
        150.0,
        8,
    )?));
    scene.add_light(Box::new(Beam::new(
        DVec3::new(1.0, 1.0, -2.0),
        colors::WHITE,
        0.3,
    )?));
    Ok(scene)
}
