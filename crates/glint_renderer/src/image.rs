//! RGB8 capture buffer and the per-pixel generation driver.
//!
//! Rows are generated in parallel with rayon. Each row owns a seeded RNG and
//! its own [`Statistics`], so renders are repeatable and the counters are
//! merged without sharing state.

use bytemuck::{Pod, Zeroable};
use glint_math::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::color::{self, Color};
use crate::statistics::Statistics;
use crate::{RaytraceError, RaytraceResult};

/// Mask threshold which never re-renders a pixel after the first pass.
pub const AAA_MASK_DISABLED: u8 = 255;

/// Mask threshold which re-renders every pixel.
pub const AAA_MASK_ENABLED: u8 = 0;

/// Called with the row index once a row is done (`true`) or when a row is
/// about to be redone (`false`).
pub type RowNotifier<'a> = dyn Fn(usize, bool) + Send + Sync + 'a;

/// One 8-bit RGB pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A height x width grid of pixels with an adaptive anti-aliasing mask.
#[derive(Debug, Clone)]
pub struct Image {
    height: usize,
    width: usize,
    pixels: Vec<Rgb8>,
    mask: Vec<u8>,
    seed: u64,
}

impl Image {
    /// Both dimensions must be even. The mask starts fully set so that the
    /// first pass renders every pixel.
    pub fn new(height: usize, width: usize) -> RaytraceResult<Self> {
        if height % 2 == 1 || width % 2 == 1 {
            return Err(RaytraceError::OddImageDimensions { height, width });
        }
        Ok(Self {
            height,
            width,
            pixels: vec![Rgb8::default(); height * width],
            mask: vec![AAA_MASK_DISABLED; height * width],
            seed: 0,
        })
    }

    /// Base seed for the per-row jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn at(&self, y: usize, x: usize) -> Rgb8 {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, y: usize, x: usize, pixel: Rgb8) {
        self.pixels[y * self.width + x] = pixel;
    }

    /// The pixel under a raster point, flooring the coordinates.
    pub fn at_point(&self, point: DVec2) -> Rgb8 {
        let x = (point.x.floor().max(0.0) as usize).min(self.width.saturating_sub(1));
        let y = (point.y.floor().max(0.0) as usize).min(self.height.saturating_sub(1));
        self.at(y, x)
    }

    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Packed `RGBRGB...` bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    pub fn mask_at(&self, y: usize, x: usize) -> u8 {
        self.mask[y * self.width + x]
    }

    pub fn fill_mask(&mut self, value: u8) {
        self.mask.fill(value);
    }

    /// Computes every pixel whose mask value is at least `mask_threshold`
    /// from `samples` calls to `subsampler`, blended together.
    ///
    /// The first sample is at the pixel center and the rest are jittered
    /// within the pixel. The subsampler receives raster coordinates, the
    /// row's RNG and the row's counters.
    pub fn generate_each<F>(
        &mut self,
        subsampler: F,
        samples: usize,
        row_notifier: Option<&RowNotifier<'_>>,
        mask_threshold: u8,
    ) -> Statistics
    where
        F: Fn(DVec2, &mut dyn RngCore, &mut Statistics) -> Color + Sync,
    {
        let width = self.width;
        if width == 0 {
            return Statistics::new();
        }
        let samples = samples.max(1);
        let seed = self.seed;
        self.pixels
            .par_chunks_mut(width)
            .zip(self.mask.par_chunks(width))
            .enumerate()
            .map(|(y, (row, mask_row))| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(y as u64));
                let mut statistics = Statistics::new();
                let mut colors = Vec::with_capacity(samples);
                for (x, pixel) in row.iter_mut().enumerate() {
                    if mask_row[x] < mask_threshold {
                        continue;
                    }
                    colors.clear();
                    for s in 0..samples {
                        let (dx, dy) = if s == 0 {
                            (0.0, 0.0)
                        } else {
                            (rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5))
                        };
                        let point = DVec2::new(x as f64 + 0.5 + dx, y as f64 + 0.5 + dy);
                        colors.push(subsampler(point, &mut rng, &mut statistics));
                    }
                    *pixel = color::to_rgb8(color::blend_samples(&colors));
                }
                if let Some(notify) = row_notifier {
                    notify(y, true);
                }
                statistics
            })
            .reduce(Statistics::new, |mut total, row| {
                total += row;
                total
            })
    }

    /// Fills the mask with the Sobel edge magnitude of the pixel brightness,
    /// saturating at 255. Borders repeat the edge pixels.
    pub fn compute_mask(&mut self) {
        const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
        const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

        let brightness: Vec<i32> = self
            .pixels
            .iter()
            .map(|pixel| (color::luminance(color::from_rgb8(*pixel)) * 255.0).round() as i32)
            .collect();
        let (height, width) = (self.height as isize, self.width as isize);
        let sample = |y: isize, x: isize| {
            let y = y.clamp(0, height - 1) as usize;
            let x = x.clamp(0, width - 1) as usize;
            brightness[y * self.width + x]
        };

        let mut mask = vec![0u8; self.mask.len()];
        for y in 0..height {
            for x in 0..width {
                let (mut gx, mut gy) = (0, 0);
                for (j, (kx, ky)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                    for i in 0..3 {
                        let value = sample(y + j as isize - 1, x + i as isize - 1);
                        gx += kx[i] * value;
                        gy += ky[i] * value;
                    }
                }
                let magnitude = f64::from(gx * gx + gy * gy).sqrt();
                mask[y as usize * self.width + x as usize] = magnitude.min(255.0) as u8;
            }
        }
        self.mask = mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_image_rejects_odd_dimensions() {
        assert_eq!(
            Image::new(3, 4).unwrap_err(),
            RaytraceError::OddImageDimensions { height: 3, width: 4 }
        );
        assert!(Image::new(4, 5).is_err());
        assert!(Image::new(4, 6).is_ok());
    }

    #[test]
    fn test_rgb8_bytes() {
        let mut image = Image::new(2, 2).unwrap();
        image.set(0, 1, Rgb8 { r: 1, g: 2, b: 3 });
        assert_eq!(image.as_bytes().len(), 12);
        assert_eq!(&image.as_bytes()[3..6], &[1, 2, 3]);
        assert_eq!(image.at_point(DVec2::new(1.7, 0.2)), Rgb8 { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_generate_each_samples_every_pixel() {
        let mut image = Image::new(4, 6).unwrap();
        let rows = AtomicUsize::new(0);
        let notifier: &RowNotifier<'_> = &|_row: usize, done: bool| {
            if done {
                rows.fetch_add(1, Ordering::SeqCst);
            }
        };
        let stats = image.generate_each(
            |point, _rng, stats| {
                stats.cast_rays_from_camera += 1;
                assert!(point.x >= 0.0 && point.x < 6.0);
                assert!(point.y >= 0.0 && point.y < 4.0);
                colors::WHITE
            },
            3,
            Some(notifier),
            AAA_MASK_DISABLED,
        );
        assert_eq!(stats.cast_rays_from_camera, 4 * 6 * 3);
        assert_eq!(rows.load(Ordering::SeqCst), 4);
        assert!(image.pixels().iter().all(|p| *p == Rgb8 { r: 255, g: 255, b: 255 }));
    }

    #[test]
    fn test_first_sample_is_centered() {
        let mut image = Image::new(2, 2).unwrap();
        image.generate_each(
            |point, _rng, _stats| {
                assert_eq!(point.fract(), DVec2::splat(0.5));
                colors::BLACK
            },
            1,
            None,
            AAA_MASK_DISABLED,
        );
    }

    #[test]
    fn test_mask_skips_flat_regions() {
        let mut image = Image::new(4, 8).unwrap();
        // left half black, right half white
        image.generate_each(
            |point, _rng, _stats| if point.x < 4.0 { colors::BLACK } else { colors::WHITE },
            1,
            None,
            AAA_MASK_DISABLED,
        );
        image.compute_mask();
        assert_eq!(image.mask_at(1, 0), 0);
        assert_eq!(image.mask_at(1, 7), 0);
        assert_eq!(image.mask_at(1, 3), 255);
        assert_eq!(image.mask_at(1, 4), 255);

        // the second pass only touches the edge columns
        let stats = image.generate_each(
            |_point, _rng, stats| {
                stats.cast_rays_from_camera += 1;
                colors::GREY
            },
            2,
            None,
            128,
        );
        assert_eq!(stats.cast_rays_from_camera, 4 * 2 * 2);
        assert_eq!(image.at(0, 0), Rgb8::default());
        assert_ne!(image.at(0, 3), Rgb8::default());
    }

    #[test]
    fn test_jitter_is_repeatable() {
        let render = || {
            let mut image = Image::new(2, 2).unwrap().with_seed(7);
            image.generate_each(
                |point, _rng, _stats| Color::new(point.x.fract(), point.y.fract(), 0.0),
                4,
                None,
                AAA_MASK_DISABLED,
            );
            image.as_bytes().to_vec()
        };
        assert_eq!(render(), render());
    }
}
