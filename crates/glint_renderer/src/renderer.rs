//! Frame driver and image buffer.
//!
//! Walks every pixel of the screen once, shades the primary ray and stores
//! the clipped color. Pixels are visited row by row on a single thread.

use std::path::Path;
use std::time::Instant;

use glint_core::Scene;
use glint_math::{clip, Color};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::{RenderError, RenderResult};
use crate::intersect::{Intersector, DEFAULT_EPSILON};
use crate::screen::Screen;
use crate::shader::Shader;

/// Default tolerance when checking whether a shadow ray reached its target.
pub const DEFAULT_SHADOW_BIAS: f64 = 1e-6;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output resolution in pixels
    pub width: u32,
    pub height: u32,
    /// Minimum accepted hit distance
    pub epsilon: f64,
    /// Slack allowed when a shadow ray stops just short of its target
    pub shadow_bias: f64,
    /// Seed for the soft shadow jitter; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            epsilon: DEFAULT_EPSILON,
            shadow_bias: DEFAULT_SHADOW_BIAS,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Set output resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_shadow_bias(mut self, shadow_bias: f64) -> Self {
        self.shadow_bias = shadow_bias;
        self
    }

    /// Fix the random seed for reproducible soft shadows.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Height over width, used to derive the screen height from its width.
    pub fn aspect_ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.shadow_bias.is_finite() && self.shadow_bias >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "shadow bias must be non-negative, got {}",
                self.shadow_bias
            )));
        }
        Ok(())
    }
}

/// Convert a color to 8-bit RGB, clipping each channel to [0, 1].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = clip(color) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Row-major offset of pixel (x, y), in `usize` arithmetic.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Rendered pixels, row-major: index `j * width + i` holds column `i`, row `j`.
/// Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[pixel_index(self.width, x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[pixel_index(self.width, x, y)] = color;
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        })
    }

    /// Encode and write the image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render a single pixel: shade the primary ray and clip the result.
pub fn render_pixel(
    shader: &Shader,
    screen: &Screen,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let ray = screen.pixel_ray(shader.scene().camera(), x, y);
    clip(shader.shade(&ray, 0, rng))
}

/// Render the scene, seeding the shadow jitter from `config.seed`.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    render_with_rng(scene, config, &mut rng)
}

/// Render the scene with an explicit random source.
pub fn render_with_rng(
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> RenderResult<ImageBuffer> {
    config.validate()?;
    let screen = Screen::new(scene.camera(), config.width, config.height)?;
    let shader = Shader::new(scene, Intersector::new(config.epsilon), config.shadow_bias);

    log::info!(
        "Rendering {}x{} ({} surfaces, {} lights, {}x{} shadow rays, depth {})",
        config.width,
        config.height,
        scene.surface_count(),
        scene.lights().len(),
        scene.settings().shadow_rays,
        scene.settings().shadow_rays,
        scene.settings().max_recursion
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(config.width, config.height);
    for y in 0..config.height {
        for x in 0..config.width {
            let color = render_pixel(&shader, &screen, x, y, rng);
            image.set(x, y, color);
        }
        log::trace!("Finished row {}/{}", y + 1, config.height);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glint_core::{Cube, Light, Material, Plane, Sphere};
    use glint_math::Vec3;

    #[test]
    fn test_background_only_render() {
        // A single plane whose material shows only the background, no lights
        let background = Color::new(0.25, 0.5, 0.75);
        let mut builder = fixtures::builder(background, 2, 3);
        let clear = builder.add_material(Material::new(
            Color::new(0.9, 0.1, 0.3),
            Color::ONE,
            Color::ZERO,
            10.0,
            1.0,
        ));
        builder.add_plane(Plane::new(Vec3::Y, -1.0, clear));
        let scene = builder.build().unwrap();

        let config = RenderConfig::default().with_resolution(16, 12).with_seed(1);
        let image = render(&scene, &config).unwrap();

        assert_eq!(image.pixels.len(), 16 * 12);
        assert!(image.pixels.iter().all(|p| *p == background));
    }

    #[test]
    fn test_red_sphere_center_pixel() {
        let mut builder = fixtures::builder(Color::ZERO, 2, 2);
        let red = builder.add_material(Material::matte(Color::new(1.0, 0.0, 0.0)));
        builder
            .add_sphere(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0, red))
            .add_light(Light::new(Vec3::new(0.0, 5.0, 0.0), Color::ONE, 1.0, 0.0, 1.0));
        let scene = builder.build().unwrap();

        let image = render(&scene, &RenderConfig::default().with_resolution(5, 5)).unwrap();

        let center = image.get(2, 2);
        assert!(center.x > 0.0);
        assert_eq!(center.y, 0.0);
        assert_eq!(center.z, 0.0);
        // Corner rays miss the sphere entirely
        assert_eq!(image.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_seeded_renders_match() {
        let mut builder = fixtures::builder(Color::splat(0.1), 3, 3);
        let floor = builder.add_material(Material::new(
            Color::splat(0.8),
            Color::splat(0.2),
            Color::splat(0.3),
            20.0,
            0.0,
        ));
        let ball = builder.add_material(Material::new(
            Color::new(0.2, 0.6, 0.9),
            Color::ONE,
            Color::splat(0.5),
            50.0,
            0.1,
        ));
        builder
            .add_plane(Plane::new(Vec3::Y, -1.0, floor))
            .add_sphere(Sphere::new(Vec3::new(-0.8, 0.0, 5.0), 1.0, ball))
            .add_cube(Cube::new(Vec3::new(1.2, -0.5, 4.5), 1.0, ball))
            .add_light(Light::new(Vec3::new(2.0, 5.0, 1.0), Color::ONE, 0.8, 0.9, 0.5));
        let scene = builder.build().unwrap();

        let config = RenderConfig::default().with_resolution(12, 8).with_seed(42);
        let a = render(&scene, &config).unwrap();
        let b = render(&scene, &config).unwrap();
        assert_eq!(a, b);
        assert!(a
            .pixels
            .iter()
            .all(|p| p.is_finite() && p.min_element() >= 0.0 && p.max_element() <= 1.0));
    }

    #[test]
    fn test_invalid_config() {
        let scene = fixtures::builder(Color::ZERO, 1, 1).build().unwrap();

        let zero = RenderConfig::default().with_resolution(0, 10);
        assert!(matches!(
            render(&scene, &zero),
            Err(RenderError::InvalidResolution { .. })
        ));

        let negative = RenderConfig::default().with_epsilon(-1.0);
        assert!(matches!(
            render(&scene, &negative),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 128, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 2.0, 0.2)), [0, 255, 51]);
    }

    #[test]
    fn test_image_buffer_layout() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.get(2, 1), Color::ONE);

        let rgb = image.to_image();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(2, 1).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_pixel_index_large_resolution() {
        // 70000 * 70000 does not fit in a u32
        let index = pixel_index(70_000, 69_999, 69_999);
        assert_eq!(index, 70_000usize * 70_000 - 1);
        assert_eq!(pixel_index(3, 2, 1), 5);
    }

    #[test]
    fn test_save_png() {
        let mut image = ImageBuffer::new(4, 4);
        image.set(1, 2, Color::new(1.0, 0.0, 0.0));

        let path = std::env::temp_dir().join(format!("glint_test_{}.png", std::process::id()));
        image.save(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(loaded.get_pixel(1, 2).0, [255, 0, 0]);
        std::fs::remove_file(&path).unwrap();
    }
}
