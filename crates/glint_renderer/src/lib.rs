//! Glint Renderer - recursive ray tracing.
//!
//! Casts one ray per pixel through the camera screen and shades hits with
//! Phong diffuse/specular lighting, soft shadows from square area lights and
//! recursive mirror reflection. Intersection is brute force over every
//! primitive in the scene.

mod error;
mod hittable;
mod intersect;
mod renderer;
mod screen;
mod shader;
mod shadow;

#[cfg(test)]
mod fixtures;

pub use error::{RenderError, RenderResult};
pub use hittable::{surfaces, Hit, Surface, SurfaceRef};
pub use intersect::{Intersector, DEFAULT_EPSILON};
pub use renderer::{
    color_to_rgb, render, render_pixel, render_with_rng, ImageBuffer, RenderConfig,
    DEFAULT_SHADOW_BIAS,
};
pub use screen::Screen;
pub use shader::Shader;
pub use shadow::soft_shadow_fraction;

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Color, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}
