//! Small scenes shared by the renderer tests.

use glint_core::{Camera, SceneBuilder, Settings};
use glint_math::{Color, Vec3};

/// Camera at the origin looking down +Z with a 2x2 screen at distance 1.
pub(crate) fn camera() -> Camera {
    Camera::new(Vec3::ZERO, Vec3::Z, Vec3::Y, 1.0, 2.0, 2.0)
}

pub(crate) fn builder(background: Color, shadow_rays: u32, max_recursion: u32) -> SceneBuilder {
    SceneBuilder::new(camera(), Settings::new(background, shadow_rays, max_recursion))
}
