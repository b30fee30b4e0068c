//! Glint math types.
//!
//! Everything is double precision: the sphere and plane solvers compare
//! distances against a tolerance of `1e-9`, which single precision cannot
//! resolve.

// Re-export the double precision glam types under renderer-friendly names
pub use glam::{dvec3 as vec3, DVec3 as Vec3};

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// RGB color with channels nominally in [0, 1].
pub type Color = Vec3;

/// Mirror `v` about the plane with unit normal `n`.
///
/// Returns `v - 2 (v . n) n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Clamp every channel of a color to [0, 1].
#[inline]
pub fn clip(color: Color) -> Color {
    color.clamp(Color::ZERO, Color::ONE)
}
