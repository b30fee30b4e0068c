//! Soft shadows from square area lights.

use glint_core::{Light, Scene};
use glint_math::{Ray, Vec3};
use rand::RngCore;

use crate::gen_f64;
use crate::intersect::Intersector;

/// Fraction of the light's area that can see `point`, in [0, 1].
///
/// The light is a square of side `2 * radius` centered on its position and
/// facing `point`. It is split into an N x N grid (N = the scene's shadow ray
/// count) and one jittered sample per cell is traced toward `point`.
///
/// A sample is unoccluded when the nearest hit along its ray lands on `point`
/// itself. `shadow_bias` is the tolerance for that coincidence: the sample
/// counts as blocked only if the nearest hit is closer than `point` by more
/// than `shadow_bias`.
pub fn soft_shadow_fraction(
    scene: &Scene,
    intersector: &Intersector,
    light: &Light,
    point: Vec3,
    shadow_bias: f64,
    rng: &mut dyn RngCore,
) -> f64 {
    let axis = (point - light.position).normalize_or_zero();
    if axis == Vec3::ZERO {
        return 1.0;
    }

    let x_axis = axis.any_orthonormal_vector();
    let y_axis = axis.cross(x_axis);

    let n = scene.settings().shadow_rays.max(1);
    let cell = 2.0 * light.radius / n as f64;
    let corner = light.position - light.radius * x_axis - light.radius * y_axis;

    let mut unoccluded = 0u64;
    for i in 0..n {
        for j in 0..n {
            let u = (i as f64 + gen_f64(rng)) * cell;
            let v = (j as f64 + gen_f64(rng)) * cell;
            let sample = corner + u * x_axis + v * y_axis;
            if reaches(scene, intersector, sample, point, shadow_bias) {
                unoccluded += 1;
            }
        }
    }

    unoccluded as f64 / (n as u64 * n as u64) as f64
}

/// Whether a ray from `sample` arrives at `point` before hitting anything else.
fn reaches(scene: &Scene, intersector: &Intersector, sample: Vec3, point: Vec3, bias: f64) -> bool {
    let distance = (point - sample).length();
    if distance <= bias {
        return true;
    }

    let ray = Ray::between(sample, point);
    match intersector.nearest_hit(scene, &ray) {
        Some(hit) => hit.distance >= distance - bias,
        None => true,
    }
}
