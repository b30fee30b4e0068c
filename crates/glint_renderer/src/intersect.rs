//! Brute-force intersection engine.

use glint_core::Scene;
use glint_math::Ray;

use crate::hittable::{surfaces, Hit, Surface, SurfaceRef};

/// Default minimum hit distance.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Finds ray hits against every primitive in a scene.
///
/// `epsilon` is the minimum accepted hit distance. It keeps rays leaving a
/// surface from hitting that same surface again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersector {
    epsilon: f64,
}

impl Intersector {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// The closest hit at distance `>= epsilon`, if any.
    ///
    /// Surfaces whose distances agree within `epsilon` resolve to the one
    /// enumerated first (spheres, planes, boxes, each in list order).
    pub fn nearest_hit<'a>(&self, scene: &'a Scene, ray: &Ray) -> Option<Hit<'a>> {
        let mut nearest: Option<(SurfaceRef<'a>, f64)> = None;

        for surface in surfaces(scene) {
            let Some(t) = surface.intersect(ray, self.epsilon) else {
                continue;
            };
            match nearest {
                Some((_, best)) if t >= best - self.epsilon => {}
                _ => nearest = Some((surface, t)),
            }
        }

        nearest.map(|(surface, distance)| Hit {
            surface,
            distance,
            point: ray.at(distance),
        })
    }

    /// Every hit along the ray, ascending by distance.
    ///
    /// Equal distances keep enumeration order.
    pub fn all_hits<'a>(&self, scene: &'a Scene, ray: &Ray) -> Vec<(SurfaceRef<'a>, f64)> {
        let mut hits: Vec<_> = surfaces(scene)
            .filter_map(|surface| {
                surface
                    .intersect(ray, self.epsilon)
                    .map(|t| (surface, t))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

impl Default for Intersector {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}
