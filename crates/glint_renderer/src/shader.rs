//! Recursive shading: Phong lighting, soft shadows and mirror reflection.

use std::ops::Add;

use glint_core::{Light, Material, Scene};
use glint_math::{clip, reflect, Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{Hit, Surface};
use crate::intersect::Intersector;
use crate::shadow::soft_shadow_fraction;

/// Light gathered at a point, before material tinting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Lighting {
    diffuse: Color,
    specular: Color,
    reflection: Color,
}

impl Add for Lighting {
    type Output = Lighting;

    fn add(self, rhs: Lighting) -> Lighting {
        Lighting {
            diffuse: self.diffuse + rhs.diffuse,
            specular: self.specular + rhs.specular,
            reflection: self.reflection + rhs.reflection,
        }
    }
}

/// Maps rays to colors for one scene.
pub struct Shader<'a> {
    scene: &'a Scene,
    intersector: Intersector,
    shadow_bias: f64,
}

impl<'a> Shader<'a> {
    pub fn new(scene: &'a Scene, intersector: Intersector, shadow_bias: f64) -> Self {
        Self {
            scene,
            intersector,
            shadow_bias,
        }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Color seen along `ray` at reflection depth `depth` (0 for camera rays).
    ///
    /// Rays at the maximum recursion depth, and rays that hit nothing, see
    /// the background color.
    pub fn shade(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let settings = self.scene.settings();
        if depth >= settings.max_recursion {
            return settings.background;
        }

        match self.intersector.nearest_hit(self.scene, ray) {
            Some(hit) => self.surface_color(&hit, ray, depth, rng),
            None => settings.background,
        }
    }

    /// Color of a hit surface as seen along `ray`.
    ///
    /// `background * t + (diffuse + specular) * (1 - t) + reflection`, where
    /// `t` is the material transparency and each term is clipped to [0, 1].
    ///
    /// Every light adds its own copy of the mirror reflection, so a surface
    /// in a scene without lights reflects nothing.
    pub fn surface_color(&self, hit: &Hit, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        let material = self.scene.material(hit.surface.material_index());
        let normal = hit.surface.normal_at(hit.point);
        let reflected = material
            .is_reflective()
            .then(|| Ray::new(hit.point, reflect(ray.direction, normal)));

        let lighting = self
            .scene
            .lights()
            .iter()
            .map(|light| {
                let mut lighting = self.light_contribution(light, material, hit.point, normal, rng);
                if let Some(reflected) = &reflected {
                    lighting.reflection = self.shade(reflected, depth + 1, rng);
                }
                lighting
            })
            .fold(Lighting::default(), Lighting::add);

        let diffuse = clip(lighting.diffuse * material.diffuse);
        let specular = clip(lighting.specular * material.specular);
        let reflection = clip(lighting.reflection * material.reflection);

        let t = material.transparency;
        self.scene.settings().background * t + (diffuse + specular) * (1.0 - t) + reflection
    }

    /// Diffuse and specular light from a single source.
    fn light_contribution(
        &self,
        light: &Light,
        material: &Material,
        point: Vec3,
        normal: Vec3,
        rng: &mut dyn RngCore,
    ) -> Lighting {
        let fraction = if light.shadow_intensity > 0.0 {
            soft_shadow_fraction(
                self.scene,
                &self.intersector,
                light,
                point,
                self.shadow_bias,
                rng,
            )
        } else {
            1.0
        };
        let intensity = light.color * light.intensity(fraction);

        let to_light = (light.position - point).normalize_or_zero();
        let diffuse = intensity * normal.dot(to_light).max(0.0);

        let r = reflect(-to_light, normal);
        let v = (self.scene.camera().position - point).normalize_or_zero();
        let highlight = r.dot(v).max(0.0).powf(material.phong);
        let specular = intensity * light.specular_intensity * highlight;

        Lighting {
            diffuse,
            specular,
            reflection: Color::ZERO,
        }
    }
}
