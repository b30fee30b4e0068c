//! Surface trait and per-primitive intersection formulas.

use glint_core::{Cube, Plane, Scene, Sphere};
use glint_math::{Ray, Vec3};

/// A primitive that rays can hit.
pub trait Surface {
    /// Distance along `ray` to the first usable hit.
    ///
    /// `ray.direction` must be unit length. Hits closer than `epsilon`
    /// (including hits behind the origin) are not usable.
    fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<f64>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Index into the scene's material list.
    fn material_index(&self) -> usize;
}

impl Surface for Sphere {
    fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<f64> {
        let l = self.center - ray.origin;
        let t_ca = l.dot(ray.direction);
        // Sphere is behind the ray
        if t_ca < 0.0 {
            return None;
        }

        let r_squared = self.radius * self.radius;
        let d_squared = l.length_squared() - t_ca * t_ca;
        if d_squared > r_squared {
            return None;
        }

        // Only the near root; an origin inside the sphere yields nothing usable
        let t = t_ca - (r_squared - d_squared).sqrt();
        (t >= epsilon).then_some(t)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn material_index(&self) -> usize {
        self.material
    }
}

impl Surface for Plane {
    fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<f64> {
        let denom = self.normal.dot(ray.direction);
        if denom == 0.0 {
            return None;
        }

        let t = (self.offset - self.normal.dot(ray.origin)) / denom;
        (t.is_finite() && t >= epsilon).then_some(t)
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn material_index(&self) -> usize {
        self.material
    }
}

impl Surface for Cube {
    fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<f64> {
        self.bounds().entry_distance(ray).filter(|t| *t >= epsilon)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.bounds().face_normal(point)
    }

    fn material_index(&self) -> usize {
        self.material
    }
}

/// Borrowed reference to any primitive in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceRef<'a> {
    Sphere(&'a Sphere),
    Plane(&'a Plane),
    Cube(&'a Cube),
}

impl Surface for SurfaceRef<'_> {
    fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<f64> {
        match self {
            SurfaceRef::Sphere(s) => s.intersect(ray, epsilon),
            SurfaceRef::Plane(p) => p.intersect(ray, epsilon),
            SurfaceRef::Cube(c) => c.intersect(ray, epsilon),
        }
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            SurfaceRef::Sphere(s) => s.normal_at(point),
            SurfaceRef::Plane(p) => p.normal_at(point),
            SurfaceRef::Cube(c) => c.normal_at(point),
        }
    }

    fn material_index(&self) -> usize {
        match self {
            SurfaceRef::Sphere(s) => s.material,
            SurfaceRef::Plane(p) => p.material,
            SurfaceRef::Cube(c) => c.material,
        }
    }
}

/// Every primitive of the scene: spheres, then planes, then boxes, each in
/// list order. Tie-breaking in the intersection engine relies on this order.
pub fn surfaces(scene: &Scene) -> impl Iterator<Item = SurfaceRef<'_>> {
    scene
        .spheres()
        .iter()
        .map(SurfaceRef::Sphere)
        .chain(scene.planes().iter().map(SurfaceRef::Plane))
        .chain(scene.cubes().iter().map(SurfaceRef::Cube))
}

/// Record of the nearest ray-surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub surface: SurfaceRef<'a>,
    /// Distance along the (unit) ray direction
    pub distance: f64,
    /// World-space intersection point
    pub point: Vec3,
}
