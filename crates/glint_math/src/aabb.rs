use crate::{Interval, Ray, Vec3};

/// Axis-aligned box defined by one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::ordered(a.x, b.x),
            y: Interval::ordered(a.y, b.y),
            z: Interval::ordered(a.z, b.z),
        }
    }

    /// Create a cube of the given edge length centered on `center`.
    pub fn cube(center: Vec3, edge: f64) -> Self {
        let half = Vec3::splat(edge / 2.0);
        Self::from_points(center - half, center + half)
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// Ray parameters for which the ray is between the two faces of one slab.
    ///
    /// A ray parallel to the slab is inside it everywhere when its origin
    /// lies between the faces and nowhere otherwise.
    fn slab(&self, ray: &Ray, axis: usize) -> Option<Interval> {
        let bounds = self.axis_interval(axis);
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];

        if dir == 0.0 {
            return bounds.contains(origin).then_some(Interval::UNIVERSE);
        }

        Some(Interval::ordered(
            (bounds.min - origin) / dir,
            (bounds.max - origin) / dir,
        ))
    }

    /// Slab test. Returns the ray parameter where the ray enters the box.
    ///
    /// The result can be negative when the origin is inside or past the box;
    /// callers filter by their own minimum distance.
    pub fn entry_distance(&self, ray: &Ray) -> Option<f64> {
        let mut span = Interval::UNIVERSE;
        for axis in 0..3 {
            span = span.intersect(&self.slab(ray, axis)?);
            if span.is_empty() {
                return None;
            }
        }
        span.min.is_finite().then_some(span.min)
    }

    /// Outward unit normal of the face nearest to `point`.
    pub fn face_normal(&self, point: Vec3) -> Vec3 {
        let center = self.center();
        let half = (self.max() - self.min()) * 0.5;

        let mut best_axis = 0;
        let mut best_offset = 0.0_f64;
        for axis in 0..3 {
            let offset = (point[axis] - center[axis]) / half[axis];
            if offset.abs() > best_offset.abs() {
                best_axis = axis;
                best_offset = offset;
            }
        }

        let mut normal = Vec3::ZERO;
        normal[best_axis] = if best_offset < 0.0 { -1.0 } else { 1.0 };
        normal
    }
}
