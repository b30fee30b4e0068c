//! Scene model for Glint.
//!
//! A [`Scene`] is assembled through [`SceneBuilder`], which validates every
//! invariant before handing out the finished scene. Nothing in a built scene
//! changes while it is rendered.

use glint_math::{Aabb, Color, Vec3};

use crate::error::{check_finite, check_positive, check_range, SceneError, SceneResult};

fn check_vector(what: &'static str, v: Vec3) -> SceneResult<Vec3> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SceneError::NonFinite(what))
    }
}

fn check_color(what: &'static str, color: Color) -> SceneResult<Color> {
    for channel in color.to_array() {
        check_range(what, channel, 0.0, 1.0)?;
    }
    Ok(color)
}

fn check_material(what: &'static str, index: usize, count: usize) -> SceneResult<usize> {
    if index < count {
        Ok(index)
    } else {
        Err(SceneError::InvalidMaterialIndex { what, index, count })
    }
}

/// Pinhole camera looking through a rectangular screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,

    /// Distance from the camera position to the screen center
    pub screen_distance: f64,

    /// Screen extent in world units
    pub screen_width: f64,
    pub screen_height: f64,
}

impl Camera {
    pub fn new(
        position: Vec3,
        look_at: Vec3,
        up: Vec3,
        screen_distance: f64,
        screen_width: f64,
        screen_height: f64,
    ) -> Self {
        Self {
            position,
            look_at,
            up,
            screen_distance,
            screen_width,
            screen_height,
        }
    }

    /// Unit viewing direction. Zero if the camera sits on its look-at point.
    pub fn towards(&self) -> Vec3 {
        (self.look_at - self.position).normalize_or_zero()
    }

    pub fn validate(&self) -> SceneResult<()> {
        check_vector("camera position", self.position)?;
        check_vector("camera look-at point", self.look_at)?;
        check_vector("camera up vector", self.up)?;

        let towards = self.towards();
        if towards == Vec3::ZERO {
            return Err(SceneError::DegenerateCamera(
                "camera position equals the look-at point",
            ));
        }
        if self.up == Vec3::ZERO {
            return Err(SceneError::ZeroVector("camera up vector"));
        }
        if towards.cross(self.up.normalize()).length_squared() < 1e-18 {
            return Err(SceneError::DegenerateCamera(
                "up vector is parallel to the viewing direction",
            ));
        }

        check_positive("screen distance", self.screen_distance)?;
        check_positive("screen width", self.screen_width)?;
        check_positive("screen height", self.screen_height)?;
        Ok(())
    }
}

/// Global render settings carried by the scene description.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub background: Color,

    /// Shadow rays per axis; each light is sampled on an N x N grid
    pub shadow_rays: u32,

    /// Number of nested reflection bounces before falling back to the background
    pub max_recursion: u32,
}

impl Settings {
    pub fn new(background: Color, shadow_rays: u32, max_recursion: u32) -> Self {
        Self {
            background,
            shadow_rays,
            max_recursion,
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        check_color("background color", self.background)?;
        if self.shadow_rays == 0 {
            return Err(SceneError::NonPositive {
                what: "shadow ray count",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Color::ZERO, 1, 1)
    }
}

/// Phong material with a flat transparency blend.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Diffuse color (RGB, 0-1)
    pub diffuse: Color,

    /// Specular highlight color (RGB, 0-1)
    pub specular: Color,

    /// Mirror reflection color (RGB, 0-1)
    pub reflection: Color,

    /// Phong specularity exponent
    pub phong: f64,

    /// Background blend factor (0=opaque, 1=fully transparent)
    pub transparency: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::splat(0.5), // Grey default
            specular: Color::ZERO,
            reflection: Color::ZERO,
            phong: 1.0,
            transparency: 0.0,
        }
    }
}

impl Material {
    pub fn new(
        diffuse: Color,
        specular: Color,
        reflection: Color,
        phong: f64,
        transparency: f64,
    ) -> Self {
        Self {
            diffuse,
            specular,
            reflection,
            phong,
            transparency,
        }
    }

    /// A matte opaque material with just a diffuse color.
    pub fn matte(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    /// Check if this material reflects anything.
    pub fn is_reflective(&self) -> bool {
        self.reflection != Color::ZERO
    }

    pub fn validate(&self) -> SceneResult<()> {
        check_color("diffuse color", self.diffuse)?;
        check_color("specular color", self.specular)?;
        check_color("reflection color", self.reflection)?;
        check_range("phong exponent", self.phong, 0.0, f64::INFINITY)?;
        check_range("transparency", self.transparency, 0.0, 1.0)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub material: usize,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64, material: usize) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    fn validate(&self, material_count: usize) -> SceneResult<()> {
        check_vector("sphere center", self.center)?;
        check_positive("sphere radius", self.radius)?;
        check_material("sphere", self.material, material_count)?;
        Ok(())
    }
}

/// Infinite plane `normal . P = offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    pub offset: f64,
    pub material: usize,
}

impl Plane {
    /// Create a plane. The normal is rescaled to unit length together with
    /// the offset, so the described plane stays the same.
    pub fn new(normal: Vec3, offset: f64, material: usize) -> Self {
        let length = normal.length();
        let (normal, offset) = if length > 0.0 && length.is_finite() {
            (normal / length, offset / length)
        } else {
            (normal, offset)
        };
        Self {
            normal,
            offset,
            material,
        }
    }

    fn validate(&self, material_count: usize) -> SceneResult<()> {
        check_vector("plane normal", self.normal)?;
        if self.normal == Vec3::ZERO {
            return Err(SceneError::ZeroVector("plane normal"));
        }
        check_finite("plane offset", self.offset)?;
        check_material("plane", self.material, material_count)?;
        Ok(())
    }
}

/// Axis-aligned cube.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    pub center: Vec3,
    pub edge: f64,
    pub material: usize,
}

impl Cube {
    pub fn new(center: Vec3, edge: f64, material: usize) -> Self {
        Self {
            center,
            edge,
            material,
        }
    }

    /// Extents `center +- edge / 2` on every axis.
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.center, self.edge)
    }

    fn validate(&self, material_count: usize) -> SceneResult<()> {
        check_vector("box center", self.center)?;
        check_positive("box edge length", self.edge)?;
        check_material("box", self.material, material_count)?;
        Ok(())
    }
}

/// Square area light.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,

    /// Scale applied to the specular highlight
    pub specular_intensity: f64,

    /// How strongly occlusion darkens the light (0=ignore shadows, 1=full)
    pub shadow_intensity: f64,

    /// Half the side length of the sampled light patch
    pub radius: f64,
}

impl Light {
    pub fn new(
        position: Vec3,
        color: Color,
        specular_intensity: f64,
        shadow_intensity: f64,
        radius: f64,
    ) -> Self {
        Self {
            position,
            color,
            specular_intensity,
            shadow_intensity,
            radius,
        }
    }

    /// Light intensity at a point given the fraction of unoccluded shadow rays.
    pub fn intensity(&self, unoccluded_fraction: f64) -> f64 {
        (1.0 - self.shadow_intensity) + self.shadow_intensity * unoccluded_fraction
    }

    fn validate(&self) -> SceneResult<()> {
        check_vector("light position", self.position)?;
        check_color("light color", self.color)?;
        check_range("light specular intensity", self.specular_intensity, 0.0, f64::INFINITY)?;
        check_range("light shadow intensity", self.shadow_intensity, 0.0, 1.0)?;
        check_range("light radius", self.radius, 0.0, f64::INFINITY)?;
        Ok(())
    }
}

/// A validated, read-only scene.
#[derive(Clone, Debug)]
pub struct Scene {
    camera: Camera,
    settings: Settings,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    cubes: Vec<Cube>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Get a material by index.
    ///
    /// Every primitive's index was checked when the scene was built.
    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Total number of primitives of all kinds.
    pub fn surface_count(&self) -> usize {
        self.spheres.len() + self.planes.len() + self.cubes.len()
    }
}

/// Collects scene entities and validates them into a [`Scene`].
#[derive(Clone, Debug)]
pub struct SceneBuilder {
    camera: Camera,
    settings: Settings,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    cubes: Vec<Cube>,
    lights: Vec<Light>,
}

impl SceneBuilder {
    pub fn new(camera: Camera, settings: Settings) -> Self {
        Self {
            camera,
            settings,
            materials: Vec::new(),
            spheres: Vec::new(),
            planes: Vec::new(),
            cubes: Vec::new(),
            lights: Vec::new(),
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_sphere(&mut self, sphere: Sphere) -> &mut Self {
        self.spheres.push(sphere);
        self
    }

    pub fn add_plane(&mut self, plane: Plane) -> &mut Self {
        self.planes.push(plane);
        self
    }

    pub fn add_cube(&mut self, cube: Cube) -> &mut Self {
        self.cubes.push(cube);
        self
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.lights.push(light);
        self
    }

    /// Validate everything and produce the scene.
    pub fn build(self) -> SceneResult<Scene> {
        self.camera.validate()?;
        self.settings.validate()?;

        for material in &self.materials {
            material.validate()?;
        }
        let count = self.materials.len();
        for sphere in &self.spheres {
            sphere.validate(count)?;
        }
        for plane in &self.planes {
            plane.validate(count)?;
        }
        for cube in &self.cubes {
            cube.validate(count)?;
        }
        for light in &self.lights {
            light.validate()?;
        }

        log::debug!(
            "Built scene: {} spheres, {} planes, {} boxes, {} lights, {} materials",
            self.spheres.len(),
            self.planes.len(),
            self.cubes.len(),
            self.lights.len(),
            self.materials.len()
        );

        Ok(Scene {
            camera: self.camera,
            settings: self.settings,
            materials: self.materials,
            spheres: self.spheres,
            planes: self.planes,
            cubes: self.cubes,
            lights: self.lights,
        })
    }
}
