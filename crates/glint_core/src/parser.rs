//! Scene description parser.
//!
//! The format is line oriented. Blank lines and lines starting with `#` are
//! ignored; every other line is a keyword followed by whitespace separated
//! numbers:
//!
//! - `cam px py pz lx ly lz ux uy uz screen_dist screen_width`
//! - `set bg_r bg_g bg_b shadow_rays max_recursion`
//! - `mtl dr dg db sr sg sb rr rg rb phong transparency`
//! - `sph cx cy cz radius material`
//! - `pln nx ny nz offset material`
//! - `box cx cy cz edge material`
//! - `lgt px py pz r g b specular shadow radius`
//!
//! Material indices are 0-based and count `mtl` lines in file order. The
//! screen height is not in the file; it follows from the screen width and the
//! aspect ratio of the output image.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

use crate::error::SceneError;
use crate::scene::{Camera, Cube, Light, Material, Plane, Scene, SceneBuilder, Settings, Sphere};

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid number `{value}` at line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("Scene has no `{0}` line")]
    Missing(&'static str),

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// One non-empty, non-comment line split into keyword and values.
struct Fields<'a> {
    line: usize,
    keyword: &'a str,
    values: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn split(line: usize, text: &'a str) -> Option<Self> {
        let mut tokens = text.split_whitespace();
        let keyword = tokens.next()?;
        Some(Self {
            line,
            keyword,
            values: tokens.collect(),
        })
    }

    fn expect_len(&self, expected: usize) -> ParseResult<()> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ParseError::Parse {
                line: self.line,
                message: format!(
                    "`{}` expects {} values, found {}",
                    self.keyword,
                    expected,
                    self.values.len()
                ),
            })
        }
    }

    fn float(&self, i: usize) -> ParseResult<f64> {
        let value = self.values[i];
        value.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            value: value.to_string(),
        })
    }

    fn vec3(&self, i: usize) -> ParseResult<Vec3> {
        Ok(Vec3::new(self.float(i)?, self.float(i + 1)?, self.float(i + 2)?))
    }

    /// A non-negative whole number. `2` and `2.0` are both accepted.
    fn count(&self, i: usize) -> ParseResult<u32> {
        let value = self.float(i)?;
        if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
            Ok(value as u32)
        } else {
            Err(ParseError::Parse {
                line: self.line,
                message: format!("expected a non-negative integer, found {}", self.values[i]),
            })
        }
    }

    fn index(&self, i: usize) -> ParseResult<usize> {
        self.count(i).map(|v| v as usize)
    }
}

/// Line-by-line scene parser.
pub struct SceneParser {
    aspect_ratio: f64,
    camera: Option<Camera>,
    settings: Option<Settings>,
    materials: Vec<Material>,
    spheres: Vec<Sphere>,
    planes: Vec<Plane>,
    cubes: Vec<Cube>,
    lights: Vec<Light>,
}

impl SceneParser {
    /// Create a parser for an image with the given `height / width` ratio.
    pub fn new(aspect_ratio: f64) -> ParseResult<Self> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(ParseError::InvalidAspectRatio(aspect_ratio));
        }
        Ok(Self {
            aspect_ratio,
            camera: None,
            settings: None,
            materials: Vec::new(),
            spheres: Vec::new(),
            planes: Vec::new(),
            cubes: Vec::new(),
            lights: Vec::new(),
        })
    }

    /// Parse the whole description and build the scene.
    pub fn parse(mut self, content: &str) -> ParseResult<Scene> {
        for (i, text) in content.lines().enumerate() {
            let text = text.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if let Some(fields) = Fields::split(i + 1, text) {
                self.parse_line(&fields)?;
            }
        }
        self.finish()
    }

    fn parse_line(&mut self, f: &Fields) -> ParseResult<()> {
        match f.keyword {
            "cam" => {
                f.expect_len(11)?;
                if self.camera.is_some() {
                    return Err(ParseError::Parse {
                        line: f.line,
                        message: "camera defined more than once".to_string(),
                    });
                }
                let screen_width = f.float(10)?;
                self.camera = Some(Camera::new(
                    f.vec3(0)?,
                    f.vec3(3)?,
                    f.vec3(6)?,
                    f.float(9)?,
                    screen_width,
                    screen_width * self.aspect_ratio,
                ));
            }
            "set" => {
                f.expect_len(5)?;
                if self.settings.is_some() {
                    return Err(ParseError::Parse {
                        line: f.line,
                        message: "settings defined more than once".to_string(),
                    });
                }
                self.settings = Some(Settings::new(f.vec3(0)?, f.count(3)?, f.count(4)?));
            }
            "mtl" => {
                f.expect_len(11)?;
                self.materials.push(Material::new(
                    f.vec3(0)?,
                    f.vec3(3)?,
                    f.vec3(6)?,
                    f.float(9)?,
                    f.float(10)?,
                ));
            }
            "sph" => {
                f.expect_len(5)?;
                self.spheres.push(Sphere::new(f.vec3(0)?, f.float(3)?, f.index(4)?));
            }
            "pln" => {
                f.expect_len(5)?;
                self.planes.push(Plane::new(f.vec3(0)?, f.float(3)?, f.index(4)?));
            }
            "box" => {
                f.expect_len(5)?;
                self.cubes.push(Cube::new(f.vec3(0)?, f.float(3)?, f.index(4)?));
            }
            "lgt" => {
                f.expect_len(9)?;
                self.lights.push(Light::new(
                    f.vec3(0)?,
                    f.vec3(3)?,
                    f.float(6)?,
                    f.float(7)?,
                    f.float(8)?,
                ));
            }
            other => {
                log::warn!("Skipping unknown scene keyword `{}` at line {}", other, f.line);
            }
        }
        Ok(())
    }

    fn finish(self) -> ParseResult<Scene> {
        let camera = self.camera.ok_or(ParseError::Missing("cam"))?;
        let settings = self.settings.ok_or(ParseError::Missing("set"))?;

        let mut builder = SceneBuilder::new(camera, settings);
        for material in self.materials {
            builder.add_material(material);
        }
        for sphere in self.spheres {
            builder.add_sphere(sphere);
        }
        for plane in self.planes {
            builder.add_plane(plane);
        }
        for cube in self.cubes {
            builder.add_cube(cube);
        }
        for light in self.lights {
            builder.add_light(light);
        }

        Ok(builder.build()?)
    }
}

/// Parse a scene description held in memory (useful for testing).
pub fn parse_scene(content: &str, aspect_ratio: f64) -> ParseResult<Scene> {
    SceneParser::new(aspect_ratio)?.parse(content)
}

/// Read and parse a scene description file.
pub fn load_scene<P: AsRef<Path>>(path: P, aspect_ratio: f64) -> ParseResult<Scene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    log::info!("Loading scene from {}", path.display());
    parse_scene(&content, aspect_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "\
# Camera: pos lookat up dist width
cam 0 0 0   0 0 1   0 1 0   1 2

# Settings: bg shadow_rays max_recursion
set 0.1 0.2 0.3   4   3

mtl 1 0 0   0 0 0   0 0 0   10 0
mtl 0.5 0.5 0.5   1 1 1   0.2 0.2 0.2   30 0.5

sph 0 0 5   1   0
pln 0 2 0   -2  1
box 2 0 6   1.0 1
lgt 0 5 0   1 1 1   1 0.5 0.5
";

    #[test]
    fn test_parse_full_scene() {
        let scene = parse_scene(SCENE, 0.5).unwrap();

        let camera = scene.camera();
        assert_eq!(camera.look_at, Vec3::Z);
        assert_eq!(camera.screen_distance, 1.0);
        assert_eq!(camera.screen_width, 2.0);
        assert_eq!(camera.screen_height, 1.0);

        let settings = scene.settings();
        assert_eq!(settings.background, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(settings.shadow_rays, 4);
        assert_eq!(settings.max_recursion, 3);

        assert_eq!(scene.materials().len(), 2);
        assert_eq!(scene.materials()[1].phong, 30.0);
        assert_eq!(scene.materials()[1].transparency, 0.5);

        assert_eq!(scene.spheres()[0].radius, 1.0);
        assert_eq!(scene.planes()[0].normal, Vec3::Y);
        assert_eq!(scene.planes()[0].offset, -1.0);
        assert_eq!(scene.cubes()[0].material, 1);

        let light = &scene.lights()[0];
        assert_eq!(light.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(light.shadow_intensity, 0.5);
        assert_eq!(light.radius, 0.5);
    }

    #[test]
    fn test_unknown_keywords_are_skipped() {
        let content = format!("{}\nfog 0.5 0.5\n", SCENE);
        assert!(parse_scene(&content, 1.0).is_ok());
    }

    #[test]
    fn test_missing_camera() {
        let err = parse_scene("set 0 0 0 1 1\n", 1.0).unwrap_err();
        assert!(matches!(err, ParseError::Missing("cam")));
    }

    #[test]
    fn test_missing_settings() {
        let err = parse_scene("cam 0 0 0 0 0 1 0 1 0 1 1\n", 1.0).unwrap_err();
        assert!(matches!(err, ParseError::Missing("set")));
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let err = parse_scene("\n\nsph 0 0 5 1\n", 1.0).unwrap_err();
        match err {
            ParseError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_scene("sph 0 zero 5 1 0\n", 1.0).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "zero");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_index_is_rejected() {
        let content = SCENE.replace("sph 0 0 5   1   0", "sph 0 0 5   1   0.5");
        assert!(matches!(
            parse_scene(&content, 1.0),
            Err(ParseError::Parse { .. })
        ));
    }

    #[test]
    fn test_validation_errors_surface() {
        let content = SCENE.replace("sph 0 0 5   1   0", "sph 0 0 5   1   7");
        let err = parse_scene(&content, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Scene(SceneError::InvalidMaterialIndex { index: 7, .. })
        ));
    }

    #[test]
    fn test_invalid_aspect_ratio() {
        assert!(matches!(
            parse_scene(SCENE, 0.0),
            Err(ParseError::InvalidAspectRatio(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_scene("/definitely/not/here.txt", 1.0).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
