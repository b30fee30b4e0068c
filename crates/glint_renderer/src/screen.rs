//! Screen mapping: per-pixel ray generation basis.

use glint_core::Camera;
use glint_math::{Ray, Vec3};

use crate::error::{RenderError, RenderResult};

/// World-space layout of the pixel grid.
///
/// Pixel `(i, j)` is column `i`, row `j`. `vertical` is built as
/// `towards x horizontal`, which points opposite the camera's up vector, so
/// row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    /// Center of pixel (0, 0)
    pub corner_pixel: Vec3,
    /// Step from one column to the next
    pub horizontal: Vec3,
    /// Step from one row to the next
    pub vertical: Vec3,
    pub width: u32,
    pub height: u32,
}

impl Screen {
    /// Derive the screen for an output of `width` x `height` pixels.
    pub fn new(camera: &Camera, width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }

        let towards = camera.towards();
        if towards == Vec3::ZERO {
            return Err(RenderError::DegenerateBasis(
                "camera position equals the look-at point",
            ));
        }
        let horizontal = towards.cross(camera.up.normalize_or_zero());
        if horizontal.length_squared() < 1e-18 {
            return Err(RenderError::DegenerateBasis(
                "up vector is zero or parallel to the viewing direction",
            ));
        }
        let horizontal = horizontal.normalize();
        let vertical = towards.cross(horizontal).normalize();

        let center = camera.position + towards * camera.screen_distance;
        let horizontal_step = horizontal * (camera.screen_width / width as f64);
        let vertical_step = vertical * (camera.screen_height / height as f64);

        // Corner of the screen, then half a pixel in so indices land on centers
        let corner = center
            - horizontal * (camera.screen_width / 2.0)
            - vertical * (camera.screen_height / 2.0);
        let corner_pixel = corner + 0.5 * (horizontal_step + vertical_step);

        Ok(Self {
            corner_pixel,
            horizontal: horizontal_step,
            vertical: vertical_step,
            width,
            height,
        })
    }

    /// World-space center of pixel `(i, j)`.
    #[inline]
    pub fn pixel_center(&self, i: u32, j: u32) -> Vec3 {
        self.corner_pixel + i as f64 * self.horizontal + j as f64 * self.vertical
    }

    /// Primary ray from the camera through the center of pixel `(i, j)`.
    pub fn pixel_ray(&self, camera: &Camera, i: u32, j: u32) -> Ray {
        Ray::between(camera.position, self.pixel_center(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_center_pixel_looks_forward() {
        let camera = fixtures::camera();
        let screen = Screen::new(&camera, 3, 3).unwrap();

        let ray = screen.pixel_ray(&camera, 1, 1);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_pixel_steps() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Z, Vec3::Y, 1.0, 4.0, 2.0);
        let screen = Screen::new(&camera, 8, 2).unwrap();

        assert!((screen.horizontal.length() - 0.5).abs() < 1e-12);
        assert!((screen.vertical.length() - 1.0).abs() < 1e-12);
        assert!(screen.horizontal.dot(screen.vertical).abs() < 1e-12);
        assert!(screen.horizontal.dot(camera.towards()).abs() < 1e-12);
    }

    #[test]
    fn test_row_zero_is_top() {
        let camera = fixtures::camera();
        let screen = Screen::new(&camera, 2, 2).unwrap();

        let top = screen.pixel_center(0, 0);
        let bottom = screen.pixel_center(0, 1);
        assert!(top.y > bottom.y);
        assert!((top - Vec3::new(0.5, 0.5, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_pixels_lie_on_screen_plane() {
        let camera = Camera::new(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 0.0, -1.0),
            Vec3::Y,
            2.5,
            3.0,
            2.0,
        );
        let screen = Screen::new(&camera, 30, 20).unwrap();
        let towards = camera.towards();

        for (i, j) in [(0, 0), (29, 0), (0, 19), (29, 19), (15, 10)] {
            let p = screen.pixel_center(i, j);
            let depth = (p - camera.position).dot(towards);
            assert!((depth - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_camera_is_rejected() {
        let camera = Camera::new(Vec3::ZERO, Vec3::ZERO, Vec3::Y, 1.0, 1.0, 1.0);
        assert!(matches!(
            Screen::new(&camera, 10, 10),
            Err(RenderError::DegenerateBasis(_))
        ));

        let camera = Camera::new(Vec3::ZERO, Vec3::Y, Vec3::Y, 1.0, 1.0, 1.0);
        assert!(matches!(
            Screen::new(&camera, 10, 10),
            Err(RenderError::DegenerateBasis(_))
        ));
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let camera = fixtures::camera();
        assert!(matches!(
            Screen::new(&camera, 0, 10),
            Err(RenderError::InvalidResolution { width: 0, height: 10 })
        ));
    }
}
