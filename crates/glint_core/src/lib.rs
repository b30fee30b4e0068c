//! Glint Core - scene model and scene description parsing.
//!
//! This crate provides:
//!
//! - **Scene model**: `Camera`, `Settings`, `Material`, `Sphere`, `Plane`,
//!   `Cube`, `Light` and the validated, read-only `Scene`
//! - **Parsing**: the line-oriented scene text format
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! // 500x500 output, so the screen is square
//! let scene = load_scene("scenes/pool.txt", 1.0)?;
//! println!("Loaded {} surfaces, {} lights",
//!     scene.surface_count(),
//!     scene.lights().len());
//! ```

pub mod error;
pub mod parser;
pub mod scene;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use parser::{load_scene, parse_scene, ParseError, ParseResult, SceneParser};
pub use scene::{Camera, Cube, Light, Material, Plane, Scene, SceneBuilder, Settings, Sphere};
