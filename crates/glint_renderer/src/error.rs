//! Render errors.

use thiserror::Error;

/// Errors reported before or after a render, never during one.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Degenerate screen basis: {0}")]
    DegenerateBasis(&'static str),

    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
