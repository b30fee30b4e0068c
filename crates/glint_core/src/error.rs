//! Scene validation errors.

use thiserror::Error;

/// A scene that violates one of the model invariants.
///
/// These are configuration errors: rendering never starts on a scene
/// that produced one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("{0} must not be a zero-length vector")]
    ZeroVector(&'static str),

    #[error("{what} refers to material {index}, but only {count} materials are defined")]
    InvalidMaterialIndex {
        what: &'static str,
        index: usize,
        count: usize,
    },

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("{what} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

/// Reject NaN and infinite values.
pub(crate) fn check_finite(what: &'static str, value: f64) -> SceneResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::NonFinite(what))
    }
}

pub(crate) fn check_positive(what: &'static str, value: f64) -> SceneResult<f64> {
    if check_finite(what, value)? > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::NonPositive { what, value })
    }
}

pub(crate) fn check_range(what: &'static str, value: f64, min: f64, max: f64) -> SceneResult<f64> {
    if (min..=max).contains(&check_finite(what, value)?) {
        Ok(value)
    } else {
        Err(SceneError::OutOfRange {
            what,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert_eq!(check_positive("radius", 1.5), Ok(1.5));
        assert_eq!(
            check_positive("radius", 0.0),
            Err(SceneError::NonPositive {
                what: "radius",
                value: 0.0
            })
        );
        assert_eq!(check_range("transparency", 1.0, 0.0, 1.0), Ok(1.0));
        assert!(check_range("transparency", 1.1, 0.0, 1.0).is_err());
        assert_eq!(
            check_finite("offset", f64::NAN),
            Err(SceneError::NonFinite("offset"))
        );
    }

    #[test]
    fn test_error_message() {
        let err = SceneError::InvalidMaterialIndex {
            what: "sphere",
            index: 3,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "sphere refers to material 3, but only 2 materials are defined"
        );
    }
}
