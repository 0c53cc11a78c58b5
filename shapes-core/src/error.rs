//! Error types for shape construction and rendering.

use thiserror::Error;

/// Errors raised by the shape builders and the render pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// A caller-supplied argument is out of range or not finite.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Geometry that cannot be rendered without producing NaN or garbage.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl ShapeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry(reason.into())
    }
}

/// Result type for shape operations.
pub type ShapeResult<T> = std::result::Result<T, ShapeError>;

/// Reject non-finite floats with an `InvalidArgument` naming the input.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> ShapeResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ShapeError::invalid(name, format!("{value} is not finite")))
    }
}
