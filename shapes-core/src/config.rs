/// Tunable constants of the render pipeline
use crate::error::{ensure_finite, ShapeError, ShapeResult};
use crate::projection::Camera;
use crate::shading::{Light, Rgb};

/// How silhouette strokes are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineStyle {
    pub color: Rgb,
    /// Stroke width as a share of the viewport width.
    pub width_fraction: f32,
    pub min_width: f32,
}

impl OutlineStyle {
    pub fn width_for(&self, viewport_width: f32) -> f32 {
        (viewport_width * self.width_fraction).max(self.min_width)
    }

    pub fn validate(&self) -> ShapeResult<()> {
        for (name, value) in [
            ("outline.width_fraction", self.width_fraction),
            ("outline.min_width", self.min_width),
        ] {
            ensure_finite(name, value)?;
            if value < 0.0 {
                return Err(ShapeError::invalid(name, format!("{value} is negative")));
            }
        }
        Ok(())
    }
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            width_fraction: 0.01,
            min_width: 4.0,
        }
    }
}

/// Everything the renderer needs besides the scene and the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderConfig {
    pub camera: Camera,
    pub light: Light,
    pub outline: OutlineStyle,
}

impl RenderConfig {
    pub fn validate(&self) -> ShapeResult<()> {
        self.camera.validate()?;
        self.light.validate()?;
        self.outline.validate()
    }
}
