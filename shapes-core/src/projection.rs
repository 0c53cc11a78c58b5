/// Camera placement, perspective projection and screen mapping
use crate::error::{ensure_finite, ShapeError, ShapeResult};
use crate::transform::{
    perspective_with_min_depth, Mat4, RotationState, Transform, Vec4, MIN_DEPTH,
};

/// Pixel size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Both dimensions must be finite and positive.
    pub fn new(width: f32, height: f32) -> ShapeResult<Self> {
        for (name, value) in [("viewport_width", width), ("viewport_height", height)] {
            ensure_finite(name, value)?;
            if value <= 0.0 {
                return Err(ShapeError::invalid(name, format!("{value} is not positive")));
            }
        }
        Ok(Self { width, height })
    }
}

/// Camera configuration for 3D rendering
///
/// The viewer sits at the origin looking down +y; x runs right and z up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// How far the object is pushed along the depth axis.
    pub distance: f32,
    /// Pinhole distance `d` of the perspective divide.
    pub focal_length: f32,
    pub min_depth: f32,
}

impl Camera {
    pub fn new(distance: f32, focal_length: f32) -> Self {
        Self {
            distance,
            focal_length,
            min_depth: MIN_DEPTH,
        }
    }

    /// Spin about the vertical axis, tilt about x, then push away from the viewer.
    pub fn world_transform(&self, rotation: &RotationState) -> Mat4 {
        let spin = Transform::compose(
            &Transform::rotate_z(rotation.z),
            &Transform::rotate_x(rotation.x),
        );
        Transform::compose(&spin, &Transform::translation(0.0, self.distance, 0.0))
    }

    /// Map post-perspective coordinates to pixels.
    ///
    /// The horizontal scale is reused for depth and height so the aspect ratio
    /// does not depend on the canvas height; z is flipped so up is up.
    pub fn screen_transform(&self, viewport: &Viewport) -> Mat4 {
        let half = viewport.width / 2.0;
        Transform::compose(
            &Transform::scale(half, half, -half),
            &Transform::translation(half, 0.0, viewport.height / 2.0),
        )
    }

    /// Perspective-divide world-space vertices in place.
    pub fn project(&self, vertices: &mut [Vec4]) {
        perspective_with_min_depth(vertices, self.focal_length, self.min_depth);
    }

    pub fn validate(&self) -> ShapeResult<()> {
        ensure_finite("camera.distance", self.distance)?;
        ensure_finite("camera.focal_length", self.focal_length)?;
        ensure_finite("camera.min_depth", self.min_depth)?;
        if self.focal_length <= 0.0 {
            return Err(ShapeError::invalid(
                "camera.focal_length",
                format!("{} is not positive", self.focal_length),
            ));
        }
        if self.min_depth <= 0.0 {
            return Err(ShapeError::invalid(
                "camera.min_depth",
                format!("{} is not positive", self.min_depth),
            ));
        }
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(5.0, 2.0)
    }
}

/// World transform with the default camera distance.
pub fn world_transform(z_rotation: f32, x_rotation: f32) -> Mat4 {
    Camera::default().world_transform(&RotationState::new(z_rotation, x_rotation))
}

/// Screen transform for a `content_width` x `content_height` canvas.
pub fn screen_transform(content_width: f32, content_height: f32) -> Mat4 {
    let viewport = Viewport {
        width: content_width,
        height: content_height,
    };
    Camera::default().screen_transform(&viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::point;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.distance, 5.0);
        assert_eq!(camera.focal_length, 2.0);
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn test_invalid_camera() {
        assert!(Camera::new(5.0, 0.0).validate().is_err());
        assert!(Camera::new(f32::NAN, 2.0).validate().is_err());
    }

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(400.0, 300.0).is_ok());
        assert!(Viewport::new(0.0, 300.0).is_err());
        assert!(Viewport::new(400.0, f32::INFINITY).is_err());
        assert!(matches!(
            Viewport::new(f32::NAN, 1.0),
            Err(ShapeError::InvalidArgument { name: "viewport_width", .. })
        ));
    }

    #[test]
    fn test_world_transform_pushes_away() {
        let m = world_transform(0.0, 0.0);
        let v = point(0.0, 0.0, 0.0) * m;
        assert!((v - point(0.0, 5.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_world_transform_rotation_order() {
        // z spin first: +x goes to +y, then the x tilt takes +y to +z.
        let m = world_transform(std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
        let v = point(1.0, 0.0, 0.0) * m;
        assert!((v - point(0.0, 5.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_screen_transform_centres_origin() {
        let m = screen_transform(400.0, 300.0);
        let centre = point(0.0, 1.0, 0.0) * m;
        assert!((centre[0] - 200.0).abs() < 1e-4);
        assert!((centre[2] - 150.0).abs() < 1e-4);

        // up in the scene is towards the top of the canvas
        let top = point(0.0, 1.0, 0.5) * m;
        assert!((top[2] - 50.0).abs() < 1e-4);
        let right = point(1.0, 1.0, 0.0) * m;
        assert!((right[0] - 400.0).abs() < 1e-4);
    }

    #[test]
    fn test_project_uses_focal_length() {
        let mut vertices = vec![point(1.0, 4.0, 2.0)];
        Camera::default().project(&mut vertices);
        assert!((vertices[0] - point(0.5, 4.0, 1.0)).norm() < 1e-6);
    }
}
