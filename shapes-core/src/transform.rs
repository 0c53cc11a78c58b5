/// Affine transformation matrices, rotation state and bulk vertex transforms
///
/// Points are row vectors and are transformed as `v' = v * M`, so a chain of
/// transforms composes left to right in the order they are applied.
use nalgebra::{Matrix4, RowVector3, RowVector4};
use std::f32::consts::{PI, TAU};

use crate::geometry::Face;

/// Homogeneous point `(x, y, z, w)`; `w` is 1 for every mesh vertex.
pub type Vec4 = RowVector4<f32>;
/// 4x4 affine matrix in the row-vector convention.
pub type Mat4 = Matrix4<f32>;
/// Unnormalized face normal.
pub type Normal = RowVector3<f32>;

/// Smallest depth magnitude the perspective divide will accept.
pub const MIN_DEPTH: f32 = 1e-4;

/// Build a homogeneous point.
pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// Rotation state around the vertical (z) and tilt (x) axes, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub z: f32,
    pub x: f32,
}

impl RotationState {
    pub fn new(z: f32, x: f32) -> Self {
        Self { z, x }
    }

    pub fn zero() -> Self {
        Self { z: 0.0, x: 0.0 }
    }

    /// Orientation a freshly opened viewer starts in.
    pub fn home() -> Self {
        Self {
            z: PI / 8.0,
            x: PI / 4.5,
        }
    }

    /// Rotate by delta amounts (in radians), wrapping both angles into `[0, 2π)`
    pub fn rotate(&mut self, dz: f32, dx: f32) {
        self.z = (self.z + dz).rem_euclid(TAU);
        self.x = (self.x + dx).rem_euclid(TAU);
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Translation by `(dx, dy, dz)`
    #[rustfmt::skip]
    pub fn translation(dx: f32, dy: f32, dz: f32) -> Mat4 {
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            dx, dy, dz, 1.0,
        )
    }

    /// Non-uniform scale along each axis
    #[rustfmt::skip]
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
        Mat4::new(
            sx, 0.0, 0.0, 0.0,
            0.0, sy, 0.0, 0.0,
            0.0, 0.0, sz, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotate_x(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, s, 0.0,
            0.0, -s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotate_y(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new(
            c, 0.0, -s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotate_z(angle: f32) -> Mat4 {
        let (s, c) = angle.sin_cos();
        Mat4::new(
            c, s, 0.0, 0.0,
            -s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Apply `first`, then `then`.
    pub fn compose(first: &Mat4, then: &Mat4) -> Mat4 {
        first * then
    }
}

/// Transform every point by `matrix`, reusing `out` as the destination buffer.
pub fn transform_points_into(points: &[Vec4], matrix: &Mat4, out: &mut Vec<Vec4>) {
    out.clear();
    out.extend(points.iter().map(|p| p * matrix));
}

/// Transform directions: the translation row is ignored.
pub fn transform_normals(normals: &[Normal], matrix: &Mat4) -> Vec<Normal> {
    normals
        .iter()
        .map(|n| {
            let v = Vec4::new(n[0], n[1], n[2], 0.0) * matrix;
            Normal::new(v[0], v[1], v[2])
        })
        .collect()
}

/// Pinhole projection: scale x and z by `d / y`, leaving depth in y.
///
/// Depths closer to zero than [`MIN_DEPTH`] are pushed out to it so the
/// result stays finite.
pub fn perspective(vertices: &mut [Vec4], d: f32) {
    perspective_with_min_depth(vertices, d, MIN_DEPTH);
}

pub fn perspective_with_min_depth(vertices: &mut [Vec4], d: f32, min_depth: f32) {
    for v in vertices.iter_mut() {
        let depth = if v[1].abs() < min_depth {
            min_depth.copysign(v[1])
        } else {
            v[1]
        };
        let factor = d / depth;
        v[0] *= factor;
        v[2] *= factor;
    }
}

fn xyz(v: &Vec4) -> Normal {
    Normal::new(v[0], v[1], v[2])
}

/// Normal of one face from its first three vertices, unnormalized.
pub fn face_normal(vertices: &[Vec4], face: &[usize]) -> Normal {
    let e1 = xyz(&vertices[face[1]]) - xyz(&vertices[face[0]]);
    let e2 = xyz(&vertices[face[2]]) - xyz(&vertices[face[1]]);
    e1.cross(&e2)
}

/// Per-face normals; magnitude is proportional to the leading triangle's area.
pub fn face_normals(vertices: &[Vec4], faces: &[Face]) -> Vec<Normal> {
    faces.iter().map(|f| face_normal(vertices, f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Vec4, b: &Vec4) {
        assert!((a - b).norm() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.z, 0.0);
        assert_eq!(state.x, 0.0);

        state.rotate(0.1, 0.2);
        assert!((state.z - 0.1).abs() < 1e-6);
        assert!((state.x - 0.2).abs() < 1e-6);

        state.rotate(-0.3, TAU);
        assert!((state.z - (TAU - 0.2)).abs() < 1e-5);
        assert!((state.x - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::compose(&Transform::rotate_z(0.0), &Transform::rotate_x(0.0));
        assert!((matrix - Mat4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let m = Transform::translation(1.0, 2.0, 3.0);
        assert_close(&(point(1.0, 1.0, 1.0) * m), &point(2.0, 3.0, 4.0));

        let n = transform_normals(&[Normal::new(0.0, 0.0, 1.0)], &m);
        assert!((n[0] - Normal::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let v = point(1.0, 0.0, 0.0) * Transform::rotate_z(PI / 2.0);
        assert_close(&v, &point(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_x_quarter_turn() {
        let v = point(0.0, 0.0, 1.0) * Transform::rotate_x(PI / 2.0);
        assert_close(&v, &point(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = point(1.0, 0.0, 0.0) * Transform::rotate_y(PI / 2.0);
        assert_close(&v, &point(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_compose_applies_in_order() {
        let scale_then_move = Transform::compose(
            &Transform::scale(2.0, 2.0, 2.0),
            &Transform::translation(1.0, 0.0, 0.0),
        );
        let move_then_scale = Transform::compose(
            &Transform::translation(1.0, 0.0, 0.0),
            &Transform::scale(2.0, 2.0, 2.0),
        );
        let p = point(1.0, 1.0, 1.0);
        assert_close(&(p * scale_then_move), &point(3.0, 2.0, 2.0));
        assert_close(&(p * move_then_scale), &point(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_perspective_shrinks_with_depth() {
        let mut vertices = vec![point(1.0, 2.0, 1.0), point(1.0, 4.0, -1.0)];
        perspective(&mut vertices, 2.0);
        assert_close(&vertices[0], &point(1.0, 2.0, 1.0));
        assert_close(&vertices[1], &point(0.5, 4.0, -0.5));
    }

    #[test]
    fn test_perspective_guards_zero_depth() {
        let mut vertices = vec![point(1.0, 0.0, 1.0), point(1.0, -0.0, 1.0)];
        perspective(&mut vertices, 2.0);
        assert!(vertices.iter().all(|v| v.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_face_normals_follow_winding() {
        let vertices = vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(1.0, 1.0, 0.0),
        ];
        let normals = face_normals(&vertices, &[vec![0, 1, 2], vec![2, 1, 0]]);
        assert!((normals[0] - Normal::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        assert!((normals[1] - Normal::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }
}
