/// Frozen mesh types: vertices, polygon faces, face normals and edge records
use crate::error::{ShapeError, ShapeResult};
use crate::transform::{face_normals, Normal, Vec4};

/// Ordered vertex indices of a planar polygon, counter-clockwise seen from outside.
pub type Face = Vec<usize>;

/// An edge shared by exactly two faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub faces: [usize; 2],
}

impl Edge {
    pub fn new(a: usize, b: usize, face1: usize, face2: usize) -> Self {
        Self {
            a,
            b,
            faces: [face1, face2],
        }
    }

    /// The endpoint opposite `vertex`, if `vertex` is an endpoint at all.
    pub fn other(&self, vertex: usize) -> Option<usize> {
        if vertex == self.a {
            Some(self.b)
        } else if vertex == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// True when both adjacent faces satisfy `hidden`.
    pub fn is_enclosed_by(&self, hidden: impl Fn(usize) -> bool) -> bool {
        hidden(self.faces[0]) && hidden(self.faces[1])
    }
}

/// An immutable polygon mesh ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    vertices: Vec<Vec4>,
    faces: Vec<Face>,
    normals: Vec<Normal>,
    edges: Vec<Edge>,
}

impl Shape {
    /// Freeze raw buffers into a shape, computing face normals.
    ///
    /// Fails with `DegenerateGeometry` if a face is too small, references a
    /// missing vertex or has collinear leading vertices, or if an edge is
    /// not shared by the two faces it names.
    pub fn new(vertices: Vec<Vec4>, faces: Vec<Face>, edges: Vec<Edge>) -> ShapeResult<Self> {
        for (i, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(ShapeError::degenerate(format!(
                    "face {i} has {} vertices",
                    face.len()
                )));
            }
            if let Some(&v) = face.iter().find(|&&v| v >= vertices.len()) {
                return Err(ShapeError::degenerate(format!(
                    "face {i} references vertex {v} of {}",
                    vertices.len()
                )));
            }
        }

        let normals = face_normals(&vertices, &faces);
        // |e1 x e2|^2 = |e1|^2 |e2|^2 sin^2, so the cutoff is on the angle alone
        let degenerate = |(face, n): (&Face, &Normal)| {
            let e1 = (vertices[face[1]] - vertices[face[0]]).norm_squared();
            let e2 = (vertices[face[2]] - vertices[face[1]]).norm_squared();
            let area = n.norm_squared();
            !area.is_finite() || area <= f32::EPSILON * e1 * e2
        };
        if let Some(i) = faces.iter().zip(&normals).position(degenerate) {
            return Err(ShapeError::degenerate(format!("face {i} has a zero normal")));
        }

        for edge in &edges {
            if edge.faces[0] == edge.faces[1] {
                return Err(ShapeError::degenerate(format!(
                    "edge {}-{} names face {} twice",
                    edge.a, edge.b, edge.faces[0]
                )));
            }
            for &f in &edge.faces {
                let shared = faces.get(f).is_some_and(|face| has_side(face, edge.a, edge.b));
                if !shared {
                    return Err(ShapeError::degenerate(format!(
                        "edge {}-{} is not a side of face {f}",
                        edge.a, edge.b
                    )));
                }
            }
        }

        Ok(Self {
            vertices,
            faces,
            normals,
            edges,
        })
    }

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Does `face` have `a` and `b` as consecutive corners, in either order?
fn has_side(face: &[usize], a: usize, b: usize) -> bool {
    let n = face.len();
    (0..n).any(|k| {
        let (p, q) = (face[k], face[(k + 1) % n]);
        (p == a && q == b) || (p == b && q == a)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::point;

    fn triangle_pair() -> (Vec<Vec4>, Vec<Face>) {
        let vertices = vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(0.0, 1.0, 0.0),
            point(0.0, 0.0, 1.0),
        ];
        (vertices, vec![vec![0, 1, 2], vec![0, 3, 1]])
    }

    #[test]
    fn test_edge_other() {
        let edge = Edge::new(3, 7, 0, 1);
        assert_eq!(edge.other(3), Some(7));
        assert_eq!(edge.other(7), Some(3));
        assert_eq!(edge.other(4), None);
    }

    #[test]
    fn test_edge_enclosed() {
        let edge = Edge::new(0, 1, 2, 5);
        assert!(edge.is_enclosed_by(|f| f == 2 || f == 5));
        assert!(!edge.is_enclosed_by(|f| f == 2));
    }

    #[test]
    fn test_shape_computes_normals() {
        let (vertices, faces) = triangle_pair();
        let shape = Shape::new(vertices, faces, vec![Edge::new(0, 1, 0, 1)]).unwrap();
        assert_eq!(shape.normals().len(), 2);
        assert!((shape.normals()[0] - Normal::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_shape_rejects_short_face() {
        let (vertices, _) = triangle_pair();
        let err = Shape::new(vertices, vec![vec![0, 1]], vec![]).unwrap_err();
        assert!(matches!(err, ShapeError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_shape_rejects_collinear_face() {
        let vertices = vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(2.0, 0.0, 0.0),
        ];
        assert!(Shape::new(vertices, vec![vec![0, 1, 2]], vec![]).is_err());
    }

    #[test]
    fn test_small_face_is_not_degenerate() {
        let vertices = vec![
            point(0.0, 0.0, 0.0),
            point(1e-3, 0.0, 0.0),
            point(0.0, 1e-3, 0.0),
        ];
        let shape = Shape::new(vertices, vec![vec![0, 1, 2]], vec![]).unwrap();
        assert!(shape.normals()[0][2] > 0.0);

        // a sliver with the same edge lengths but no angle between them
        let vertices = vec![
            point(0.0, 0.0, 0.0),
            point(1e-3, 0.0, 0.0),
            point(2e-3, 0.0, 0.0),
        ];
        assert!(Shape::new(vertices, vec![vec![0, 1, 2]], vec![]).is_err());
    }

    #[test]
    fn test_shape_rejects_unshared_edge() {
        let (vertices, faces) = triangle_pair();
        assert!(Shape::new(vertices.clone(), faces.clone(), vec![Edge::new(1, 2, 0, 1)]).is_err());
        assert!(Shape::new(vertices.clone(), faces.clone(), vec![Edge::new(0, 1, 0, 0)]).is_err());
        assert!(Shape::new(vertices, faces, vec![Edge::new(0, 1, 0, 9)]).is_err());
    }
}
