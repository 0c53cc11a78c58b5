/// Backface culling for faces and the edges between them
use std::collections::HashSet;

use crate::geometry::Edge;
use crate::transform::Normal;

/// Which sign of a normal's depth (y) component faces the viewer.
///
/// World space looks down +y, so front faces point towards -y. The
/// perspective divide flips handedness and the screen transform scales depth
/// by a negative factor, so after both the front faces end up on +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    NegativeDepth,
    PositiveDepth,
}

impl Facing {
    pub const WORLD: Facing = Facing::NegativeDepth;
    pub const SCREEN: Facing = Facing::PositiveDepth;

    /// Edge-on faces (depth exactly 0) are not visible.
    pub fn is_visible(self, normal: &Normal) -> bool {
        match self {
            Facing::NegativeDepth => normal[1] < 0.0,
            Facing::PositiveDepth => normal[1] > 0.0,
        }
    }
}

/// A face travelling through the pipeline with whatever per-face data the caller attaches.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEntry<T> {
    /// Index into the shape's face list.
    pub index: usize,
    pub normal: Normal,
    pub data: T,
}

impl<T> FaceEntry<T> {
    pub fn new(index: usize, normal: Normal, data: T) -> Self {
        Self {
            index,
            normal,
            data,
        }
    }
}

/// Keep the faces that are visible under `facing`, recording the others in `removed`.
///
/// Order is preserved.
pub fn cull_faces<T>(
    faces: Vec<FaceEntry<T>>,
    facing: Facing,
    removed: &mut HashSet<usize>,
) -> Vec<FaceEntry<T>> {
    let before = faces.len();
    let visible: Vec<_> = faces
        .into_iter()
        .filter(|face| {
            let keep = facing.is_visible(&face.normal);
            if !keep {
                removed.insert(face.index);
            }
            keep
        })
        .collect();
    tracing::trace!(?facing, before, after = visible.len(), "culled faces");
    visible
}

/// Drop edges whose two adjacent faces have both been removed.
pub fn cull_edges(edges: &[Edge], removed: &HashSet<usize>) -> Vec<Edge> {
    edges
        .iter()
        .filter(|edge| !edge.is_enclosed_by(|f| removed.contains(&f)))
        .copied()
        .collect()
}
