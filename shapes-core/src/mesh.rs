/// Procedural solids of revolution built by stacking cross-sections along z
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::error::{ShapeError, ShapeResult};
use crate::geometry::{Edge, Face, Shape};
use crate::transform::{point, Transform, Vec4};

/// Fewest sides a cross-section polygon may have.
pub const MIN_SEGMENTS: usize = 3;
/// Segment count the front ends use when none is given.
pub const DEFAULT_SEGMENTS: usize = 24;

fn check_segments(segments: usize) -> ShapeResult<usize> {
    if segments < MIN_SEGMENTS {
        return Err(ShapeError::invalid(
            "segments",
            format!("{segments} is below the minimum of {MIN_SEGMENTS}"),
        ));
    }
    Ok(segments)
}

/// Regular polygon at z = 0 with an apothem of 1, counter-clockwise from +z.
///
/// Using the apothem rather than the circumradius keeps the flat sides of
/// every shape the same distance from the axis whatever the segment count.
pub fn regular_polygon(segments: usize) -> ShapeResult<Vec<Vec4>> {
    let segments = check_segments(segments)?;
    let base = point((PI / segments as f32).tan(), 1.0, 0.0);
    Ok((0..segments)
        .map(|k| base * Transform::rotate_z(TAU * k as f32 / segments as f32))
        .collect())
}

/// The most recently placed cross-section.
#[derive(Debug, Clone, PartialEq)]
pub enum Cursor {
    /// A single apex vertex.
    Point { apex: usize },
    /// A ring whose far side is already capped by `cap`.
    Face { ring: usize, cap: usize },
    /// A ring still open on its far side; `sides[k]` is the face below ring side `k`.
    Edge { ring: usize, sides: Vec<usize> },
}

/// Incremental builder that owns the growing buffers until [`shape`](Self::shape).
///
/// ```
/// use shapes_core::mesh::ExtrusionBuilder;
///
/// let cylinder = ExtrusionBuilder::start_poly(8)
///     .unwrap()
///     .extrude_poly(2.0)
///     .close()
///     .shape()
///     .unwrap();
/// assert_eq!(cylinder.faces().len(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct ExtrusionBuilder {
    polygon: Vec<Vec4>,
    z: f32,
    vertices: Vec<Vec4>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
    cursor: Cursor,
}

impl ExtrusionBuilder {
    fn empty(segments: usize, cursor: Cursor) -> ShapeResult<Self> {
        Ok(Self {
            polygon: regular_polygon(segments)?,
            z: -1.0,
            vertices: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
            cursor,
        })
    }

    /// Seed with a single apex at z = -1.
    pub fn start_point(segments: usize) -> ShapeResult<Self> {
        let mut builder = Self::empty(segments, Cursor::Point { apex: 0 })?;
        builder.vertices.push(point(0.0, 0.0, builder.z));
        Ok(builder)
    }

    /// Seed with a ring at z = -1 and a cap facing down the axis.
    pub fn start_poly(segments: usize) -> ShapeResult<Self> {
        let mut builder = Self::empty(segments, Cursor::Point { apex: 0 })?;
        let ring = builder.push_ring();
        let n = builder.segments();
        builder.faces.push((0..n).rev().map(|k| ring + k).collect());
        builder.cursor = Cursor::Face { ring, cap: 0 };
        Ok(builder)
    }

    pub fn segments(&self) -> usize {
        self.polygon.len()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Place an apex `dz` further along the axis and fan the previous ring into it.
    ///
    /// Two apexes in a row collapse: the existing apex just moves.
    pub fn extrude_point(mut self, dz: f32) -> Self {
        self.z += dz;
        let (ring, below) = match self.section() {
            Section::Apex(apex) => {
                self.vertices[apex][2] = self.z;
                return self;
            }
            Section::Ring(ring, below) => (ring, below),
        };

        let n = self.segments();
        let apex = self.vertices.len();
        self.vertices.push(point(0.0, 0.0, self.z));

        let first = self.faces.len();
        for k in 0..n {
            self.faces.push(vec![ring + k, ring + (k + 1) % n, apex]);
        }
        for k in 0..n {
            self.edges
                .push(Edge::new(ring + k, ring + (k + 1) % n, below[k], first + k));
        }
        for k in 0..n {
            self.edges
                .push(Edge::new(ring + k, apex, first + (k + n - 1) % n, first + k));
        }

        self.cursor = Cursor::Point { apex };
        self
    }

    /// Place a ring `dz` further along the axis and join it to the previous section.
    pub fn extrude_poly(mut self, dz: f32) -> Self {
        self.z += dz;
        let n = self.segments();
        let previous = self.section();
        let ring = self.push_ring();
        let first = self.faces.len();

        match previous {
            Section::Apex(apex) => {
                for k in 0..n {
                    self.faces.push(vec![ring + (k + 1) % n, ring + k, apex]);
                }
                for k in 0..n {
                    self.edges
                        .push(Edge::new(apex, ring + k, first + (k + n - 1) % n, first + k));
                }
            }
            Section::Ring(base, below) => {
                for k in 0..n {
                    let k1 = (k + 1) % n;
                    self.faces
                        .push(vec![base + k, base + k1, ring + k1, ring + k]);
                }
                for k in 0..n {
                    self.edges
                        .push(Edge::new(base + k, base + (k + 1) % n, below[k], first + k));
                }
                for k in 0..n {
                    self.edges
                        .push(Edge::new(base + k, ring + k, first + (k + n - 1) % n, first + k));
                }
            }
        }

        self.cursor = Cursor::Edge {
            ring,
            sides: (first..first + n).collect(),
        };
        self
    }

    /// Cap an open ring. Points and capped rings are left alone.
    pub fn close(mut self) -> Self {
        let Cursor::Edge { ring, sides } = &self.cursor else {
            return self;
        };
        let (ring, sides) = (*ring, sides.clone());
        let n = self.segments();
        let cap = self.faces.len();
        self.faces.push((0..n).map(|k| ring + k).collect());
        for (k, &side) in sides.iter().enumerate() {
            self.edges
                .push(Edge::new(ring + k, ring + (k + 1) % n, side, cap));
        }
        self.cursor = Cursor::Face { ring, cap };
        self
    }

    /// Freeze into an immutable [`Shape`], capping any open ring first.
    pub fn shape(self) -> ShapeResult<Shape> {
        let builder = self.close();
        tracing::debug!(
            vertices = builder.vertices.len(),
            faces = builder.faces.len(),
            edges = builder.edges.len(),
            "froze extruded shape"
        );
        Shape::new(builder.vertices, builder.faces, builder.edges)
    }

    fn push_ring(&mut self) -> usize {
        let ring = self.vertices.len();
        let z = self.z;
        self.vertices
            .extend(self.polygon.iter().map(|p| point(p[0], p[1], z)));
        ring
    }

    fn section(&self) -> Section {
        match &self.cursor {
            Cursor::Point { apex } => Section::Apex(*apex),
            Cursor::Face { ring, cap } => Section::Ring(*ring, vec![*cap; self.segments()]),
            Cursor::Edge { ring, sides } => Section::Ring(*ring, sides.clone()),
        }
    }
}

/// Cursor flattened for joining: a ring carries the face bordering each of its sides.
enum Section {
    Apex(usize),
    Ring(usize, Vec<usize>),
}

/// Axis-aligned cube spanning [-1, 1] on every axis.
pub fn box_shape() -> ShapeResult<Shape> {
    let vertices = [-1.0, 1.0]
        .into_iter()
        .flat_map(|x| {
            [-1.0, 1.0]
                .into_iter()
                .flat_map(move |y| [-1.0, 1.0].into_iter().map(move |z| point(x, y, z)))
        })
        .collect();
    let faces = vec![
        vec![0, 1, 3, 2],
        vec![0, 4, 5, 1],
        vec![0, 2, 6, 4],
        vec![7, 3, 1, 5],
        vec![7, 5, 4, 6],
        vec![7, 6, 2, 3],
    ];
    let edges = [
        (0, 1, 0, 1),
        (0, 2, 0, 2),
        (0, 4, 1, 2),
        (1, 3, 0, 3),
        (1, 5, 1, 3),
        (2, 3, 0, 5),
        (2, 6, 2, 5),
        (3, 7, 3, 5),
        (4, 5, 1, 4),
        (4, 6, 2, 4),
        (5, 7, 3, 4),
        (6, 7, 4, 5),
    ]
    .into_iter()
    .map(|(a, b, f1, f2)| Edge::new(a, b, f1, f2))
    .collect();
    Shape::new(vertices, faces, edges)
}

pub fn cylinder(segments: usize) -> ShapeResult<Shape> {
    ExtrusionBuilder::start_poly(segments)?
        .extrude_poly(2.0)
        .close()
        .shape()
}

pub fn cone(segments: usize) -> ShapeResult<Shape> {
    ExtrusionBuilder::start_poly(segments)?
        .extrude_point(2.0)
        .shape()
}

pub fn double_cone(segments: usize) -> ShapeResult<Shape> {
    ExtrusionBuilder::start_point(segments)?
        .extrude_poly(1.0)
        .extrude_point(1.0)
        .shape()
}

/// Selectable shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Cylinder,
    Cone,
    DoubleCone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Box,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
        ShapeKind::DoubleCone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
            ShapeKind::DoubleCone => "double-cone",
        }
    }

    /// Build the shape; `segments` is ignored for the box.
    pub fn build(self, segments: usize) -> ShapeResult<Shape> {
        match self {
            ShapeKind::Box => box_shape(),
            ShapeKind::Cylinder => cylinder(segments),
            ShapeKind::Cone => cone(segments),
            ShapeKind::DoubleCone => double_cone(segments),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ShapeError::invalid("shape", format!("unknown shape {s:?}")))
    }
}
