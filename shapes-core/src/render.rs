/// Scene state and the per-frame pipeline that turns it into draw commands
use std::collections::HashSet;

pub use nalgebra::Point2;

use crate::config::RenderConfig;
use crate::cull::{cull_edges, cull_faces, FaceEntry, Facing};
use crate::edge_loop::assemble_loops;
use crate::error::{ensure_finite, ShapeError, ShapeResult};
use crate::geometry::{Edge, Shape};
use crate::projection::Viewport;
use crate::shading::Rgb;
use crate::transform::{face_normal, transform_normals, transform_points_into, RotationState, Vec4};

/// What the caller is showing: one shape, its orientation and its paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub shape: Shape,
    pub rotation: RotationState,
    pub color: Rgb,
}

impl Scene {
    /// A scene in the home orientation, painted navy.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            rotation: RotationState::home(),
            color: Rgb::NAVY,
        }
    }

    pub fn with_rotation(mut self, z_rotation: f32, x_rotation: f32) -> Self {
        self.rotation = RotationState::new(z_rotation, x_rotation);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Replace the shape wholesale; shapes are never edited in place.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn validate(&self) -> ShapeResult<()> {
        ensure_finite("z_rotation", self.rotation.z)?;
        ensure_finite("x_rotation", self.rotation.x)?;
        Ok(())
    }
}

/// A stroked run of canvas points.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub points: Vec<Point2<f32>>,
    /// Closed paths join their last point back to the first.
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillPolygon {
        points: Vec<Point2<f32>>,
        color: Rgb,
    },
    StrokePaths {
        paths: Vec<Path>,
        color: Rgb,
        width: f32,
    },
}

/// Commands in paint order: face fills in mesh order, then one stroke batch.
///
/// There is no depth sort; culling alone keeps the fills from overlapping
/// wrongly on convex shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn fills(&self) -> impl Iterator<Item = (&[Point2<f32>], Rgb)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillPolygon { points, color } => Some((points.as_slice(), *color)),
            DrawCommand::StrokePaths { .. } => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&[Path], Rgb, f32)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::StrokePaths {
                paths,
                color,
                width,
            } => Some((paths.as_slice(), *color, *width)),
            DrawCommand::FillPolygon { .. } => None,
        })
    }
}

/// Intermediate result of one frame, before conversion to draw commands.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame<'a> {
    /// Every vertex in canvas space; x and z are the canvas coordinates.
    pub screen: &'a [Vec4],
    /// Faces surviving both culling passes, carrying their shaded color.
    pub faces: Vec<FaceEntry<Rgb>>,
    /// Edges with at least one surviving face.
    pub edges: Vec<Edge>,
    /// Faces dropped by either pass.
    pub removed: HashSet<usize>,
}

fn canvas_point(v: &Vec4) -> Point2<f32> {
    Point2::new(v[0], v[2])
}

/// Software renderer owning its per-frame scratch buffers.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
    world: Vec<Vec4>,
    screen: Vec<Vec4>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> ShapeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            world: Vec::new(),
            screen: Vec::new(),
        })
    }

    /// Run transforms, both culling passes and shading for one frame.
    pub fn frame(&mut self, scene: &Scene, viewport: &Viewport) -> ShapeResult<RenderFrame<'_>> {
        scene.validate()?;
        let shape = &scene.shape;
        let camera = &self.config.camera;

        let world = camera.world_transform(&scene.rotation);
        transform_points_into(shape.vertices(), &world, &mut self.world);
        let normals = transform_normals(shape.normals(), &world);

        let mut removed = HashSet::new();
        let faces = normals
            .into_iter()
            .enumerate()
            .map(|(i, normal)| FaceEntry::new(i, normal, ()))
            .collect();
        let faces = cull_faces(faces, Facing::WORLD, &mut removed);
        let edges = cull_edges(shape.edges(), &removed);

        let light = &self.config.light;
        let faces: Vec<_> = faces
            .into_iter()
            .map(|face| {
                let color = light.shade(scene.color, &face.normal);
                FaceEntry::new(face.index, face.normal, color)
            })
            .collect();

        self.screen.clear();
        self.screen.extend_from_slice(&self.world);
        camera.project(&mut self.screen);
        let to_canvas = camera.screen_transform(viewport);
        for v in self.screen.iter_mut() {
            *v = *v * to_canvas;
        }
        if let Some(i) = self.screen.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return Err(ShapeError::degenerate(format!(
                "vertex {i} projects outside the representable range"
            )));
        }

        let screen = &self.screen;
        let faces = faces
            .into_iter()
            .map(|face| {
                let normal = face_normal(screen, &shape.faces()[face.index]);
                FaceEntry::new(face.index, normal, face.data)
            })
            .collect();
        let faces = cull_faces(faces, Facing::SCREEN, &mut removed);
        let edges = cull_edges(&edges, &removed);

        tracing::trace!(
            faces = faces.len(),
            edges = edges.len(),
            removed = removed.len(),
            "frame culled"
        );
        Ok(RenderFrame {
            screen,
            faces,
            edges,
            removed,
        })
    }

    pub fn render(&mut self, scene: &Scene, viewport: &Viewport) -> ShapeResult<DrawList> {
        let outline = self.config.outline;
        let frame = self.frame(scene, viewport)?;
        let faces = scene.shape.faces();

        let mut commands: Vec<DrawCommand> = frame
            .faces
            .iter()
            .map(|face| DrawCommand::FillPolygon {
                points: faces[face.index]
                    .iter()
                    .map(|&v| canvas_point(&frame.screen[v]))
                    .collect(),
                color: face.data,
            })
            .collect();

        let paths = assemble_loops(&frame.edges)
            .into_iter()
            .map(|line| Path {
                points: line
                    .vertices
                    .iter()
                    .map(|&v| canvas_point(&frame.screen[v]))
                    .collect(),
                closed: line.closed,
            })
            .collect();
        commands.push(DrawCommand::StrokePaths {
            paths,
            color: outline.color,
            width: outline.width_for(viewport.width),
        });

        Ok(DrawList { commands })
    }
}

/// Render `scene` onto a `viewport_width` x `viewport_height` canvas with the default configuration.
pub fn render(scene: &Scene, viewport_width: f32, viewport_height: f32) -> ShapeResult<DrawList> {
    let viewport = Viewport::new(viewport_width, viewport_height)?;
    Renderer::default().render(scene, &viewport)
}
