/// Shapes Core Library - geometry, projection and culling for solids of revolution
///
/// This library builds boxes, cylinders and cones as polygon meshes, runs them
/// through a fixed camera and reduces each frame to a list of 2D draw commands
/// that any front end can paint.

pub mod config;
pub mod cull;
pub mod edge_loop;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod shading;
pub mod transform;

// Re-export commonly used types
pub use config::{OutlineStyle, RenderConfig};
pub use error::{ShapeError, ShapeResult};
pub use geometry::{Edge, Face, Shape};
pub use mesh::{box_shape, cone, cylinder, double_cone, ExtrusionBuilder, ShapeKind};
pub use projection::{Camera, Viewport};
pub use render::{render, DrawCommand, DrawList, Path, Renderer, Scene};
pub use shading::{Light, Rgb};
pub use transform::{RotationState, Transform};
