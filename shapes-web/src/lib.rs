/// Shapes Web - paints rendered frames onto an HTML canvas
///
/// The page owns the animation loop and the controls; it calls `rotate` and
/// `draw` once per animation frame.
use shapes_core::mesh::DEFAULT_SEGMENTS;
use shapes_core::render::{DrawCommand, DrawList, Point2};
use shapes_core::{
    box_shape, shading, Renderer, Rgb, Scene, ShapeError, ShapeKind, ShapeResult, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn to_js(err: ShapeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
    renderer: Renderer,
}

#[wasm_bindgen]
impl WebScene {
    /// A box in the home orientation.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebScene, JsValue> {
        Ok(WebScene {
            scene: Scene::new(box_shape().map_err(to_js)?),
            renderer: Renderer::default(),
        })
    }

    /// Swap in a new shape by name; `segments` is ignored for the box.
    pub fn set_shape(&mut self, kind: &str, segments: usize) -> Result<(), JsValue> {
        self.replace_shape(kind, segments).map_err(to_js)
    }

    pub fn set_rotation(&mut self, z_rotation: f32, x_rotation: f32) {
        self.scene.rotation.z = z_rotation;
        self.scene.rotation.x = x_rotation;
    }

    /// Advance the rotation by one animation step.
    pub fn rotate(&mut self, dz: f32, dx: f32) {
        self.scene.rotation.rotate(dz, dx);
    }

    /// Accepts `r,g,b` or `#rrggbb`.
    pub fn set_color(&mut self, color: &str) -> Result<(), JsValue> {
        self.scene.color = color.parse().map_err(to_js)?;
        Ok(())
    }

    /// Current base color in CSS notation.
    pub fn color(&self) -> String {
        self.scene.color.to_string()
    }

    /// Render the scene onto the canvas with id `canvas_id`, clearing it first.
    pub fn draw(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id {canvas_id:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("Element {canvas_id:?} is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (width, height) = (canvas.width() as f32, canvas.height() as f32);
        let list = self.draw_list(width, height).map_err(to_js)?;

        context.clear_rect(0.0, 0.0, width as f64, height as f64);
        paint(&context, &list);
        Ok(())
    }
}

impl WebScene {
    fn replace_shape(&mut self, kind: &str, segments: usize) -> ShapeResult<()> {
        let kind: ShapeKind = kind.parse()?;
        self.scene.set_shape(kind.build(segments)?);
        Ok(())
    }

    fn draw_list(&mut self, width: f32, height: f32) -> ShapeResult<DrawList> {
        let viewport = Viewport::new(width, height)?;
        self.renderer.render(&self.scene, &viewport)
    }
}

/// Swatches for the page's color picker, in CSS notation.
#[wasm_bindgen]
pub fn palette() -> Vec<String> {
    shading::palette().iter().map(Rgb::to_string).collect()
}

/// Segment count the page should start its slider at.
#[wasm_bindgen]
pub fn default_segments() -> usize {
    DEFAULT_SEGMENTS
}

fn trace(context: &CanvasRenderingContext2d, points: &[Point2<f32>], closed: bool) {
    context.begin_path();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            context.move_to(p.x as f64, p.y as f64);
        } else {
            context.line_to(p.x as f64, p.y as f64);
        }
    }
    if closed {
        context.close_path();
    }
}

#[allow(deprecated)]
fn paint(context: &CanvasRenderingContext2d, list: &DrawList) {
    for command in &list.commands {
        match command {
            DrawCommand::FillPolygon { points, color } => {
                trace(context, points, true);
                context.set_fill_style(&JsValue::from_str(&color.to_string()));
                context.fill();
            }
            DrawCommand::StrokePaths {
                paths,
                color,
                width,
            } => {
                context.set_stroke_style(&JsValue::from_str(&color.to_string()));
                context.set_line_width(*width as f64);
                context.set_line_join("round");
                for path in paths {
                    trace(context, &path.points, path.closed);
                    context.stroke();
                }
            }
        }
    }
}
