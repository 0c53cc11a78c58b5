/// Terminal front end: paints one rendered frame as colored ASCII
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use shapes_core::{RenderConfig, Renderer, Scene, ShapeResult};
use std::io::Write;

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Owns a scene and renders it onto a fixed-size character grid.
pub struct TerminalApp {
    scene: Scene,
    renderer: Renderer,
    grid: AsciiRenderer,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: RenderConfig, width: usize, height: usize) -> ShapeResult<Self> {
        Ok(Self {
            scene,
            renderer: Renderer::new(config)?,
            grid: AsciiRenderer::new(width, height),
        })
    }

    /// Render the scene into the grid and return it.
    pub fn frame(&mut self) -> ShapeResult<&AsciiRenderer> {
        let viewport = self.grid.viewport()?;
        let list = self.renderer.render(&self.scene, &viewport)?;
        tracing::debug!(commands = list.commands.len(), "painting frame");

        self.grid.clear();
        self.grid.paint(&list);
        Ok(&self.grid)
    }

    /// Render and write the frame with a one-line caption underneath.
    pub fn run<W: Write>(&mut self, writer: &mut W) -> anyhow::Result<()> {
        let caption = format!(
            "faces={} z={:.3} x={:.3} color={}",
            self.scene.shape.faces().len(),
            self.scene.rotation.z,
            self.scene.rotation.x,
            self.scene.color,
        );
        self.frame()?.draw(writer)?;
        queue!(
            writer,
            SetForegroundColor(Color::Yellow),
            Print(caption),
            ResetColor,
            Print('\n')
        )?;
        writer.flush()?;
        Ok(())
    }
}
