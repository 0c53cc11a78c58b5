/// Shapes Terminal - render one shaded frame of a solid in the terminal
///
/// Example:
///   shapes-terminal --shape double-cone --segments 12 --x-rotation -0.4
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;
use shapes_core::mesh::DEFAULT_SEGMENTS;
use shapes_core::{RenderConfig, Rgb, RotationState, Scene, ShapeKind};
use shapes_terminal::TerminalApp;
use std::io::stdout;

#[derive(Parser, Debug)]
#[command(name = "shapes-terminal", version, about = "Render a solid of revolution as ASCII art")]
struct Args {
    /// Shape to draw: box, cylinder, cone or double-cone
    #[arg(long, default_value = "box")]
    shape: ShapeKind,

    /// Sides of the cross-section polygon (ignored for box)
    #[arg(long, default_value_t = DEFAULT_SEGMENTS)]
    segments: usize,

    /// Spin about the vertical axis, in radians
    #[arg(long, allow_negative_numbers = true)]
    z_rotation: Option<f32>,

    /// Tilt towards the viewer, in radians
    #[arg(long, allow_negative_numbers = true)]
    x_rotation: Option<f32>,

    /// Base color as "r,g,b" or "#rrggbb"
    #[arg(long, default_value = "0,0,128")]
    color: Rgb,

    /// Outline color; black vanishes on dark terminals
    #[arg(long, default_value = "255,255,255")]
    outline: Rgb,

    /// Grid width in columns (defaults to the terminal width)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in rows (defaults to the terminal height minus the caption)
    #[arg(long)]
    height: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (columns, rows) = terminal::size().unwrap_or((80, 24));
    let width = args.width.unwrap_or(columns as usize);
    let height = args.height.unwrap_or((rows as usize).saturating_sub(1));

    let shape = args
        .shape
        .build(args.segments)
        .with_context(|| format!("Failed to build {}", args.shape))?;
    let home = RotationState::home();
    let scene = Scene::new(shape)
        .with_rotation(
            args.z_rotation.unwrap_or(home.z),
            args.x_rotation.unwrap_or(home.x),
        )
        .with_color(args.color);

    let mut config = RenderConfig::default();
    config.outline.color = args.outline;

    tracing::info!(shape = %args.shape, width, height, "rendering");
    let mut app = TerminalApp::new(scene, config, width, height)?;
    app.run(&mut stdout().lock())
}
