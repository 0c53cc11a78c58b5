/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use shapes_core::render::{DrawCommand, DrawList, Path};
use shapes_core::{Rgb, ShapeResult, Viewport};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide.
pub const PIXELS_PER_ROW: f32 = 2.0;

/// One painted character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Rgb,
}

/// Rasterizes draw lists onto a grid of colored characters.
///
/// The draw list is computed for a canvas one pixel per column wide and
/// [`PIXELS_PER_ROW`] pixels per row tall, so shapes keep their aspect.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Canvas size to render draw lists at for this grid.
    pub fn viewport(&self) -> ShapeResult<Viewport> {
        Viewport::new(self.width as f32, self.height as f32 * PIXELS_PER_ROW)
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            None
        }
    }

    /// Paint commands in order; later commands overwrite earlier ones.
    pub fn paint(&mut self, list: &DrawList) {
        for command in &list.commands {
            match command {
                DrawCommand::FillPolygon { points, color } => {
                    let points: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
                    self.fill_polygon(&points, *color);
                }
                DrawCommand::StrokePaths { paths, color, .. } => {
                    for path in paths {
                        self.stroke_path(path, *color);
                    }
                }
            }
        }
    }

    /// Even-odd fill sampled at cell centres.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let ch = ramp_char(color);

        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let first_row = (min_y / PIXELS_PER_ROW).floor().max(0.0) as usize;
        let last_row = ((max_y / PIXELS_PER_ROW).ceil().max(0.0) as usize).min(self.height);

        for y in first_row..last_row {
            let py = (y as f32 + 0.5) * PIXELS_PER_ROW;
            for x in 0..self.width {
                if contains(points, (x as f32 + 0.5, py)) {
                    self.cells[y * self.width + x] = Some(Cell { ch, color });
                }
            }
        }
    }

    pub fn stroke_path(&mut self, path: &Path, color: Rgb) {
        let points = &path.points;
        let segments = if path.closed {
            points.len()
        } else {
            points.len().saturating_sub(1)
        };
        for k in 0..segments {
            let (a, b) = (points[k], points[(k + 1) % points.len()]);
            self.draw_line((a.x, a.y), (b.x, b.y), color);
        }
    }

    /// DDA line in cell units.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb) {
        let (x0, y0) = (from.0, from.1 / PIXELS_PER_ROW);
        let (dx, dy) = (to.0 - from.0, (to.1 - from.1) / PIXELS_PER_ROW);
        let ch = slope_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (x, y) = ((x0 + t * dx).floor(), (y0 + t * dy).floor());
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if x < self.width && y < self.height {
                self.cells[y * self.width + x] = Some(Cell { ch, color });
            }
        }
    }

    /// Rows of the grid as plain text, without colors.
    pub fn to_lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.map_or(' ', |c| c.ch)).collect())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                match self.cells[y * self.width + x] {
                    Some(Cell { ch, color }) => {
                        writer.queue(SetForegroundColor(Color::Rgb {
                            r: color.r,
                            g: color.g,
                            b: color.b,
                        }))?;
                        writer.queue(Print(ch))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
            writer.queue(ResetColor)?;
            writer.queue(Print('\n'))?;
        }
        Ok(())
    }
}

/// Map a fill color to a ramp character, never the blank one.
fn ramp_char(color: Rgb) -> char {
    let top = LUMINOSITY_RAMP.len() - 1;
    let index = 1 + (color.luminance() * (top - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(top)]
}

/// Pick a line character by direction; y grows downwards.
fn slope_char(dx: f32, dy: f32) -> char {
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Even-odd point-in-polygon test.
fn contains(points: &[(f32, f32)], p: (f32, f32)) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.1 > p.1) != (b.1 > p.1) {
            let x = a.0 + (p.1 - a.1) / (b.1 - a.1) * (b.0 - a.0);
            if p.0 < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapes_core::render::Point2;
    use shapes_core::{box_shape, render, Scene};

    #[test]
    fn test_fill_square() {
        let mut grid = AsciiRenderer::new(10, 5);
        grid.fill_polygon(&[(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)], Rgb::WHITE);

        assert_eq!(grid.cell(2, 1).map(|c| c.ch), Some('@'));
        assert_eq!(grid.cell(7, 3).map(|c| c.color), Some(Rgb::WHITE));
        assert_eq!(grid.cell(1, 1), None);
        assert_eq!(grid.cell(8, 1), None);
        assert_eq!(grid.cell(4, 0), None);
        assert_eq!(grid.cell(4, 4), None);
    }

    #[test]
    fn test_dark_fill_is_visible() {
        assert_eq!(ramp_char(Rgb::BLACK), '.');
        assert_eq!(ramp_char(Rgb::WHITE), '@');
    }

    #[test]
    fn test_contains_concave() {
        let l_shape = [(0.0, 0.0), (4.0, 0.0), (4.0, 1.0), (1.0, 1.0), (1.0, 4.0), (0.0, 4.0)];
        assert!(contains(&l_shape, (0.5, 3.0)));
        assert!(contains(&l_shape, (3.0, 0.5)));
        assert!(!contains(&l_shape, (3.0, 3.0)));
    }

    #[test]
    fn test_stroke_characters() {
        let mut grid = AsciiRenderer::new(10, 10);
        let path = Path {
            points: vec![
                Point2::new(0.5, 1.0),
                Point2::new(9.5, 1.0),
            ],
            closed: false,
        };
        grid.stroke_path(&path, Rgb::BLACK);
        assert_eq!(grid.to_lines()[0], "----------");
        assert_eq!(slope_char(0.0, 3.0), '|');
        assert_eq!(slope_char(2.0, 2.0), '\\');
        assert_eq!(slope_char(2.0, -2.0), '/');
    }

    #[test]
    fn test_paint_box_front() {
        let mut grid = AsciiRenderer::new(40, 20);
        let viewport = grid.viewport().unwrap();
        let scene = Scene::new(box_shape().unwrap()).with_rotation(0.0, 0.0);
        let list = render(&scene, viewport.width, viewport.height).unwrap();
        grid.paint(&list);

        // front face spans 10..30 on both axes in pixels; rows are 2 px tall
        let centre = grid.cell(20, 10).unwrap();
        assert_ne!(centre.ch, ' ');
        assert_ne!(centre.color, Rgb::BLACK);
        assert_eq!(grid.cell(2, 2), None);
        assert!(grid.to_lines().iter().all(|l| l.chars().count() == 40));
    }

    #[test]
    fn test_draw_writes_every_row() {
        let mut grid = AsciiRenderer::new(4, 3);
        grid.fill_polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 6.0), (0.0, 6.0)], Rgb::NAVY);
        let mut out = Vec::new();
        grid.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\n').count(), 3);

        grid.clear();
        assert!(grid.to_lines().iter().all(|l| l.trim().is_empty()));
    }
}
