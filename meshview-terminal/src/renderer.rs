/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use log::debug;
use meshview_core::{project_to_screen, FrameUniforms, Lighting, Mesh, RenderPipeline};
use nalgebra::Vector3;
use std::io::Write;

use crate::error::RenderError;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Fraction of the light color applied regardless of orientation
const AMBIENT_STRENGTH: f32 = 0.1;

/// Pulls outline glyphs in front of the surface they lie on
const OUTLINE_DEPTH_BIAS: f32 = 1e-3;

/// One shaded screen cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Depth-tested character rasterizer for triangle meshes
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::BLANK; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        debug!("Resizing ASCII buffers to {}x{}", width, height);
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::BLANK);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Number of cells covered by geometry
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Rasterize `mesh` into the cell buffer
    pub fn render_mesh(&mut self, mesh: &Mesh, uniforms: &FrameUniforms) {
        self.clear();

        let (width, height) = (self.width as f32, self.height as f32);
        let screen: Vec<Option<(f32, f32, f32)>> = mesh
            .positions()
            .iter()
            .map(|p| project_to_screen(&uniforms.combined, p, width, height))
            .collect();

        let normal_matrix = uniforms.normal_matrix();
        let toward_light = (-uniforms.lighting.light_direction)
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);

        for (indices, normals) in mesh.triangles() {
            let corners = [
                screen[indices[0] as usize],
                screen[indices[1] as usize],
                screen[indices[2] as usize],
            ];
            // Triangles crossing the near plane are dropped whole
            let [Some(v0), Some(v1), Some(v2)] = corners else {
                continue;
            };

            let intensity = normals.map(|n| {
                let world = (normal_matrix * n)
                    .try_normalize(1e-12)
                    .unwrap_or_else(Vector3::zeros);
                AMBIENT_STRENGTH + world.dot(&toward_light).max(0.0)
            });

            self.rasterize_triangle(&[v0, v1, v2], &intensity, &uniforms.lighting);
        }

        for edge in mesh.edge_indices().chunks_exact(2) {
            if let (Some(a), Some(b)) = (screen[edge[0] as usize], screen[edge[1] as usize]) {
                self.rasterize_line(a, b);
            }
        }
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        intensity: &[f32; 3],
        lighting: &Lighting,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return; // Degenerate on screen
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let shade = w0 * intensity[0] + w1 * intensity[1] + w2 * intensity[2];
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = shade_cell(shade, lighting);
                }
            }
        }
    }

    /// Draw an outline segment, depth-tested against the filled surface
    fn rasterize_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32)) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let glyph = line_glyph(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.0 + dx * t).floor();
            let y = (a.1 + dy * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = a.2 + (b.2 - a.2) * t - OUTLINE_DEPTH_BIAS;
            let idx = y as usize * self.width + x as usize;
            if depth <= self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.cells[idx] = Cell {
                    glyph,
                    color: Color::DarkGrey,
                };
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map lighting intensity to a glyph and the lit object color
fn shade_cell(intensity: f32, lighting: &Lighting) -> Cell {
    let rgb = (lighting.light_color.component_mul(&lighting.object_color) * intensity)
        .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);

    // Index 0 is blank; covered cells always get a visible glyph
    let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
    let char_index = 1 + (intensity.clamp(0.0, 1.0) * steps).round() as usize;

    Cell {
        glyph: LUMINOSITY_RAMP[char_index],
        color: Color::Rgb {
            r: rgb.x,
            g: rgb.y,
            b: rgb.z,
        },
    }
}

fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '-'
    } else if ax <= ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        // Screen Y grows downward
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

/// `RenderPipeline` backend writing frames to a terminal (or any writer)
pub struct TerminalPipeline<W: Write> {
    renderer: AsciiRenderer,
    out: W,
    status: String,
}

impl<W: Write> TerminalPipeline<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            renderer: AsciiRenderer::new(width, height),
            out,
            status: String::new(),
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
    }

    /// Text drawn over the first row of every subsequent frame
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderPipeline for TerminalPipeline<W> {
    type Error = RenderError;

    fn draw_frame(&mut self, mesh: &Mesh, uniforms: &FrameUniforms) -> Result<(), RenderError> {
        self.renderer.render_mesh(mesh, uniforms);
        self.renderer.draw(&mut self.out)?;

        if !self.status.is_empty() {
            let status: String = self.status.chars().take(self.renderer.width).collect();
            self.out.queue(cursor::MoveTo(0, 0))?;
            self.out.queue(SetForegroundColor(Color::Yellow))?;
            self.out.queue(Print(status))?;
            self.out.queue(ResetColor)?;
        }

        self.out.flush()?;
        Ok(())
    }
}
