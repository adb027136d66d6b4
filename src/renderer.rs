use crate::config::Config;
use crate::frame::Frame;
use crate::grid::Grid;
use crate::projector::{Shade, Slice};
use crate::viewpoint::Viewpoint;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

pub const BLACK: u32 = pack_rgb(0, 0, 0);
const WHITE: u32 = pack_rgb(255, 255, 255);
const SILVER: u32 = pack_rgb(192, 192, 192);
const GREY: u32 = pack_rgb(128, 128, 128);
const RED: u32 = pack_rgb(255, 0, 0);

const MARKER_SIZE: i32 = 10;

/// Borrowed pixel buffer, row-major `width * height`.
pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert_eq!(buf.len(), width * height);
        Self { buf, width, height }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    /// Axis-aligned filled rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let x0 = x.max(0.0).floor() as usize;
        let y0 = y.max(0.0).floor() as usize;
        let x1 = (x + w).min(self.width as f32).ceil().max(0.0) as usize;
        let y1 = (y + h).min(self.height as f32).ceil().max(0.0) as usize;
        for row in y0..y1.min(self.height) {
            let start = row * self.width;
            for px in &mut self.buf[start + x0.min(self.width)..start + x1.min(self.width)] {
                *px = color;
            }
        }
    }

    /// 1px segment (Bresenham). Endpoints far off-canvas are fine, pixels
    /// outside are skipped.
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], color: u32) {
        let (Some([mut x0, mut y0]), Some([x1, y1])) = (self.clip_point(from), self.clip_point(to))
        else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    // Rays can end absurdly far away; keep the walk bounded by pulling the
    // coordinates into a band around the canvas.
    fn clip_point(&self, p: [f32; 2]) -> Option<[i32; 2]> {
        if !(p[0].is_finite() && p[1].is_finite()) {
            return None;
        }
        let margin = (self.width.max(self.height) * 4) as f32;
        Some([
            p[0].clamp(-margin, margin).round() as i32,
            p[1].clamp(-margin, margin).round() as i32,
        ])
    }
}

fn shade_color(shade: Shade) -> u32 {
    match shade {
        Shade::Lit => WHITE,
        Shade::Dark => SILVER,
    }
}

/// One column, centered on the horizon.
pub fn draw_slice(canvas: &mut Canvas<'_>, slice: &Slice) {
    let screen_h = canvas.height as f32;
    let height = slice.height.min(screen_h);
    let top = 0.5 * screen_h - 0.5 * height;
    canvas.fill_rect(slice.column as f32, top, 1.0, height, shade_color(slice.shade));
}

/// What the overhead map needs besides the ray endpoints.
#[derive(Clone, Copy)]
pub struct MapView<'a> {
    pub grid: &'a Grid,
    pub viewpoint: &'a Viewpoint,
    pub config: &'a Config,
}

/// Top-down debug view: wall cells, the viewpoint and every cast ray.
pub fn draw_map(canvas: &mut Canvas<'_>, map: &MapView<'_>, rays: &[[f32; 2]]) {
    let scale = map.config.map_scale;
    let cell = map.config.cell_size * scale;
    for (col, row) in map.grid.walls() {
        canvas.fill_rect(col as f32 * cell, row as f32 * cell, cell, cell, GREY);
    }

    let [px, py] = map.viewpoint.origin();
    let (mx, my) = (px * scale, py * scale);
    let half = (MARKER_SIZE / 2) as f32;
    canvas.fill_rect(mx - half, my - half, MARKER_SIZE as f32, MARKER_SIZE as f32, RED);

    for end in rays {
        canvas.line([mx, my], [end[0] * scale, end[1] * scale], RED);
    }
}

/// Clear, draw every slice, then the overhead map when one is given.
pub fn render_frame(canvas: &mut Canvas<'_>, frame: &Frame, map: Option<MapView<'_>>) {
    canvas.clear(BLACK);

    for slice in &frame.slices {
        draw_slice(canvas, slice);
    }

    if let Some(map) = map {
        draw_map(canvas, &map, &frame.rays);
    }
}
