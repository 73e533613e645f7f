use crate::core::Color;
use crate::debug_print;
use crate::pipeline::{ClipLine, Fragment};
use glam::{IVec2, Vec3};
use rayon::prelude::*;

/// A line in screen space. `x`/`y` are pixel coordinates, `z` is NDC depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenLine {
    pub start: Vec3,
    pub end: Vec3,
}

pub struct Rasterizer {
    width: usize,
    height: usize,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Perspective divide and viewport mapping. NDC +Y maps to the top row.
    pub fn project_to_screen(&self, line: &ClipLine) -> ScreenLine {
        ScreenLine {
            start: self.ndc_to_screen(line.start.truncate() / line.start.w),
            end: self.ndc_to_screen(line.end.truncate() / line.end.w),
        }
    }

    fn ndc_to_screen(&self, ndc: Vec3) -> Vec3 {
        let w = self.width as f32;
        let h = self.height as f32;
        // clamp bounds stay ordered for an empty viewport
        let (max_x, max_y) = ((w - 1.0).max(0.0), (h - 1.0).max(0.0));
        Vec3::new(
            ((ndc.x + 1.0) * 0.5 * w).floor().clamp(0.0, max_x),
            ((1.0 - ndc.y) * 0.5 * h).floor().clamp(0.0, max_y),
            ndc.z,
        )
    }

    /// Modifies the fragment buffer in place
    pub fn rasterize(&self, lines: &[ScreenLine], color: Color, frags: &mut Vec<Fragment>) {
        frags.clear();
        debug_print!("Rasterizing {} lines", lines.len());

        frags.par_extend(
            lines
                .par_iter()
                .flat_map_iter(|line| self.rasterize_line(line, color)),
        );

        debug_print!("Generated {} fragments", frags.len());
    }

    fn rasterize_line(&self, line: &ScreenLine, color: Color) -> Vec<Fragment> {
        let start = IVec2::new(line.start.x as i32, line.start.y as i32);
        let end = IVec2::new(line.end.x as i32, line.end.y as i32);
        let (w, h) = (self.width as i32, self.height as i32);

        let mut fragments = Vec::new();
        bresenham(start, end, |pos, t| {
            if pos.x >= 0 && pos.x < w && pos.y >= 0 && pos.y < h {
                fragments.push(Fragment {
                    screen_pos: pos.as_uvec2(),
                    depth: line.start.z + (line.end.z - line.start.z) * t,
                    color,
                });
            }
        });
        fragments
    }
}

/// Integer line walk from `start` to `end`, both inclusive.
/// `plot` receives each pixel and how far along the line it is, in [0, 1].
pub fn bresenham<F>(start: IVec2, end: IVec2, mut plot: F)
where
    F: FnMut(IVec2, f32),
{
    let (mut x0, mut y0) = (start.x, start.y);
    let (x1, y1) = (end.x, end.y);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let steps = dx.max(-dy);
    let mut step = 0;

    loop {
        let t = if steps == 0 {
            0.0
        } else {
            step as f32 / steps as f32
        };
        plot(IVec2::new(x0, y0), t);

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
        step += 1;
    }
}
