use crate::core::{Color, Pixel};
use crossterm::{
    cursor::{Hide, MoveTo},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use glam::UVec2;
use minifb::Window;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSliceMut;
use std::io::{self, stdout, Write};

/// Render target with a depth buffer. Smaller depth wins.
pub trait Buffer {
    type Pixel: Clone + Send + Sync;

    fn new(width: usize, height: usize, clear_color: Color) -> Self
    where
        Self: Sized;
    fn clear(&mut self, clear_color: Color);
    fn create_pixel(color: Color) -> Self::Pixel;
    fn set_pixel(&mut self, pos: UVec2, depth: f32, pixel: Self::Pixel);
    fn color_at(&self, pos: UVec2) -> Option<Color>;
    fn present(&self) -> io::Result<()> {
        Ok(()) // Default does nothing
    }
    fn present_window(&self, _window: &mut Window) -> io::Result<()> {
        Ok(()) // Default implementation does nothing
    }
}

fn index_of(pos: UVec2, width: usize, height: usize) -> Option<usize> {
    let (x, y) = (pos.x as usize, pos.y as usize);
    (x < width && y < height).then_some(x + y * width)
}

fn clear_depth(depth: &mut [f32]) {
    depth.par_chunks_mut(1024).for_each(|chunk| {
        for d in chunk {
            *d = f32::INFINITY;
        }
    });
}

pub struct TermBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Pixel>,
    pub depth: Vec<f32>,
    background: Color,
}

impl TermBuffer {
    /// Queue the whole frame on `out`, one cursor move per row. Runs of cells
    /// with the same color share a single color change.
    pub fn write_frame<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut last_color = None;

        queue!(out, Hide, SetBackgroundColor(self.background.to_crossterm_color()))?;

        for (y, row) in self.data.chunks(self.width.max(1)).enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            let mut x = 0;
            while x < row.len() {
                let color = row[x].color;
                if last_color != Some(color) {
                    queue!(out, SetForegroundColor(color.to_crossterm_color()))?;
                    last_color = Some(color);
                }
                let run: String = row[x..]
                    .iter()
                    .take_while(|p| p.color == color)
                    .map(|p| p.ch)
                    .collect();
                x += run.chars().count();
                queue!(out, Print(run))?;
            }
        }

        queue!(out, ResetColor)
    }
}

impl Buffer for TermBuffer {
    type Pixel = Pixel;

    fn new(width: usize, height: usize, clear_color: Color) -> Self {
        TermBuffer {
            width,
            height,
            data: vec![Pixel::blank(clear_color); width * height],
            depth: vec![f32::INFINITY; width * height],
            background: clear_color,
        }
    }

    fn clear(&mut self, clear_color: Color) {
        self.background = clear_color;
        self.data.par_chunks_mut(1024).for_each(|chunk| {
            for point in chunk {
                point.reset(clear_color);
            }
        });
        clear_depth(&mut self.depth);
    }

    fn create_pixel(color: Color) -> Self::Pixel {
        Pixel::full(color)
    }

    fn set_pixel(&mut self, pos: UVec2, depth: f32, pixel: Self::Pixel) {
        if let Some(index) = index_of(pos, self.width, self.height) {
            if depth < self.depth[index] {
                self.data[index] = pixel;
                self.depth[index] = depth;
            }
        }
    }

    fn color_at(&self, pos: UVec2) -> Option<Color> {
        index_of(pos, self.width, self.height).map(|i| self.data[i].color)
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout().lock();
        self.write_frame(&mut stdout)?;
        stdout.flush()
    }
}

pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
    pub depth: Vec<f32>,
}

impl Buffer for FrameBuffer {
    type Pixel = u32;

    fn new(width: usize, height: usize, clear_color: Color) -> Self {
        let buf_size = width * height;
        FrameBuffer {
            width,
            height,
            data: vec![clear_color.to_u32(); buf_size],
            depth: vec![f32::INFINITY; buf_size],
        }
    }

    fn clear(&mut self, clear_color: Color) {
        let packed = clear_color.to_u32();
        self.data.par_chunks_mut(1024).for_each(|chunk| {
            for point in chunk {
                *point = packed;
            }
        });
        clear_depth(&mut self.depth);
    }

    fn create_pixel(color: Color) -> Self::Pixel {
        color.to_u32()
    }

    fn set_pixel(&mut self, pos: UVec2, depth: f32, pixel: Self::Pixel) {
        if let Some(index) = index_of(pos, self.width, self.height) {
            if depth < self.depth[index] {
                self.data[index] = pixel;
                self.depth[index] = depth;
            }
        }
    }

    fn color_at(&self, pos: UVec2) -> Option<Color> {
        index_of(pos, self.width, self.height).map(|i| {
            let packed = self.data[i];
            Color::new(
                ((packed >> 16) & 0xFF) as f32 / 255.0,
                ((packed >> 8) & 0xFF) as f32 / 255.0,
                (packed & 0xFF) as f32 / 255.0,
            )
        })
    }

    fn present_window(&self, window: &mut Window) -> io::Result<()> {
        window
            .update_with_buffer(&self.data, self.width, self.height)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_keeps_nearest() {
        let mut buf = FrameBuffer::new(4, 4, Color::WHITE);
        let pos = UVec2::new(1, 2);
        buf.set_pixel(pos, 0.5, FrameBuffer::create_pixel(Color::RED));
        buf.set_pixel(pos, 0.9, FrameBuffer::create_pixel(Color::BLUE));
        assert_eq!(buf.color_at(pos), Some(Color::RED));
        buf.set_pixel(pos, -0.2, FrameBuffer::create_pixel(Color::GREEN));
        assert_eq!(buf.color_at(pos), Some(Color::GREEN));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buf = FrameBuffer::new(4, 4, Color::WHITE);
        buf.set_pixel(UVec2::new(4, 0), 0.0, 0);
        buf.set_pixel(UVec2::new(0, 9), 0.0, 0);
        assert!(buf.data.iter().all(|&p| p == Color::WHITE.to_u32()));
        assert_eq!(buf.color_at(UVec2::new(4, 0)), None);
    }

    #[test]
    fn clear_resets_color_and_depth() {
        let mut buf = FrameBuffer::new(3, 3, Color::WHITE);
        buf.set_pixel(UVec2::ZERO, 0.0, FrameBuffer::create_pixel(Color::BLACK));
        buf.clear(Color::WHITE);
        assert_eq!(buf.color_at(UVec2::ZERO), Some(Color::WHITE));
        assert!(buf.depth.iter().all(|d| d.is_infinite()));
    }

    fn queued(cmd: impl crossterm::Command) -> String {
        let mut out = Vec::new();
        queue!(out, cmd).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn term_buffer_batches_runs_of_color() {
        let mut buf = TermBuffer::new(3, 1, Color::BLACK);
        buf.set_pixel(UVec2::new(1, 0), 0.0, TermBuffer::create_pixel(Color::WHITE));
        buf.set_pixel(UVec2::new(2, 0), 0.0, TermBuffer::create_pixel(Color::WHITE));

        let mut out = Vec::new();
        buf.write_frame(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        let black = queued(SetForegroundColor(Color::BLACK.to_crossterm_color()));
        let white = queued(SetForegroundColor(Color::WHITE.to_crossterm_color()));
        assert!(out.contains(&queued(MoveTo(0, 0))));
        assert!(out.contains(&format!("{} {}██", black, white)));
        assert_eq!(out.matches(&white).count(), 1);
    }

    #[test]
    fn empty_term_buffer_writes_no_rows() {
        let buf = TermBuffer::new(0, 0, Color::BLACK);
        let mut out = Vec::new();
        buf.write_frame(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains(&queued(MoveTo(0, 0))));
    }
}
