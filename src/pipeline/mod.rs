use std::{cell::RefCell, io, time::Duration};

use glam::{UVec2, Vec4};
use minifb::Window;

use crate::{core::Color, core::Scene, debug_print, Metrics};

pub mod buffer;
pub mod clipper;
pub mod rasterizer;

pub use buffer::{Buffer, FrameBuffer, TermBuffer};
pub use clipper::{ClipLine, Clipper};
pub use rasterizer::{Rasterizer, ScreenLine};

#[derive(Clone, Debug)]
pub struct Fragment {
    pub screen_pos: UVec2,
    /// NDC depth, -1 at the near plane
    pub depth: f32,
    pub color: Color,
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            screen_pos: UVec2::ZERO,
            depth: f32::INFINITY,
            color: Color::BLACK,
        }
    }
}

/// Software wireframe pipeline drawing the scene's cube into double-buffered targets.
///
/// Per frame:
/// - every cube edge goes to clip space and is clipped against the frustum
/// - surviving edges are divided by w and mapped to the viewport
/// - lines are rasterized to depth-tested fragments in the back buffer
/// - the buffers swap and the finished frame is presented
pub struct Pipeline<B: Buffer> {
    pub width: usize,
    pub height: usize,
    front_buffer: RefCell<B>,
    back_buffer: RefCell<B>,
    pub scene: Scene,
    clipper: Clipper,
    rasterizer: Rasterizer,
    lines: RefCell<Vec<ScreenLine>>,
    fragments: RefCell<Vec<Fragment>>,
    metrics: Metrics,
}

impl<B: Buffer> Pipeline<B> {
    pub fn new(width: usize, height: usize, scene: Scene) -> Self {
        let clear = scene.clear_color;
        Self {
            width,
            height,
            front_buffer: RefCell::new(B::new(width, height, clear)),
            back_buffer: RefCell::new(B::new(width, height, clear)),
            scene,
            clipper: Clipper::new(),
            rasterizer: Rasterizer::new(width, height),
            lines: RefCell::new(Vec::with_capacity(12)),
            fragments: RefCell::new(Vec::with_capacity(4096)),
            metrics: Metrics::new(),
        }
    }

    pub fn front_buffer(&self) -> &RefCell<B> {
        &self.front_buffer
    }

    /// Reallocate both buffers for a new target size and update the camera aspect.
    pub fn resize(&mut self, width: usize, height: usize, aspect_ratio: f32) {
        let clear = self.scene.clear_color;
        self.width = width;
        self.height = height;
        self.front_buffer = RefCell::new(B::new(width, height, clear));
        self.back_buffer = RefCell::new(B::new(width, height, clear));
        self.rasterizer = Rasterizer::new(width, height);
        self.scene.camera.set_aspect(aspect_ratio);
        log::debug!(
            "Pipeline resized to {}x{} (aspect {:.3})",
            width,
            height,
            aspect_ratio
        );
    }

    /// Render one frame and present it.
    /// Goes to `window` when given, otherwise through [`Buffer::present`].
    pub fn render_frame(&self, window: Option<&mut Window>) -> io::Result<()> {
        self.draw_frame();

        if let Some(window) = window {
            self.front_buffer.borrow().present_window(window)
        } else {
            self.front_buffer.borrow().present()
        }
    }

    /// Draw the scene into the back buffer and swap it to the front.
    pub fn draw_frame(&self) {
        self.back_buffer.borrow_mut().clear(self.scene.clear_color);

        self.process_geometry();
        self.rasterize();
        self.process_fragments(&self.fragments.borrow());

        self.swap_buffers();
    }

    /// Transform, clip and project every cube edge into screen-space lines.
    pub fn process_geometry(&self) {
        let mut lines = self.lines.borrow_mut();
        lines.clear();
        // a minimised terminal has no cells to draw into
        if self.width == 0 || self.height == 0 {
            return;
        }

        let view_proj = self.scene.camera.view_projection();

        for (a, b) in self.scene.cube.edges() {
            let clip = ClipLine::new(
                view_proj * Vec4::from((a, 1.0)),
                view_proj * Vec4::from((b, 1.0)),
            );
            match self.clipper.clip_line(&clip) {
                Some(visible) => lines.push(self.rasterizer.project_to_screen(&visible)),
                None => debug_print!("Edge {:?} -> {:?} fully clipped", a, b),
            }
        }
        debug_print!("{} of 12 edges visible", lines.len());
    }

    pub fn rasterize(&self) {
        self.rasterizer.rasterize(
            &self.lines.borrow(),
            self.scene.line_color,
            &mut self.fragments.borrow_mut(),
        );
    }

    pub fn process_fragments(&self, fragments: &[Fragment]) {
        let mut buffer = self.back_buffer.borrow_mut();
        for fragment in fragments {
            let pixel = B::create_pixel(fragment.color);
            buffer.set_pixel(fragment.screen_pos, fragment.depth, pixel);
        }
    }

    pub fn swap_buffers(&self) {
        std::mem::swap(
            &mut *self.front_buffer.borrow_mut(),
            &mut *self.back_buffer.borrow_mut(),
        );
    }

    pub fn update_metrics(&mut self, frame_delta: Duration) {
        self.metrics.update(frame_delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::pixel::FULL_BLOCK;
    use glam::Vec3;

    fn count_color(buf: &FrameBuffer, color: Color) -> usize {
        let packed = color.to_u32();
        buf.data.iter().filter(|&&p| p == packed).count()
    }

    fn default_pipeline() -> Pipeline<FrameBuffer> {
        Pipeline::new(512, 512, Scene::from_config(&Config::default(), 1.0))
    }

    #[test]
    fn draws_black_edges_on_white() {
        let pipeline = default_pipeline();
        pipeline.render_frame(None).unwrap();

        let front = pipeline.front_buffer().borrow();
        let black = count_color(&front, Color::BLACK);
        let white = count_color(&front, Color::WHITE);
        assert!(black > 100, "only {} edge pixels", black);
        assert_eq!(black + white, 512 * 512);
        // the cube sits in the middle of the view, the border stays clear
        assert_eq!(front.color_at(UVec2::new(0, 0)), Some(Color::WHITE));
        assert_eq!(front.color_at(UVec2::new(511, 511)), Some(Color::WHITE));
    }

    #[test]
    fn all_edges_visible_by_default() {
        let pipeline = default_pipeline();
        pipeline.process_geometry();
        assert_eq!(pipeline.lines.borrow().len(), 12);
    }

    #[test]
    fn cube_moved_behind_camera_draws_nothing() {
        let mut pipeline = default_pipeline();
        pipeline.scene.cube.translate(Vec3::splat(400.0));
        pipeline.render_frame(None).unwrap();
        assert_eq!(count_color(&pipeline.front_buffer().borrow(), Color::BLACK), 0);
    }

    #[test]
    fn translation_moves_the_drawing() {
        let mut pipeline = default_pipeline();
        pipeline.render_frame(None).unwrap();
        let before = pipeline.front_buffer().borrow().data.clone();

        pipeline.scene.cube.translate(Vec3::new(30.0, 0.0, 0.0));
        pipeline.render_frame(None).unwrap();
        assert_ne!(pipeline.front_buffer().borrow().data, before);
    }

    #[test]
    fn resize_reallocates_buffers() {
        let mut pipeline = default_pipeline();
        pipeline.resize(80, 24, 80.0 / 48.0);
        pipeline.render_frame(None).unwrap();
        let front = pipeline.front_buffer().borrow();
        assert_eq!(front.data.len(), 80 * 24);
        assert!((pipeline.scene.camera.aspect_ratio() - 80.0 / 48.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_target_renders_nothing() {
        let mut pipeline = default_pipeline();
        pipeline.resize(0, 24, 0.0);
        pipeline.render_frame(None).unwrap();
        assert!(pipeline.lines.borrow().is_empty());
        assert!(pipeline.front_buffer().borrow().data.is_empty());

        pipeline.resize(80, 0, 1.0);
        pipeline.render_frame(None).unwrap();
        assert!(pipeline.lines.borrow().is_empty());
    }

    #[test]
    fn terminal_target_draws_blocks_in_line_color() {
        let (w, h) = (80, 24);
        let scene = Scene::from_config(&Config::default(), w as f32 * 0.5 / h as f32);
        let pipeline = Pipeline::<TermBuffer>::new(w, h, scene);
        pipeline.draw_frame();

        let front = pipeline.front_buffer().borrow();
        let lit: Vec<_> = front.data.iter().filter(|p| p.ch == FULL_BLOCK).collect();
        assert!(lit.len() > 12, "only {} lit cells", lit.len());
        assert!(lit.iter().all(|p| p.color == Color::BLACK));
        assert_eq!(front.data[0].ch, ' ');
        assert_eq!(front.color_at(UVec2::new(79, 23)), Some(Color::WHITE));
    }
}
