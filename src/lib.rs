use std::{
    fmt::Display,
    time::{Duration, Instant},
};

pub mod config;
pub mod core;
pub mod input;
pub mod pipeline;
pub mod util;

pub use config::{Config, DisplayTarget};
pub use self::core::{Camera, Color, Cube, Scene};
pub use util::format_mat4;

/// Frame timing, summarised to the log once per second.
pub struct Metrics {
    pub frame_time: Duration,
    pub fps_counter: u32,
    pub fps_update_timer: Instant,
    pub current_fps: f32,
    pub frame_times: Vec<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    const WINDOW: usize = 120;

    pub fn new() -> Self {
        Self {
            frame_time: Duration::from_secs_f32(1.0 / 60.0),
            fps_counter: 0,
            fps_update_timer: Instant::now(),
            current_fps: 0.0,
            frame_times: Vec::with_capacity(Self::WINDOW),
        }
    }

    pub fn update(&mut self, frame_delta: Duration) {
        self.fps_counter += 1;
        self.frame_times.push(frame_delta.as_secs_f32() * 1000.0);
        if self.frame_times.len() > Self::WINDOW {
            self.frame_times.remove(0);
        }

        let elapsed = self.fps_update_timer.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.current_fps = self.fps_counter as f32 / elapsed.as_secs_f32();
            self.fps_counter = 0;
            self.fps_update_timer = Instant::now();

            let avg_ms = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
            self.frame_time = Duration::from_secs_f32(avg_ms / 1000.0);
            log::debug!("{}", self);
        }
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.current_fps,
            self.frame_time.as_secs_f32() * 1000.0,
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}

pub static DEBUG_PIPELINE: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

/// Per-frame pipeline tracing, routed to the log at trace level when `--debug` is set.
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        if $crate::DEBUG_PIPELINE.load(std::sync::atomic::Ordering::Relaxed) {
            log::trace!($($arg)*);
        }
    };
}
