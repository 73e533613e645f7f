use glam::Vec3;

use crate::config::Config;
use crate::core::{Camera, Color, Cube};

/// Eye position of the default camera, looking at the origin
pub const DEFAULT_EYE: Vec3 = Vec3::new(200.0, 200.0, 200.0);

#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub cube: Cube,
    pub line_color: Color,
    pub clear_color: Color,
}

impl Scene {
    pub fn new(camera: Camera, cube: Cube) -> Self {
        Self {
            camera,
            cube,
            line_color: Color::BLACK,
            clear_color: Color::WHITE,
        }
    }

    /// Origin-centered cube seen from [`DEFAULT_EYE`].
    pub fn from_config(config: &Config, aspect_ratio: f32) -> Self {
        let camera = Camera::new(DEFAULT_EYE, Vec3::ZERO, aspect_ratio);
        let cube = Cube::new(Vec3::ZERO, config.edge_length);
        Self {
            camera,
            cube,
            line_color: config.line_color,
            clear_color: config.clear_color,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::from_config(&Config::default(), 1.0)
    }
}
