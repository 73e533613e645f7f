pub mod camera;
pub mod color;
pub mod cube;
pub mod pixel;
pub mod scene;

pub use camera::Camera;
pub use color::Color;
pub use cube::{Cube, CUBE_EDGES};
pub use pixel::Pixel;
pub use scene::Scene;
