use glam::{Mat4, Quat, Vec3};

/// Vertical field of view in degrees
pub const DEFAULT_FOV: f32 = 45.0;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 400.0;

/// Fixed look-at camera with a right-handed perspective projection.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    initial_eye: Vec3,
    /// Vertical FOV in degrees
    pub fov: f32,
    aspect_ratio: f32,
    /// Anything closer than this is clipped
    pub near: f32,
    /// Anything beyond this is clipped
    pub far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect_ratio: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            initial_eye: eye,
            fov: DEFAULT_FOV,
            aspect_ratio,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn set_aspect(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// OpenGL-style projection, NDC depth in [-1, 1]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Swing the eye around the world Y axis through the target.
    pub fn orbit(&mut self, angle: f32) {
        let offset = self.eye - self.target;
        self.eye = self.target + Quat::from_rotation_y(angle) * offset;
    }

    pub fn reset(&mut self) {
        self.eye = self.initial_eye;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn default_camera() -> Camera {
        Camera::new(Vec3::splat(200.0), Vec3::ZERO, 1.0)
    }

    #[test]
    fn target_projects_to_ndc_origin() {
        let cam = default_camera();
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        let z = clip.z / clip.w;
        assert!(z > -1.0 && z < 1.0);
    }

    #[test]
    fn world_up_stays_up_on_screen() {
        let cam = default_camera();
        let clip = cam.view_projection() * Vec4::new(0.0, 25.0, 0.0, 1.0);
        assert!(clip.y / clip.w > 0.0);
    }

    #[test]
    fn points_behind_the_eye_have_negative_w() {
        let cam = default_camera();
        let clip = cam.view_projection() * Vec4::new(300.0, 300.0, 300.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn orbit_keeps_distance_and_reset_restores() {
        let mut cam = default_camera();
        let dist = cam.position().distance(cam.target());
        cam.orbit(0.8);
        assert!((cam.position().distance(cam.target()) - dist).abs() < 1e-3);
        assert!((cam.position().y - 200.0).abs() < 1e-3);
        cam.reset();
        assert_eq!(cam.position(), Vec3::splat(200.0));
    }

    #[test]
    fn rejects_bad_aspect() {
        let mut cam = default_camera();
        cam.set_aspect(0.0);
        cam.set_aspect(f32::NAN);
        assert_eq!(cam.aspect_ratio(), 1.0);
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect_ratio(), 2.0);
    }
}
