use glam::Vec4;

/// Frustum planes in clip space, as `plane · p >= 0` for points inside.
/// Order: left, right, bottom, top, near, far.
pub const FRUSTUM_PLANES: [Vec4; 6] = [
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(-1.0, 0.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(0.0, -1.0, 0.0, 1.0),
    Vec4::new(0.0, 0.0, 1.0, 1.0),
    Vec4::new(0.0, 0.0, -1.0, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipLine {
    pub start: Vec4,
    pub end: Vec4,
}

impl ClipLine {
    pub fn new(start: Vec4, end: Vec4) -> Self {
        Self { start, end }
    }
}

/// Liang-Barsky line clipper working on homogeneous coordinates, so segments
/// that cross the eye plane are cut at the near plane before the w divide.
pub struct Clipper {
    planes: [Vec4; 6],
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Self {
            planes: FRUSTUM_PLANES,
        }
    }

    /// Returns the visible part of `line`, or `None` when nothing is left.
    pub fn clip_line(&self, line: &ClipLine) -> Option<ClipLine> {
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;

        for plane in &self.planes {
            let d0 = plane.dot(line.start);
            let d1 = plane.dot(line.end);

            if d0 < 0.0 && d1 < 0.0 {
                return None;
            }
            if d0 >= 0.0 && d1 >= 0.0 {
                continue;
            }

            let t = d0 / (d0 - d1);
            if d0 < 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
            if t_enter > t_exit {
                return None;
            }
        }

        let clipped = ClipLine {
            start: line.start.lerp(line.end, t_enter),
            end: line.start.lerp(line.end, t_exit),
        };

        // Only reachable for a segment touching the eye point itself
        if clipped.start.w <= f32::EPSILON || clipped.end.w <= f32::EPSILON {
            return None;
        }
        Some(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn keeps_lines_fully_inside() {
        let line = ClipLine::new(Vec4::new(-0.5, 0.0, 0.0, 1.0), Vec4::new(0.5, 0.2, 0.1, 1.0));
        assert_eq!(Clipper::new().clip_line(&line), Some(line));
    }

    #[test]
    fn drops_lines_fully_outside() {
        let line = ClipLine::new(Vec4::new(2.0, 0.0, 0.0, 1.0), Vec4::new(3.0, 0.5, 0.0, 1.0));
        assert_eq!(Clipper::new().clip_line(&line), None);
    }

    #[test]
    fn cuts_at_the_right_plane() {
        let line = ClipLine::new(Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(2.0, 0.0, 0.0, 1.0));
        let clipped = Clipper::new().clip_line(&line).unwrap();
        assert!(clipped.start.abs_diff_eq(line.start, EPS));
        assert!(clipped.end.abs_diff_eq(Vec4::new(1.0, 0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn cuts_segments_crossing_behind_the_eye() {
        // GL-style clip coordinates: start in front of the camera, end behind it (w < 0)
        let line = ClipLine::new(Vec4::new(0.0, 0.0, 0.0, 2.0), Vec4::new(0.0, 0.0, -4.0, -2.0));
        let clipped = Clipper::new().clip_line(&line).unwrap();
        assert!(clipped.end.w > 0.0);
        // ends on the near plane, z == -w
        assert!((clipped.end.z + clipped.end.w).abs() < EPS);
    }

    #[test]
    fn drops_diagonal_that_misses_the_corner() {
        // leaves through the right plane before it ever gets below the top plane
        let line = ClipLine::new(Vec4::new(0.5, 1.8, 0.0, 1.0), Vec4::new(1.8, 0.5, 0.0, 1.0));
        assert_eq!(Clipper::new().clip_line(&line), None);
    }
}
