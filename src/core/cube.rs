use std::fmt::{self, Display, Formatter};

use glam::{Mat3, Vec3};

/// Vertex index pairs joined by an edge. Indices follow the ordering of [`Cube::new`].
pub const CUBE_EDGES: [(usize, usize); 12] = [
    // back face (z = -half)
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    // front face (z = +half)
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    // connecting edges
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Sign pattern of each vertex relative to the center
const CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// A cube stored as eight world-space vertices that are transformed in place.
///
/// `scale` and `rotation` only record what has been applied so far; the
/// vertices themselves are the source of truth for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    center: Vec3,
    scale: Vec3,
    /// Accumulated Euler angles in radians
    rotation: Vec3,
    vertices: [Vec3; 8],
    origin: Vec3,
    edge_length: f32,
}

impl Cube {
    pub fn new(center: Vec3, edge_length: f32) -> Self {
        let half = edge_length / 2.0;
        Self {
            center,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            vertices: CORNERS.map(|corner| center + corner * half),
            origin: center,
            edge_length,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn scale_factors(&self) -> Vec3 {
        self.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn edge_length(&self) -> f32 {
        self.edge_length
    }

    pub fn vertices(&self) -> &[Vec3; 8] {
        &self.vertices
    }

    /// World-space endpoints of every edge
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        CUBE_EDGES
            .iter()
            .map(move |&(a, b)| (self.vertices[a], self.vertices[b]))
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.center += delta;
        for v in self.vertices.iter_mut() {
            *v += delta;
        }
    }

    /// Scale every vertex about the current center, per axis.
    pub fn scale(&mut self, factors: Vec3) {
        self.scale *= factors;
        let center = self.center;
        for v in self.vertices.iter_mut() {
            *v = center + (*v - center) * factors;
        }
    }

    /// Rotate about the current center by `angles` (radians), X first, then Y, then Z.
    pub fn rotate(&mut self, angles: Vec3) {
        self.rotation += angles;
        let rot = Mat3::from_rotation_z(angles.z)
            * Mat3::from_rotation_y(angles.y)
            * Mat3::from_rotation_x(angles.x);
        let center = self.center;
        for v in self.vertices.iter_mut() {
            *v = center + rot * (*v - center);
        }
    }

    /// Back to the cube as it was first built.
    pub fn reset(&mut self) {
        *self = Self::new(self.origin, self.edge_length);
    }
}

impl Display for Cube {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cube: center ({:.2}, {:.2}, {:.2}) | scale ({:.2}, {:.2}, {:.2}) \
             | rot ({:.1}, {:.1}, {:.1}) deg",
            self.center.x,
            self.center.y,
            self.center.z,
            self.scale.x,
            self.scale.y,
            self.scale.z,
            self.rotation.x.to_degrees(),
            self.rotation.y.to_degrees(),
            self.rotation.z.to_degrees(),
        )
    }
}
