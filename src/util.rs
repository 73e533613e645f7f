use std::fmt::Write;

use glam::{Mat4, Vec3};

/// Column-major dump of a matrix, one axis per line.
pub fn format_mat4(name: &str, mat: &Mat4) -> String {
    let mut output = format!("{}:\n", name);
    let axes = [
        ("x_axis", mat.x_axis),
        ("y_axis", mat.y_axis),
        ("z_axis", mat.z_axis),
        ("w_axis", mat.w_axis),
    ];
    for (label, col) in axes {
        let _ = writeln!(
            output,
            "{}: [{:8.3},{:8.3},{:8.3},{:8.3}]",
            label, col.x, col.y, col.z, col.w
        );
    }
    output
}

pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}
