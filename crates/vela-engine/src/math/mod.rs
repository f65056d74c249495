//! Matrix helpers for the renderer API.
//!
//! Matrices cross the API as `[f32; 16]` in column-major order (column-vector
//! convention, translation in elements 12..15). Internally they are built with
//! `nalgebra-glm`, whose storage has the same layout.
//!
//! Clip-space conventions are left-handed: +Z points into the screen.

use nalgebra_glm as glm;

/// Column-major 4×4 matrix as passed to `Gfx::set_transform` and friends.
pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

fn to_array(m: &glm::Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

fn from_array(m: &Mat4) -> glm::Mat4 {
    glm::Mat4::from_column_slice(m)
}

/// Left-handed look-at view matrix with +Y up.
pub fn mtx_look_at(eye: [f32; 3], at: [f32; 3]) -> Mat4 {
    let view = glm::look_at_lh(
        &glm::vec3(eye[0], eye[1], eye[2]),
        &glm::vec3(at[0], at[1], at[2]),
        &glm::vec3(0.0, 1.0, 0.0),
    );
    to_array(&view)
}

/// Left-handed perspective projection.
///
/// `fovy_deg` is the vertical field of view in degrees. With
/// `homogeneous_depth` the depth range is [-1, 1] (GL style), otherwise [0, 1].
pub fn mtx_proj(fovy_deg: f32, aspect: f32, near: f32, far: f32, homogeneous_depth: bool) -> Mat4 {
    let fovy = fovy_deg.to_radians();
    let proj = if homogeneous_depth {
        glm::perspective_lh_no(aspect, fovy, near, far)
    } else {
        glm::perspective_lh_zo(aspect, fovy, near, far)
    };
    to_array(&proj)
}

/// Rotation about X by `ax` then about Y by `ay` (radians), no translation.
///
/// Callers place a translation in elements 12..15 to build a model matrix.
pub fn mtx_rotate_xy(ax: f32, ay: f32) -> Mat4 {
    let (sx, cx) = ax.sin_cos();
    let (sy, cy) = ay.sin_cos();
    [
        cy,       0.0, sy,        0.0,
        sx * sy,  cx,  -sx * cy,  0.0,
        -cx * sy, sx,  cx * cy,   0.0,
        0.0,      0.0, 0.0,       1.0,
    ]
}

/// Returns `a * b` (apply `b` first).
pub fn mtx_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    to_array(&(from_array(a) * from_array(b)))
}

/// Transforms a point (w = 1) and returns the homogeneous result.
pub fn mtx_transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
    let v = from_array(m) * glm::vec4(p[0], p[1], p[2], 1.0);
    [v.x, v.y, v.z, v.w]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── rotate ────────────────────────────────────────────────────────────

    #[test]
    fn rotate_zero_is_identity() {
        assert_eq!(mtx_rotate_xy(0.0, 0.0), IDENTITY);
    }

    #[test]
    fn rotate_keeps_unit_length() {
        let m = mtx_rotate_xy(0.7, 1.3);
        let p = mtx_transform_point(&m, [1.0, 0.0, 0.0]);
        let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!(approx(len, 1.0));
        assert!(approx(p[3], 1.0));
    }

    #[test]
    fn translation_lives_in_last_column() {
        let mut m = mtx_rotate_xy(0.0, 0.0);
        m[12] = -15.0;
        m[13] = 3.0;
        m[14] = 0.0;
        let p = mtx_transform_point(&m, [1.0, 1.0, 1.0]);
        assert_eq!([p[0], p[1], p[2]], [-14.0, 4.0, 1.0]);
    }

    // ── camera ────────────────────────────────────────────────────────────

    #[test]
    fn look_at_puts_target_in_front() {
        let view = mtx_look_at([0.0, 0.0, -35.0], [0.0, 0.0, 0.0]);
        let p = mtx_transform_point(&view, [0.0, 0.0, 0.0]);
        assert!(approx(p[0], 0.0));
        assert!(approx(p[1], 0.0));
        assert!(approx(p[2], 35.0));
    }

    #[test]
    fn projection_depth_range_follows_homogeneous_flag() {
        let zo = mtx_proj(60.0, 16.0 / 9.0, 0.1, 100.0, false);
        let no = mtx_proj(60.0, 16.0 / 9.0, 0.1, 100.0, true);

        let near_zo = mtx_transform_point(&zo, [0.0, 0.0, 0.1]);
        let near_no = mtx_transform_point(&no, [0.0, 0.0, 0.1]);
        let far_zo = mtx_transform_point(&zo, [0.0, 0.0, 100.0]);

        assert!(approx(near_zo[2] / near_zo[3], 0.0));
        assert!(approx(near_no[2] / near_no[3], -1.0));
        assert!(approx(far_zo[2] / far_zo[3], 1.0));
    }

    #[test]
    fn mul_applies_right_operand_first() {
        let mut t = IDENTITY;
        t[12] = 5.0;
        let r = mtx_rotate_xy(0.0, std::f32::consts::FRAC_PI_2);
        let p = mtx_transform_point(&mtx_mul(&t, &r), [1.0, 0.0, 0.0]);
        // Rotate first (x → -z or +z), then translate along x.
        assert!(approx(p[0], 5.0));
    }
}
