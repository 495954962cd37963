/*

    Declare numeric types used throughout this repo.

    WARNING: If you like to use f32 instead of f64
    during computations, you need to change all of these:
    pub type Float = f32;
    pub type Vector3 = Vec3;
    pub type Matrix4 = Mat4;

    Matrix entries are referred to as M11..M44 in the
    row-vector convention. bevy_math (glam) stores columns,
    so Mij == mat.col(i-1)[j-1] and to_cols_array( ) yields
    [M11, M12, M13, M14, M21, ..., M44].

    @date: 2 Oct, 2025
    @author: Bartu
*/

use bevy_math::{DMat4, DVec3, DVec4};
pub type Float = f64; // WARNING: If you want to change it to f32, don't forget to update Vector3 and Matrix4 types
pub type Vector3 = DVec3;
pub type Matrix4 = DMat4;
pub type Vector4 = DVec4;

/// Tolerance used by the "approximately greater than" comparisons
/// of point-vs-frustum tests.
pub const EPSILON: Float = 1e-6;

pub fn approx_zero(x: Float) -> bool {
    x.abs() < 1e-8
}

/// True if `a` exceeds `b` by more than EPSILON.
pub fn is_approximately_greater_than(a: Float, b: Float) -> bool {
    a - b > EPSILON
}

pub fn transform_point(mat: &Matrix4, v: &Vector3) -> Vector3 {
    let v4 = Vector4::new(v.x, v.y, v.z, 1.0);
    let r = *mat * v4;
    Vector3::new(r.x, r.y, r.z)
}

/// Component-wise clamp that tolerates inverted bounds (min > max),
/// unlike Vector3::clamp.
pub fn clamp_vec3(v: Vector3, min: Vector3, max: Vector3) -> Vector3 {
    v.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximately_greater_ignores_tiny_excess() {
        assert!(!is_approximately_greater_than(1e-9, 0.0));
        assert!(!is_approximately_greater_than(0.0, 0.0));
        assert!(is_approximately_greater_than(1e-3, 0.0));
        assert!(!is_approximately_greater_than(-1.0, 0.0));
    }

    #[test]
    fn transform_point_applies_translation() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let p = transform_point(&m, &Vector3::ZERO);
        assert_eq!(p, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn clamp_handles_inverted_bounds() {
        let v = clamp_vec3(Vector3::splat(5.0), Vector3::splat(10.0), Vector3::ZERO);
        assert_eq!(v, Vector3::ZERO);
    }
}
