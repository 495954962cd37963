/*

    Plane in signed-distance form: dot(normal, p) + d = 0.

    The side the normal points to is the "front" side.
    For frustum planes normals point outward, so front
    means outside the volume.

    @date: 22 Nov, 2025
    @author: bartu
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::bounding_frustum::BoundingFrustum;
use crate::bounding_sphere::BoundingSphere;
use crate::containment::PlaneIntersectionType;
use crate::error::GeometryError;
use crate::json_parser::{deser_vec3, ser_vec3};
use crate::ray::Ray;
use crate::text::{parse_components, write_components};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    #[serde(rename = "Normal", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub normal: Vector3,
    #[serde(rename = "D")]
    pub d: Float,
}

impl Plane {
    pub fn new(normal: Vector3, d: Float) -> Self {
        Self { normal, d }
    }

    pub fn from_components(a: Float, b: Float, c: Float, d: Float) -> Self {
        Self::new(Vector3::new(a, b, c), d)
    }

    /// Plane through three points, normal following the
    /// right hand rule a -> b -> c.
    pub fn from_points(a: Vector3, b: Vector3, c: Vector3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self::new(normal, -normal.dot(a))
    }

    /// Scale so that the normal has unit length. A zero normal
    /// gives NaN components, nothing is guarded here.
    pub fn normalize(&self) -> Self {
        let len = self.normal.length();
        Self::new(self.normal / len, self.d / len)
    }

    /// Signed distance of `point` (exact for normalized planes).
    #[inline]
    pub fn dot_coordinate(&self, point: Vector3) -> Float {
        self.normal.dot(point) + self.d
    }

    #[inline]
    pub fn dot_normal(&self, v: Vector3) -> Float {
        self.normal.dot(v)
    }

    pub fn classify_point(&self, point: Vector3) -> PlaneIntersectionType {
        let distance = self.dot_coordinate(point);
        if distance > 0.0 {
            PlaneIntersectionType::Front
        } else if distance < 0.0 {
            PlaneIntersectionType::Back
        } else {
            PlaneIntersectionType::Intersecting
        }
    }

    pub fn intersects_box(&self, bbox: &BoundingBox) -> PlaneIntersectionType {
        bbox.intersects_plane(self)
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> PlaneIntersectionType {
        sphere.intersects_plane(self)
    }

    pub fn intersects_frustum(&self, frustum: &BoundingFrustum) -> PlaneIntersectionType {
        frustum.intersects_plane(self)
    }

    /// Line shared by two planes, returned as a ray whose direction is
    /// cross(n1, n2). Parallel planes yield NaN/inf components.
    pub fn intersection_line(&self, other: &Plane) -> Ray {
        let direction = self.normal.cross(other.normal);
        let len_sq = direction.length_squared();
        let a = -self.d * other.normal + other.d * self.normal;
        let position = a.cross(direction) / len_sq;
        Ray::new(position, direction)
    }

    /// Point where the (infinite) line of `ray` crosses this plane.
    /// Rays parallel to the plane yield NaN/inf components.
    pub fn intersect_ray_point(&self, ray: &Ray) -> Vector3 {
        let t = (-self.d - self.normal.dot(ray.position)) / self.normal.dot(ray.direction);
        ray.at(t)
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_components(f, &[self.normal.x, self.normal.y, self.normal.z, self.d])
    }
}

impl FromStr for Plane {
    type Err = GeometryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [a, b, c, d] = parse_components::<4>(s)?;
        Ok(Plane::from_components(a, b, c, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn classify_point_uses_sign_of_distance() {
        let plane = Plane::new(Vector3::X, -2.0); // x = 2
        assert_eq!(plane.classify_point(Vector3::new(3.0, 0.0, 0.0)), PlaneIntersectionType::Front);
        assert_eq!(plane.classify_point(Vector3::new(1.0, 9.0, 0.0)), PlaneIntersectionType::Back);
        assert_eq!(plane.classify_point(Vector3::new(2.0, 5.0, 5.0)), PlaneIntersectionType::Intersecting);
    }

    #[test]
    fn from_points_passes_through_all_three() {
        let (a, b, c) = (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
        let plane = Plane::from_points(a, b, c);
        for p in [a, b, c] {
            assert_abs_diff_eq!(plane.dot_coordinate(p), 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(plane.normal.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_scales_distance_too() {
        let plane = Plane::from_components(0.0, 3.0, 4.0, 10.0).normalize();
        assert_abs_diff_eq!(plane.normal.y, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.normal.z, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.d, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn two_planes_meet_along_a_line() {
        let px = Plane::new(Vector3::X, -1.0); // x = 1
        let py = Plane::new(Vector3::Y, -2.0); // y = 2
        let line = px.intersection_line(&py);
        assert_eq!(line.direction, Vector3::Z);
        assert_abs_diff_eq!(line.position.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line.position.y, 2.0, epsilon = 1e-12);

        let pz = Plane::new(Vector3::Z, -3.0);
        let corner = pz.intersect_ray_point(&line);
        assert_abs_diff_eq!(corner.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_planes_propagate_non_finite_values() {
        let a = Plane::new(Vector3::X, 0.0);
        let b = Plane::new(Vector3::X, -1.0);
        let line = a.intersection_line(&b);
        assert!(!line.position.is_finite());
    }

    #[test]
    fn text_and_json_forms() {
        let plane: Plane = "0 1 0 -4.5".parse().unwrap();
        assert_eq!(plane, Plane::new(Vector3::Y, -4.5));
        assert_eq!(plane.to_string(), "0 1 0 -4.5");

        let json = serde_json::to_string(&plane).unwrap();
        assert_eq!(json, r#"{"Normal":{"x":0.0,"y":1.0,"z":0.0},"D":-4.5}"#);
        let back: Plane = serde_json::from_str(r#"{"Normal": "0 1 0", "D": -4.5}"#).unwrap();
        assert_eq!(back, plane);
    }
}
