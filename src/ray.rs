/*

    Ray r(t) = position + t * direction and its distance
    queries against boxes, spheres, planes and frustums.

    Every intersects_* returns the parametric distance t
    of the first hit in front of the ray, Some(0.0) if the
    ray starts inside the volume, None otherwise.
    Direction does not have to be normalized, distances
    are then in units of |direction|.

    @date: Oct, 2025
    @author: bartu
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::bounding_frustum::BoundingFrustum;
use crate::bounding_sphere::BoundingSphere;
use crate::error::GeometryError;
use crate::interval::Interval;
use crate::json_parser::{deser_vec3, ser_vec3};
use crate::plane::Plane;
use crate::text::{parse_components, write_components};
use crate::prelude::*;


#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    #[serde(rename = "Position", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub position: Vector3,
    #[serde(rename = "Direction", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub direction: Vector3,
}

impl Ray {

    pub fn new(position: Vector3, direction: Vector3) -> Self {
        Self {
            position,
            direction,
        }
    }

    #[inline]
    pub fn at(&self, t: Float) -> Vector3 {
        self.position + self.direction * t // r(t) = o + dt
    }

    pub fn intersects_box(&self, bbox: &BoundingBox) -> Option<Float> {
        // Slab test: intersect the admissible t range with the
        // [t1, t2] range of every axis slab.
        let slab_intersect = |min: Float, max: Float, o: Float, d: Float| -> (Float, Float) {
            let mut t1 = (min - o) / d;
            let mut t2 = (max - o) / d;
            if t2 < t1 {
                std::mem::swap(&mut t1, &mut t2);
            }
            (t1, t2)
        };

        let mut t = Interval::UNIVERSE;
        for axis in 0..3 {
            let (o, d) = (self.position[axis], self.direction[axis]);
            let (min, max) = (bbox.min[axis], bbox.max[axis]);

            if approx_zero(d) {
                // Parallel to the slab, must start between its walls
                if o < min || o > max {
                    return None;
                }
                continue;
            }

            let (t1, t2) = slab_intersect(min, max, o, d);
            t.shrink(t1, t2);
            if !t.validate() {
                return None;
            }
        }

        if t.max < 0.0 {
            return None; // Box is behind the ray
        }
        if t.min < 0.0 {
            return Some(0.0); // Started inside
        }
        Some(t.min)
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> Option<Float> {
        // r(t) on the sphere surface gives a quadratic in t
        let o_minus_c = self.position - sphere.center;
        let r_squared = sphere.radius * sphere.radius;
        let oc_dot_oc: Float = o_minus_c.dot(o_minus_c);
        if oc_dot_oc <= r_squared {
            return Some(0.0);
        }

        let d_dot_d: Float = self.direction.dot(self.direction);
        if approx_zero(d_dot_d) {
            return None; // No direction, origin is outside
        }
        let d_dot_oc: Float = self.direction.dot(o_minus_c);
        let discriminant = d_dot_oc * d_dot_oc - d_dot_d * (oc_dot_oc - r_squared);
        if discriminant < 0.0 {
            return None; // Negative square root
        }

        let t = (-d_dot_oc - discriminant.sqrt()) / d_dot_d; // Smaller root
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }

    pub fn intersects_plane(&self, plane: &Plane) -> Option<Float> {
        let denominator = self.direction.dot(plane.normal);
        if approx_zero(denominator) {
            return None; // Parallel
        }

        let t = (-plane.d - plane.normal.dot(self.position)) / denominator;
        if t < 0.0 {
            // Plane behind the ray, unless the origin sits on it
            if t < -EPSILON {
                return None;
            }
            return Some(0.0);
        }
        Some(t)
    }

    pub fn intersects_frustum(&self, frustum: &BoundingFrustum) -> Option<Float> {
        frustum.intersects_ray(self)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, d) = (self.position, self.direction);
        write_components(f, &[p.x, p.y, p.z, d.x, d.y, d.z])
    }
}

impl FromStr for Ray {
    type Err = GeometryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [px, py, pz, dx, dy, dz] = parse_components::<6>(s)?;
        Ok(Ray::new(Vector3::new(px, py, pz), Vector3::new(dx, dy, dz)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vector3::splat(-1.0), Vector3::splat(1.0))
    }

    #[test]
    fn ray_hits_box_face_in_front() {
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::X);
        assert_eq!(ray.intersects_box(&unit_box()), Some(4.0));
    }

    #[test]
    fn ray_inside_box_reports_zero() {
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.3, -0.2, 0.9));
        assert_eq!(ray.intersects_box(&unit_box()), Some(0.0));
    }

    #[test]
    fn ray_misses_box_behind_or_aside() {
        let behind = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::X);
        assert_eq!(behind.intersects_box(&unit_box()), None);

        // Parallel to the x slab but outside it
        let aside = Ray::new(Vector3::new(2.0, -5.0, 0.0), Vector3::Y);
        assert_eq!(aside.intersects_box(&unit_box()), None);

        let diagonal_miss = Ray::new(Vector3::new(-5.0, 3.0, 0.0), Vector3::X);
        assert_eq!(diagonal_miss.intersects_box(&unit_box()), None);
    }

    #[test]
    fn ray_hits_sphere_at_near_surface() {
        let sphere = BoundingSphere::new(Vector3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vector3::ZERO, Vector3::NEG_Z);
        assert_abs_diff_eq!(ray.intersects_sphere(&sphere).unwrap(), 8.0, epsilon = 1e-12);

        let away = Ray::new(Vector3::ZERO, Vector3::Z);
        assert_eq!(away.intersects_sphere(&sphere), None);

        let inside = Ray::new(Vector3::new(0.0, 0.5, -10.0), Vector3::Z);
        assert_eq!(inside.intersects_sphere(&sphere), Some(0.0));

        // Zero direction only hits when starting inside
        let stuck = Ray::new(Vector3::ZERO, Vector3::ZERO);
        assert_eq!(stuck.intersects_sphere(&sphere), None);
        let stuck_inside = Ray::new(sphere.center, Vector3::ZERO);
        assert_eq!(stuck_inside.intersects_sphere(&sphere), Some(0.0));
    }

    #[test]
    fn ray_plane_distance_and_parallel_case() {
        let plane = Plane::new(Vector3::Y, -3.0); // y = 3
        let up = Ray::new(Vector3::ZERO, Vector3::Y);
        assert_abs_diff_eq!(up.intersects_plane(&plane).unwrap(), 3.0, epsilon = 1e-12);

        let down = Ray::new(Vector3::ZERO, Vector3::NEG_Y);
        assert_eq!(down.intersects_plane(&plane), None);

        let parallel = Ray::new(Vector3::ZERO, Vector3::X);
        assert_eq!(parallel.intersects_plane(&plane), None);
    }

    #[test]
    fn text_round_trip() {
        let ray: Ray = "1 2 3 0 0 -1".parse().unwrap();
        assert_eq!(ray, Ray::new(Vector3::new(1.0, 2.0, 3.0), Vector3::NEG_Z));
        assert_eq!(ray.to_string().parse::<Ray>().unwrap(), ray);
        assert!("1 2 3".parse::<Ray>().is_err());
    }
}
