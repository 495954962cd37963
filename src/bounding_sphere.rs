/*

    Bounding sphere given by center and radius.

    @date: 23 Nov, 2025
    @author: bartu
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::bounding_frustum::BoundingFrustum;
use crate::error::{GeometryError, GeomResult};
use crate::json_parser::{deser_vec3, ser_vec3};
use crate::plane::Plane;
use crate::ray::Ray;
use crate::text::{parse_components, write_components};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    #[serde(rename = "Center", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub center: Vector3,
    #[serde(rename = "Radius")]
    pub radius: Float,
}

impl BoundingSphere {
    pub fn new(center: Vector3, radius: Float) -> Self {
        Self { center, radius }
    }

    /// Sphere through the corners of `bbox`.
    pub fn create_from_box(bbox: &BoundingBox) -> Self {
        let center = bbox.center();
        Self::new(center, center.distance(bbox.max))
    }

    /// Centered on the points' bounding box, radius reaching the farthest point.
    pub fn create_from_points(points: &[Vector3]) -> GeomResult<Self> {
        let bbox = BoundingBox::create_from_points(points.iter().copied())?;
        let center = bbox.center();
        let radius_squared = points
            .iter()
            .map(|p| center.distance_squared(*p))
            .fold(0.0, Float::max);
        Ok(Self::new(center, radius_squared.sqrt()))
    }

    pub fn create_merged(a: &BoundingSphere, b: &BoundingSphere) -> Self {
        let offset = b.center - a.center;
        let distance = offset.length();

        if distance + b.radius <= a.radius {
            return *a;
        }
        if distance + a.radius <= b.radius {
            return *b;
        }

        // Span from the far side of a to the far side of b
        let radius = (a.radius + distance + b.radius) * 0.5;
        let center = a.center + offset * ((radius - a.radius) / distance);
        Self::new(center, radius)
    }

    /// Transformed center, radius scaled by the largest axis scale of `mat`.
    pub fn transform(&self, mat: &Matrix4) -> Self {
        let center = transform_point(mat, &self.center);
        let scale_squared = mat.x_axis.truncate().length_squared()
            .max(mat.y_axis.truncate().length_squared())
            .max(mat.z_axis.truncate().length_squared());
        Self::new(center, self.radius * scale_squared.sqrt())
    }

    // ------------------------------------------------------------------------
    // Containment
    // ------------------------------------------------------------------------

    pub fn contains_point(&self, point: Vector3) -> ContainmentType {
        let radius_squared = self.radius * self.radius;
        let distance_squared = point.distance_squared(self.center);
        if distance_squared > radius_squared {
            ContainmentType::Disjoint
        } else if distance_squared < radius_squared {
            ContainmentType::Contains
        } else {
            ContainmentType::Intersects
        }
    }

    pub fn contains_box(&self, bbox: &BoundingBox) -> ContainmentType {
        let all_inside = bbox
            .get_corners()
            .iter()
            .all(|&corner| self.contains_point(corner) != ContainmentType::Disjoint);
        if all_inside {
            return ContainmentType::Contains;
        }
        if bbox.intersects_sphere(self) {
            ContainmentType::Intersects
        } else {
            ContainmentType::Disjoint
        }
    }

    pub fn contains_sphere(&self, other: &BoundingSphere) -> ContainmentType {
        let distance = self.center.distance(other.center);
        if distance > self.radius + other.radius {
            ContainmentType::Disjoint
        } else if distance + other.radius <= self.radius {
            ContainmentType::Contains
        } else {
            ContainmentType::Intersects
        }
    }

    pub fn contains_frustum(&self, frustum: &BoundingFrustum) -> ContainmentType {
        if !frustum.intersects_sphere(self) {
            return ContainmentType::Disjoint;
        }
        let all_inside = frustum
            .get_corners()
            .iter()
            .all(|&corner| self.contains_point(corner) != ContainmentType::Disjoint);
        if all_inside {
            ContainmentType::Contains
        } else {
            ContainmentType::Intersects
        }
    }

    // ------------------------------------------------------------------------
    // Intersection
    // ------------------------------------------------------------------------

    pub fn intersects_box(&self, bbox: &BoundingBox) -> bool {
        bbox.intersects_sphere(self)
    }

    pub fn intersects_sphere(&self, other: &BoundingSphere) -> bool {
        let radii = self.radius + other.radius;
        self.center.distance_squared(other.center) <= radii * radii
    }

    pub fn intersects_frustum(&self, frustum: &BoundingFrustum) -> bool {
        frustum.intersects_sphere(self)
    }

    pub fn intersects_plane(&self, plane: &Plane) -> PlaneIntersectionType {
        let distance = plane.dot_coordinate(self.center);
        if distance > self.radius {
            PlaneIntersectionType::Front
        } else if distance < -self.radius {
            PlaneIntersectionType::Back
        } else {
            PlaneIntersectionType::Intersecting
        }
    }

    pub fn intersects_ray(&self, ray: &Ray) -> Option<Float> {
        ray.intersects_sphere(self)
    }
}

impl fmt::Display for BoundingSphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.center;
        write_components(f, &[c.x, c.y, c.z, self.radius])
    }
}

impl FromStr for BoundingSphere {
    type Err = GeometryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, z, r] = parse_components::<4>(s)?;
        Ok(BoundingSphere::new(Vector3::new(x, y, z), r))
    }
}
