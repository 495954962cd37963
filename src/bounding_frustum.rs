/*

    Bounding frustum: convex volume bounded by the six
    clipping planes of a view-projection matrix.

    Planes and corners are derived from the matrix and only
    ever replaced together (see BoundingFrustum::new and
    set_matrix), so they can never disagree with it.

    Plane normals point OUTWARD: a point p is inside when
    dot(normal, p) + d <= 0 for all six planes. The matrix is
    expected to map into clip space with depth in [0, 1]
    (e.g. DMat4::perspective_rh * view).

    Corner order is a fixed contract:

       0: top    ∩ (near ∩ left)      4: top    ∩ (left ∩ far)
       1: top    ∩ (right ∩ near)     5: top    ∩ (far ∩ right)
       2: bottom ∩ (right ∩ near)     6: bottom ∩ (far ∩ right)
       3: bottom ∩ (near ∩ left)      7: bottom ∩ (left ∩ far)

    @date: 24 Nov, 2025
    @author: bartu
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bounding_box::{BoundingBox, CORNER_COUNT};
use crate::bounding_sphere::BoundingSphere;
use crate::error::{GeometryError, GeomResult};
use crate::interval::{FloatConst, Interval};
use crate::json_parser::{deser_matrix, ser_matrix};
use crate::plane::Plane;
use crate::ray::Ray;
use crate::text::{format_matrix, parse_matrix};
use crate::prelude::*;

/// Frustum plane indices
pub const PLANE_NEAR: usize = 0;
pub const PLANE_FAR: usize = 1;
pub const PLANE_LEFT: usize = 2;
pub const PLANE_RIGHT: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_BOTTOM: usize = 5;

pub const PLANE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingFrustum {
    matrix: Matrix4,
    planes: [Plane; PLANE_COUNT],
    corners: [Vector3; CORNER_COUNT],
}

impl BoundingFrustum {

    pub fn new(matrix: Matrix4) -> Self {
        let planes = Self::create_planes(&matrix);
        let corners = Self::create_corners(&planes);
        Self {
            matrix,
            planes,
            corners,
        }
    }

    /// Rebuild from a new matrix. The whole value is replaced at once.
    pub fn set_matrix(&mut self, matrix: Matrix4) {
        *self = Self::new(matrix);
    }

    fn create_planes(matrix: &Matrix4) -> [Plane; PLANE_COUNT] {
        let [
            m11, m12, m13, m14,
            m21, m22, m23, m24,
            m31, m32, m33, m34,
            m41, m42, m43, m44,
        ] = matrix.to_cols_array();

        let planes = [
            // Near:   -col3
            Plane::from_components(-m13, -m23, -m33, -m43),
            // Far:    col3 - col4
            Plane::from_components(m13 - m14, m23 - m24, m33 - m34, m43 - m44),
            // Left:   -col4 - col1
            Plane::from_components(-m14 - m11, -m24 - m21, -m34 - m31, -m44 - m41),
            // Right:  col1 - col4
            Plane::from_components(m11 - m14, m21 - m24, m31 - m34, m41 - m44),
            // Top:    col2 - col4
            Plane::from_components(m12 - m14, m22 - m24, m32 - m34, m42 - m44),
            // Bottom: -col4 - col2
            Plane::from_components(-m14 - m12, -m24 - m22, -m34 - m32, -m44 - m42),
        ];

        planes.map(|plane| plane.normalize())
    }

    fn create_corners(planes: &[Plane; PLANE_COUNT]) -> [Vector3; CORNER_COUNT] {
        let near_left = planes[PLANE_NEAR].intersection_line(&planes[PLANE_LEFT]);
        let right_near = planes[PLANE_RIGHT].intersection_line(&planes[PLANE_NEAR]);
        let left_far = planes[PLANE_LEFT].intersection_line(&planes[PLANE_FAR]);
        let far_right = planes[PLANE_FAR].intersection_line(&planes[PLANE_RIGHT]);

        if [&near_left, &right_near, &left_far, &far_right].into_iter().any(is_degenerate_edge) {
            warn!("Frustum has (nearly) parallel or zero-length planes, corners will not be finite");
        }

        let top = &planes[PLANE_TOP];
        let bottom = &planes[PLANE_BOTTOM];
        [
            top.intersect_ray_point(&near_left),
            top.intersect_ray_point(&right_near),
            bottom.intersect_ray_point(&right_near),
            bottom.intersect_ray_point(&near_left),
            top.intersect_ray_point(&left_far),
            top.intersect_ray_point(&far_right),
            bottom.intersect_ray_point(&far_right),
            bottom.intersect_ray_point(&left_far),
        ]
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// All planes in [near, far, left, right, top, bottom] order.
    pub fn planes(&self) -> &[Plane; PLANE_COUNT] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> GeomResult<Plane> {
        self.planes
            .get(index)
            .copied()
            .ok_or(GeometryError::PlaneIndexOutOfRange { index })
    }

    pub fn near(&self) -> Plane { self.planes[PLANE_NEAR] }
    pub fn far(&self) -> Plane { self.planes[PLANE_FAR] }
    pub fn left(&self) -> Plane { self.planes[PLANE_LEFT] }
    pub fn right(&self) -> Plane { self.planes[PLANE_RIGHT] }
    pub fn top(&self) -> Plane { self.planes[PLANE_TOP] }
    pub fn bottom(&self) -> Plane { self.planes[PLANE_BOTTOM] }

    pub fn get_corners(&self) -> [Vector3; CORNER_COUNT] {
        self.corners
    }

    /// Write the 8 corners into the front of `out`.
    pub fn copy_corners_into(&self, out: &mut [Vector3]) -> GeomResult<()> {
        if out.len() < CORNER_COUNT {
            return Err(GeometryError::OutputTooSmall { required: CORNER_COUNT, actual: out.len() });
        }
        out[..CORNER_COUNT].copy_from_slice(&self.corners);
        Ok(())
    }

    /// False for degenerate matrices whose side planes are parallel.
    pub fn has_finite_corners(&self) -> bool {
        self.corners.iter().all(|c| c.is_finite())
    }

    // ------------------------------------------------------------------------
    // Containment
    // ------------------------------------------------------------------------

    /// Points within EPSILON outside of a plane still count as inside,
    /// so the corners themselves are contained.
    pub fn contains_point(&self, point: Vector3) -> ContainmentType {
        for plane in &self.planes {
            if is_approximately_greater_than(plane.dot_coordinate(point), 0.0) {
                return ContainmentType::Disjoint;
            }
        }
        ContainmentType::Contains
    }

    /// Reproduces the historical point test, which added normal.z and
    /// point.z instead of multiplying them. Only for callers that must
    /// match results produced by that code; use contains_point otherwise.
    pub fn contains_point_legacy(&self, point: Vector3) -> ContainmentType {
        for plane in &self.planes {
            let n = plane.normal;
            let distance = n.x * point.x + n.y * point.y + n.z + point.z + plane.d;
            if is_approximately_greater_than(distance, 0.0) {
                return ContainmentType::Disjoint;
            }
        }
        ContainmentType::Contains
    }

    pub fn contains_box(&self, bbox: &BoundingBox) -> ContainmentType {
        self.classify_against_planes(|plane| bbox.intersects_plane(plane))
    }

    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> ContainmentType {
        self.classify_against_planes(|plane| sphere.intersects_plane(plane))
    }

    pub fn contains_frustum(&self, other: &BoundingFrustum) -> ContainmentType {
        if self.matrix == other.matrix {
            return ContainmentType::Contains;
        }
        self.classify_against_planes(|plane| other.intersects_plane(plane))
    }

    // Front of any plane is outside, straddling any plane is a partial overlap
    fn classify_against_planes<F>(&self, classify: F) -> ContainmentType
    where
        F: Fn(&Plane) -> PlaneIntersectionType,
    {
        let mut intersects = false;
        for plane in &self.planes {
            match classify(plane) {
                PlaneIntersectionType::Front => return ContainmentType::Disjoint,
                PlaneIntersectionType::Intersecting => intersects = true,
                PlaneIntersectionType::Back => {}
            }
        }

        if intersects {
            ContainmentType::Intersects
        } else {
            ContainmentType::Contains
        }
    }

    // ------------------------------------------------------------------------
    // Intersection
    // ------------------------------------------------------------------------

    pub fn intersects_box(&self, bbox: &BoundingBox) -> bool {
        !self.contains_box(bbox).is_disjoint()
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        !self.contains_sphere(sphere).is_disjoint()
    }

    pub fn intersects_frustum(&self, other: &BoundingFrustum) -> bool {
        !self.contains_frustum(other).is_disjoint()
    }

    /// A corner lying exactly on the plane makes the frustum intersecting.
    pub fn intersects_plane(&self, plane: &Plane) -> PlaneIntersectionType {
        let first = plane.classify_point(self.corners[0]);
        for corner in &self.corners[1..] {
            if plane.classify_point(*corner) != first {
                return PlaneIntersectionType::Intersecting;
            }
        }
        first
    }

    /// Distance along the ray to the first point inside the frustum.
    /// Some(0.0) if the ray starts inside.
    pub fn intersects_ray(&self, ray: &Ray) -> Option<Float> {
        if self.contains_point(ray.position) == ContainmentType::Contains {
            return Some(0.0);
        }

        // Every plane bounds t from one side: entering through planes
        // facing the ray, leaving through the others.
        let mut t = Interval::UNIVERSE;
        for plane in &self.planes {
            let dir_dot_normal = plane.dot_normal(ray.direction);
            let distance = plane.dot_coordinate(ray.position);

            if approx_zero(dir_dot_normal) {
                if distance > 0.0 {
                    return None; // Parallel and outside
                }
                continue;
            }

            let hit = -distance / dir_dot_normal;
            if dir_dot_normal < 0.0 {
                if hit > t.max {
                    return None;
                }
                t.shrink(hit, Float::INF);
            } else {
                if hit < t.min {
                    return None;
                }
                t.shrink(Float::NEG_INF, hit);
            }
        }

        let distance = if t.min >= 0.0 { t.min } else { t.max };
        if distance < 0.0 {
            return None;
        }
        Some(distance)
    }
}

/// Edge line of two planes that cannot produce finite corners:
/// the planes are parallel, or one of them had a zero-length normal.
fn is_degenerate_edge(edge: &Ray) -> bool {
    !edge.direction.is_finite() || approx_zero(edge.direction.length_squared())
}

impl Default for BoundingFrustum {
    /// Frustum of the identity matrix, the clip-space box
    /// x, y in [-1, 1] and z in [0, 1].
    fn default() -> Self {
        Self::new(Matrix4::IDENTITY)
    }
}

impl fmt::Display for BoundingFrustum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_matrix(&self.matrix))
    }
}

impl FromStr for BoundingFrustum {
    type Err = GeometryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_matrix(s).map(BoundingFrustum::new)
    }
}

// Only the matrix is stored, planes and corners are rebuilt on load
#[derive(Serialize, Deserialize)]
struct FrustumFields {
    #[serde(rename = "Matrix", serialize_with = "ser_matrix", deserialize_with = "deser_matrix")]
    matrix: Matrix4,
}

impl Serialize for BoundingFrustum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FrustumFields { matrix: self.matrix }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoundingFrustum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = FrustumFields::deserialize(deserializer)?;
        Ok(BoundingFrustum::new(fields.matrix))
    }
}

#[cfg(test)]
#[path = "bounding_frustum_tests.rs"]
mod tests;
