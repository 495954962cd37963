/*

    Axis Aligned Bounding Box.

    Defined by its min and max corners. Nothing stops a caller
    from building an inverted box (min > max on some axis);
    create_from_points always returns a valid one.

    Corner order is a fixed contract, see BOX_CORNERS below.

    @author: bartu
    @date: 9 Nov, 2025
*/

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::bounding_frustum::BoundingFrustum;
use crate::bounding_sphere::BoundingSphere;
use crate::error::{GeometryError, GeomResult};
use crate::interval::Interval;
use crate::json_parser::{deser_vec3, ser_vec3};
use crate::plane::Plane;
use crate::ray::Ray;
use crate::text::{parse_components, write_components};
use crate::prelude::*;

pub const CORNER_COUNT: usize = 8;

#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
}

use Bound::{Max as Hi, Min as Lo};

/// Which bound each corner takes on x, y, z.
///
///  index | x    y    z
///  ------+---------------
///    0   | Min  Max  Max
///    1   | Max  Max  Max
///    2   | Max  Min  Max
///    3   | Min  Min  Max
///    4   | Min  Max  Min
///    5   | Max  Max  Min
///    6   | Max  Min  Min
///    7   | Min  Min  Min
const BOX_CORNERS: [[Bound; 3]; CORNER_COUNT] = [
    [Lo, Hi, Hi],
    [Hi, Hi, Hi],
    [Hi, Lo, Hi],
    [Lo, Lo, Hi],
    [Lo, Hi, Lo],
    [Hi, Hi, Lo],
    [Hi, Lo, Lo],
    [Lo, Lo, Lo],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "Min", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub min: Vector3,
    #[serde(rename = "Max", serialize_with = "ser_vec3", deserialize_with = "deser_vec3")]
    pub max: Vector3,
}

impl BoundingBox {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    pub fn new_from(xint: &Interval, yint: &Interval, zint: &Interval) -> Self {
        Self {
            min: Vector3::new(xint.min, yint.min, zint.min),
            max: Vector3::new(xint.max, yint.max, zint.max),
        }
    }

    /// Smallest box enclosing all points.
    /// Fails with EmptyPointSet if the iterator yields nothing.
    pub fn create_from_points<I>(points: I) -> GeomResult<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let (mut xint, mut yint, mut zint) = (Interval::EMPTY, Interval::EMPTY, Interval::EMPTY);
        let mut empty = true;
        for p in points {
            xint.expand(p.x);
            yint.expand(p.y);
            zint.expand(p.z);
            empty = false;
        }

        if empty {
            return Err(GeometryError::EmptyPointSet);
        }
        Ok(Self::new_from(&xint, &yint, &zint))
    }

    pub fn create_from_sphere(sphere: &BoundingSphere) -> Self {
        let r = Vector3::splat(sphere.radius);
        Self::new(sphere.center - r, sphere.center + r)
    }

    pub fn create_merged(a: &BoundingBox, b: &BoundingBox) -> Self {
        Self::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Extent along axis 0 (x), 1 (y) or 2 (z).
    pub fn axis(&self, i: usize) -> Interval {
        Interval::new(self.min[i], self.max[i])
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.axis(i).validate())
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the size on every axis.
    pub fn extents(&self) -> Vector3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn get_corner(&self, index: usize) -> GeomResult<Vector3> {
        let bounds = BOX_CORNERS
            .get(index)
            .ok_or(GeometryError::CornerIndexOutOfRange { index })?;

        let pick = |bound: Bound, axis: usize| match bound {
            Bound::Min => self.min[axis],
            Bound::Max => self.max[axis],
        };
        Ok(Vector3::new(pick(bounds[0], 0), pick(bounds[1], 1), pick(bounds[2], 2)))
    }

    pub fn get_corners(&self) -> [Vector3; CORNER_COUNT] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, lo.y, lo.z),
        ]
    }

    /// Write the 8 corners into the front of `out`.
    pub fn copy_corners_into(&self, out: &mut [Vector3]) -> GeomResult<()> {
        if out.len() < CORNER_COUNT {
            return Err(GeometryError::OutputTooSmall { required: CORNER_COUNT, actual: out.len() });
        }
        out[..CORNER_COUNT].copy_from_slice(&self.get_corners());
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Containment
    // ------------------------------------------------------------------------

    /// Points on the boundary count as contained.
    pub fn contains_point(&self, point: Vector3) -> ContainmentType {
        if (0..3).all(|i| self.axis(i).contains(point[i])) {
            ContainmentType::Contains
        } else {
            ContainmentType::Disjoint
        }
    }

    pub fn contains_box(&self, other: &BoundingBox) -> ContainmentType {
        if !(0..3).all(|i| self.axis(i).overlaps(&other.axis(i))) {
            return ContainmentType::Disjoint;
        }
        if (0..3).all(|i| self.axis(i).contains_interval(&other.axis(i))) {
            return ContainmentType::Contains;
        }
        ContainmentType::Intersects
    }

    /// A sphere that only touches the box counts as disjoint here,
    /// while intersects_sphere reports it as touching.
    pub fn contains_sphere(&self, sphere: &BoundingSphere) -> ContainmentType {
        let (c, r) = (sphere.center, sphere.radius);
        let clamped = clamp_vec3(c, self.min, self.max);
        let distance_squared = c.distance_squared(clamped);
        if r * r <= distance_squared {
            return ContainmentType::Disjoint;
        }

        for i in 0..3 {
            let crosses_face = c[i] > self.max[i] - r || self.min[i] + r > c[i];
            let too_small = self.max[i] - self.min[i] < 2.0 * r;
            if crosses_face || too_small {
                return ContainmentType::Intersects;
            }
        }
        ContainmentType::Contains
    }

    pub fn contains_frustum(&self, frustum: &BoundingFrustum) -> ContainmentType {
        if !frustum.intersects_box(self) {
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

    pub fn intersects_box(&self, other: &BoundingBox) -> bool {
        self.max.x >= other.min.x && self.min.x <= other.max.x
            && self.max.y >= other.min.y && self.min.y <= other.max.y
            && self.max.z >= other.min.z && self.min.z <= other.max.z
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let clamped = clamp_vec3(sphere.center, self.min, self.max);
        sphere.center.distance_squared(clamped) <= sphere.radius * sphere.radius
    }

    pub fn intersects_frustum(&self, frustum: &BoundingFrustum) -> bool {
        frustum.intersects_box(self)
    }

    /// Uses the corners furthest along (positive vertex) and against
    /// (negative vertex) the plane normal.
    pub fn intersects_plane(&self, plane: &Plane) -> PlaneIntersectionType {
        let n = plane.normal;
        let positive_vertex = Vector3::new(
            if n.x >= 0.0 { self.max.x } else { self.min.x },
            if n.y >= 0.0 { self.max.y } else { self.min.y },
            if n.z >= 0.0 { self.max.z } else { self.min.z },
        );
        let negative_vertex = Vector3::new(
            if n.x >= 0.0 { self.min.x } else { self.max.x },
            if n.y >= 0.0 { self.min.y } else { self.max.y },
            if n.z >= 0.0 { self.min.z } else { self.max.z },
        );

        if plane.dot_coordinate(negative_vertex) > 0.0 {
            return PlaneIntersectionType::Front;
        }
        if plane.dot_coordinate(positive_vertex) < 0.0 {
            return PlaneIntersectionType::Back;
        }
        PlaneIntersectionType::Intersecting
    }

    pub fn intersects_ray(&self, ray: &Ray) -> Option<Float> {
        ray.intersects_box(self)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = (self.min, self.max);
        write_components(f, &[lo.x, lo.y, lo.z, hi.x, hi.y, hi.z])
    }
}

impl FromStr for BoundingBox {
    type Err = GeometryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x0, y0, z0, x1, y1, z1] = parse_components::<6>(s)?;
        Ok(BoundingBox::new(Vector3::new(x0, y0, z0), Vector3::new(x1, y1, z1)))
    }
}

#[cfg(test)]
#[path = "bounding_box_tests.rs"]
mod tests;
