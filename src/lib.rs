/*

    Bounding volumes and frustum culling.

    Boxes, spheres and view frustums that can be tested
    against each other, against planes and against rays.

    @date: 8 Nov, 2025
    @author: bartu
*/

pub mod numeric;
pub mod interval;
pub mod containment;
pub mod error;
pub mod text;
pub mod json_parser;
pub mod plane;
pub mod ray;
pub mod bounding_box;
pub mod bounding_sphere;
pub mod bounding_frustum;
pub mod camera;
pub mod culling;

pub mod prelude;

pub use bounding_box::BoundingBox;
pub use bounding_frustum::BoundingFrustum;
pub use bounding_sphere::BoundingSphere;
pub use containment::{ContainmentType, PlaneIntersectionType};
pub use error::{GeometryError, GeomResult, LoadError};
pub use plane::Plane;
pub use ray::Ray;
