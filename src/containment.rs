/*

    Classification results shared by every bounding volume.

    @date: 20 Nov, 2025
    @author: Bartu
*/

use serde::{Deserialize, Serialize};

/// How one volume relates to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainmentType {
    /// No overlap at all
    Disjoint,
    /// Partial overlap
    Intersects,
    /// The queried object is fully enclosed
    Contains,
}

/// Which side of a plane an object lies on.
/// Front is the side the plane normal points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneIntersectionType {
    Front,
    Back,
    Intersecting,
}

impl ContainmentType {
    pub fn is_disjoint(self) -> bool {
        self == ContainmentType::Disjoint
    }
}
