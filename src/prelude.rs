/*

This is intended to quickly import commonly used modules across
the bounding volume crate.

@date: 8 Nov, 2025
@author: bartu
*/

// Almost every module uses tracing, so I'm adding it here
pub use tracing::{info, error, warn, debug};

pub use crate::numeric::{*};
pub use crate::containment::{ContainmentType, PlaneIntersectionType};
