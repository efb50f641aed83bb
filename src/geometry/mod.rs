//! Structures related to the shapes and areas a body queries.
//!
//! The geometry itself (collision detection, bounding volumes) lives outside of this crate:
//! only the quantities needed by the dynamics are exposed here.

pub use self::area::{Area, AreaHandle, AreaQuery, AreaSet, AreaSpaceOverrideMode};
pub use self::shape::{Ball, BodyShape, Cuboid, Shape};

mod area;
mod shape;
