//! # body3d
//!
//! `body3d` is the dynamics core of a single 3D body: it computes the mass distribution of a
//! static, kinematic or dynamic body from its shapes, folds the influence of overlapping
//! gravity/damping areas into its forces, integrates forces into velocities and velocities into
//! a new transform, and manages its active/sleeping lifecycle.
//!
//! Collision detection, contact and constraint solving are left to external collaborators: the
//! body only consumes shape, area and constraint-adjacency queries, and exposes the hooks
//! (biased velocities, contact counts, swept motion) such a solver needs.

#![deny(bare_trait_objects)]
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]

pub extern crate nalgebra as na;
#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub(crate) const INVALID_U32: u32 = u32::MAX;

/// The string version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data;
pub mod dynamics;
pub mod error_handler;
pub mod geometry;
pub mod pipeline;
pub mod utils;

/// Elementary mathematical entities (vectors, matrices, transforms, etc).
pub mod math {
    pub use crate::utils::Transform;

    /// The scalar type used throughout this crate.
    #[cfg(not(feature = "f64"))]
    pub type Real = f32;
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub type Real = f64;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The vector type.
    pub type Vector<N> = na::Vector3<N>;
    /// The angular vector type.
    pub type AngVector<N> = na::Vector3<N>;
    /// The point type.
    pub type Point<N> = na::Point3<N>;
    /// The 3x3 matrix type, used for bases and inertia tensors.
    pub type Matrix<N> = na::Matrix3<N>;
    /// The rotation matrix type.
    pub type Rotation<N> = na::Rotation3<N>;
    /// The world-space angular inertia type.
    pub type AngularInertia<N> = na::Matrix3<N>;
}

/// Prelude containing the common types defined by this crate.
pub mod prelude {
    pub use crate::dynamics::*;
    pub use crate::geometry::*;
    pub use crate::math::*;
    pub use crate::pipeline::*;
    pub use na::{matrix, point, vector};
    pub extern crate nalgebra;
}
