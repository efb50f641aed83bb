use crate::math::{Real, Vector};
use crate::utils::Transform;
use std::fmt::Debug;
use std::sync::Arc;

/// The queries a body needs from a shape to compute its mass distribution.
///
/// Both quantities are expressed in the local-space of the shape, whose origin is taken as its
/// center of mass.
pub trait Shape: Debug + Send + Sync {
    /// The measure used to distribute the mass of a body among its shapes.
    ///
    /// The implementations provided here return the volume of the local bounding box.
    fn area(&self) -> Real;

    /// The principal moments of inertia of this shape, along its local axes, for the given mass.
    fn moment_of_inertia(&self, mass: Real) -> Vector<Real>;
}

/// A ball shape.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a ball with the given radius.
    pub fn new(radius: Real) -> Self {
        Self { radius }
    }
}

impl Shape for Ball {
    fn area(&self) -> Real {
        let extent = self.radius * 2.0;
        extent * extent * extent
    }

    fn moment_of_inertia(&self, mass: Real) -> Vector<Real> {
        let i = self.radius * self.radius * 2.0 / 5.0;
        Vector::repeat(i * mass)
    }
}

/// A box shape, centered at its local origin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Cuboid {
    /// The half-extents of the box along each local axis.
    pub half_extents: Vector<Real>,
}

impl Cuboid {
    /// Creates a box with the given half-extents.
    pub fn new(half_extents: Vector<Real>) -> Self {
        Self { half_extents }
    }
}

impl Shape for Cuboid {
    fn area(&self) -> Real {
        self.half_extents.x * self.half_extents.y * self.half_extents.z * 8.0
    }

    fn moment_of_inertia(&self, mass: Real) -> Vector<Real> {
        let ix = (self.half_extents.x * self.half_extents.x) / 3.0;
        let iy = (self.half_extents.y * self.half_extents.y) / 3.0;
        let iz = (self.half_extents.z * self.half_extents.z) / 3.0;

        Vector::new(iy + iz, ix + iz, ix + iy) * mass
    }
}

/// A shape attached to a body.
#[derive(Clone, Debug)]
pub struct BodyShape {
    /// The shape itself. It is shared, the body does not own its geometry.
    pub shape: Arc<dyn Shape>,
    /// The pose of the shape relative to the body.
    pub transform: Transform,
    /// Disabled shapes do not contribute to the mass distribution.
    pub disabled: bool,
}

impl BodyShape {
    /// An enabled shape attached at `transform`.
    pub fn new(shape: Arc<dyn Shape>, transform: Transform) -> Self {
        Self {
            shape,
            transform,
            disabled: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cuboid_inertia() {
        let cuboid = Cuboid::new(Vector::new(1.0, 2.0, 3.0));
        assert_relative_eq!(cuboid.area(), 48.0);
        assert_relative_eq!(
            cuboid.moment_of_inertia(3.0),
            Vector::new(13.0, 10.0, 5.0),
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn ball_inertia() {
        let ball = Ball::new(0.5);
        assert_relative_eq!(ball.area(), 1.0);
        assert_relative_eq!(ball.moment_of_inertia(10.0), Vector::repeat(1.0));
    }
}
