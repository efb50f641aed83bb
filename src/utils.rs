//! Miscellaneous utilities.

use crate::math::{Matrix, Point, Real, Rotation, Vector};
use approx::{AbsDiffEq, RelativeEq};
use na::Unit;
use std::ops::Mul;

/// Scalars with an absolute value below this are treated as zero by [`is_zero_approx`].
pub const APPROX_EPSILON: Real = 1.0e-5;

/// Computes the inverse of `val`, or zero if `val` is (almost) zero.
pub fn inv(val: Real) -> Real {
    if val.abs() <= 1.0e-20 {
        0.0
    } else {
        1.0 / val
    }
}

/// Is `val` close enough to zero to be considered null?
#[inline]
pub fn is_zero_approx(val: Real) -> bool {
    val.abs() < APPROX_EPSILON
}

/// Normalizes `v`, or returns the zero vector if `v` has a zero length.
#[inline]
pub fn normalize_or_zero(v: &Vector<Real>) -> Vector<Real> {
    let norm = v.norm();
    if norm == 0.0 {
        Vector::zeros()
    } else {
        v / norm
    }
}

/// Gram-Schmidt orthonormalization of the columns of `basis`.
///
/// The first column keeps its direction, the second is made orthogonal to it, and the third is
/// made orthogonal to both. Scale is discarded.
pub fn orthonormalized_basis(basis: &Matrix<Real>) -> Matrix<Real> {
    let x = normalize_or_zero(&basis.column(0).into_owned());
    let y = basis.column(1).into_owned();
    let y = normalize_or_zero(&(y - x * x.dot(&y)));
    let z = basis.column(2).into_owned();
    let z = normalize_or_zero(&(z - x * x.dot(&z) - y * y.dot(&z)));
    Matrix::from_columns(&[x, y, z])
}

/// The rotation matrix of `angle` radians around the unit vector `axis`.
pub fn rotation_from_axis_angle(axis: &Vector<Real>, angle: Real) -> Matrix<Real> {
    Rotation::from_axis_angle(&Unit::new_unchecked(*axis), angle).into_inner()
}

/// An affine 3D transform: a linear `basis` (rotation, possibly with scale and shear) followed
/// by a translation to `origin`.
///
/// Points are mapped as `basis * p + origin`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// The linear part of the transform. Its columns are the images of the local axes.
    pub basis: Matrix<Real>,
    /// The translational part of the transform.
    pub origin: Vector<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates a transform from its basis and origin.
    pub fn new(basis: Matrix<Real>, origin: Vector<Real>) -> Self {
        Self { basis, origin }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(Matrix::identity(), Vector::zeros())
    }

    /// A pure translation.
    pub fn from_translation(origin: Vector<Real>) -> Self {
        Self::new(Matrix::identity(), origin)
    }

    /// A rotation of `angle` radians around the unit vector `axis`, followed by a translation.
    pub fn from_axis_angle(axis: &Vector<Real>, angle: Real, origin: Vector<Real>) -> Self {
        Self::new(rotation_from_axis_angle(axis, angle), origin)
    }

    /// Maps the point `pt` through this transform.
    #[inline]
    pub fn xform(&self, pt: &Vector<Real>) -> Vector<Real> {
        self.basis * pt + self.origin
    }

    /// Maps the point `pt` through this transform.
    #[inline]
    pub fn xform_point(&self, pt: &Point<Real>) -> Point<Real> {
        Point::from(self.xform(&pt.coords))
    }

    /// Maps a direction through the linear part of this transform only.
    #[inline]
    pub fn xform_vector(&self, v: &Vector<Real>) -> Vector<Real> {
        self.basis * v
    }

    /// The inverse of this transform, assuming its basis is orthonormal.
    pub fn inverse(&self) -> Self {
        let basis = self.basis.transpose();
        Self::new(basis, basis * -self.origin)
    }

    /// The inverse of this transform for an arbitrary invertible basis.
    ///
    /// A singular basis yields a zero basis.
    pub fn affine_inverse(&self) -> Self {
        let basis = self.basis.try_inverse().unwrap_or_else(Matrix::zeros);
        Self::new(basis, basis * -self.origin)
    }

    /// Orthonormalizes the basis of this transform in-place.
    pub fn orthonormalize(&mut self) {
        self.basis = orthonormalized_basis(&self.basis);
    }

    /// A copy of this transform with an orthonormalized basis.
    pub fn orthonormalized(&self) -> Self {
        Self::new(orthonormalized_basis(&self.basis), self.origin)
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform::new(self.basis * rhs.basis, self.xform(&rhs.origin))
    }
}

impl AbsDiffEq for Transform {
    type Epsilon = Real;

    fn default_epsilon() -> Self::Epsilon {
        <Real as AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.basis.abs_diff_eq(&other.basis, epsilon)
            && self.origin.abs_diff_eq(&other.origin, epsilon)
    }
}

impl RelativeEq for Transform {
    fn default_max_relative() -> Self::Epsilon {
        <Real as RelativeEq>::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.basis.relative_eq(&other.basis, epsilon, max_relative)
            && self.origin.relative_eq(&other.origin, epsilon, max_relative)
    }
}
