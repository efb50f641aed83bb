//! Computation of the mass distribution of a body from its shapes.

use crate::dynamics::{BodyMassProps, BodyMode};
use crate::geometry::BodyShape;
use crate::math::{AngVector, AngularInertia, Matrix, Point, Real, Vector};
use crate::utils::{self, Transform};
use num::Zero;

fn enabled_shapes(shapes: &[BodyShape]) -> impl Iterator<Item = &BodyShape> {
    shapes.iter().filter(|s| !s.disabled)
}

/// The sum of the area measures of the enabled shapes.
pub fn total_area(shapes: &[BodyShape]) -> Real {
    enabled_shapes(shapes).map(|s| s.shape.area()).sum()
}

/// The local center of mass of a body whose mass is distributed among its enabled shapes
/// proportionally to their area.
///
/// Each shape's origin is taken as its own center of mass. Returns the local origin if the total
/// area is zero.
pub fn compute_center_of_mass(shapes: &[BodyShape]) -> Point<Real> {
    let total_area = total_area(shapes);

    if total_area == 0.0 {
        return Point::origin();
    }

    let com = enabled_shapes(shapes).fold(Vector::zeros(), |acc, s| {
        acc + s.transform.origin * (s.shape.area() / total_area)
    });
    Point::from(com)
}

/// The local inertia tensor of a body of the given mass, about `center_of_mass_local`.
///
/// Shapes with a zero area are skipped. If no shape contributes, the identity tensor is returned
/// so that the body still has a usable inertia.
pub fn compute_inertia_tensor(
    shapes: &[BodyShape],
    mass: Real,
    center_of_mass_local: &Point<Real>,
) -> AngularInertia<Real> {
    let total_area = total_area(shapes);
    let mut tensor = AngularInertia::zero();
    let mut inertia_set = false;

    for s in enabled_shapes(shapes) {
        let area = s.shape.area();
        if area == 0.0 {
            continue;
        }

        inertia_set = true;
        let shape_mass = area * mass / total_area;
        let basis = utils::orthonormalized_basis(&s.transform.basis);
        let principal = Matrix::from_diagonal(&s.shape.moment_of_inertia(shape_mass));
        let offset = s.transform.origin - center_of_mass_local.coords;
        // Parallel axis theorem.
        let shift = Matrix::identity() * offset.norm_squared() - offset * offset.transpose();

        tensor += basis * principal * basis.transpose() + shift * shape_mass;
    }

    if inertia_set {
        tensor
    } else {
        AngularInertia::identity()
    }
}

/// Replaces the diagonal entries of `tensor` by the strictly positive components of `inertia`.
pub fn apply_inertia_override(tensor: &mut AngularInertia<Real>, inertia: &Vector<Real>) {
    for i in 0..3 {
        if inertia[i] > 0.0 {
            tensor[(i, i)] = inertia[i];
        }
    }
}

/// Diagonalizes a symmetric inertia tensor.
///
/// Returns the principal axes (as the columns of a proper rotation matrix) and the inverse of
/// the principal inertia along each of them. A zero principal inertia has a zero inverse.
pub fn diagonalize_inertia(tensor: &AngularInertia<Real>) -> (Matrix<Real>, AngVector<Real>) {
    let eigen = tensor.symmetric_eigen();
    let mut axes = eigen.eigenvectors;

    if axes.determinant() < 0.0 {
        let flipped = -axes.column(2);
        axes.set_column(2, &flipped);
    }

    (axes, eigen.eigenvalues.map(utils::inv))
}

/// Recomputes the local center of mass and principal inertia of `mprops` from `shapes`, for
/// each of them flagged as automatically computed.
pub fn compute_mass_properties(shapes: &[BodyShape], mprops: &mut BodyMassProps) {
    if mprops.calculate_center_of_mass {
        mprops.center_of_mass_local = compute_center_of_mass(shapes);
    }

    if mprops.calculate_inertia {
        let mut tensor = compute_inertia_tensor(shapes, mprops.mass, &mprops.center_of_mass_local);
        apply_inertia_override(&mut tensor, &mprops.inertia);
        let (axes, inv_inertia) = diagonalize_inertia(&tensor);
        mprops.principal_inertia_axes_local = axes;
        mprops.inv_inertia = inv_inertia;
    }
}

impl BodyMassProps {
    /// Recomputes every mass property of a body in the given mode, then its world-space
    /// counterparts.
    pub fn update_mass_properties(
        &mut self,
        mode: BodyMode,
        shapes: &[BodyShape],
        transform: &Transform,
    ) {
        match mode {
            BodyMode::Dynamic => {
                compute_mass_properties(shapes, self);
                self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
            }
            BodyMode::Static | BodyMode::Kinematic => {
                self.inv_inertia = AngVector::zeros();
                self.inv_mass = 0.0;
            }
            BodyMode::DynamicLinear => {
                self.inv_inertia = AngVector::zeros();
                self.inv_mass = 1.0 / self.mass;
            }
        }

        self.update_transform_dependent(transform);
    }
}
