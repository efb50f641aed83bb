use crate::geometry::AreaHandle;
use crate::math::{AngVector, AngularInertia, Matrix, Point, Real, Vector};
use crate::utils::Transform;
use num::Zero;

/// The unique handle of a body added to a `BodySet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct BodyHandle(pub crate::data::arena::Index);

impl BodyHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs an handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(crate::data::arena::Index::from_raw_parts(id, generation))
    }

    /// An always-invalid body handle.
    pub fn invalid() -> Self {
        Self::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32)
    }
}

/// The simulation mode of a body, determining how it responds to forces.
///
/// Modes are ordered: every mode comparing greater or equal to [`BodyMode::Dynamic`] is moved by
/// forces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyMode {
    /// Never moves and is never active.
    Static,
    /// Moved by setting its next transform. Never moved by forces.
    Kinematic,
    /// Fully simulated: forces, torques and gravity affect its motion.
    #[default]
    Dynamic,
    /// Simulated like `Dynamic`, but forces never make it rotate.
    DynamicLinear,
}

impl BodyMode {
    /// Is this the static mode?
    pub fn is_static(self) -> bool {
        self == BodyMode::Static
    }

    /// Is this the kinematic mode?
    pub fn is_kinematic(self) -> bool {
        self == BodyMode::Kinematic
    }

    /// Is this mode moved by forces?
    pub fn is_dynamic(self) -> bool {
        self >= BodyMode::Dynamic
    }
}

bitflags::bitflags! {
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
    /// Degrees of freedom a body is not allowed to move along.
    ///
    /// A locked axis has its velocity (and biased velocity) zeroed before every velocity
    /// integration.
    pub struct LockedAxes: u8 {
        /// Prevents translation along the X axis.
        const TRANSLATION_LOCKED_X = 1 << 0;
        /// Prevents translation along the Y axis.
        const TRANSLATION_LOCKED_Y = 1 << 1;
        /// Prevents translation along the Z axis.
        const TRANSLATION_LOCKED_Z = 1 << 2;
        /// Prevents any translation.
        const TRANSLATION_LOCKED = Self::TRANSLATION_LOCKED_X.bits() | Self::TRANSLATION_LOCKED_Y.bits() | Self::TRANSLATION_LOCKED_Z.bits();
        /// Prevents rotation around the X axis.
        const ROTATION_LOCKED_X = 1 << 3;
        /// Prevents rotation around the Y axis.
        const ROTATION_LOCKED_Y = 1 << 4;
        /// Prevents rotation around the Z axis.
        const ROTATION_LOCKED_Z = 1 << 5;
        /// Prevents any rotation.
        const ROTATION_LOCKED = Self::ROTATION_LOCKED_X.bits() | Self::ROTATION_LOCKED_Y.bits() | Self::ROTATION_LOCKED_Z.bits();
    }
}

impl LockedAxes {
    /// The flag locking the translation along the `i`-th axis.
    pub fn translation_axis(i: usize) -> Self {
        Self::from_bits_truncate(1 << i)
    }

    /// The flag locking the rotation around the `i`-th axis.
    pub fn rotation_axis(i: usize) -> Self {
        Self::from_bits_truncate(1 << (i + 3))
    }
}

/// The mass distribution of a body, both in its local-space and in world-space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyMassProps {
    /// The total mass. Always strictly positive.
    pub mass: Real,
    /// Per-axis principal inertia override. A component `<= 0` requests automatic computation.
    pub inertia: Vector<Real>,
    /// Is the inertia computed from the shapes?
    pub calculate_inertia: bool,
    /// Is the center of mass computed from the shapes?
    pub calculate_center_of_mass: bool,
    /// The center of mass, in the body's local-space.
    pub center_of_mass_local: Point<Real>,
    /// The principal axes of inertia, as the columns of a rotation in the body's local-space.
    pub principal_inertia_axes_local: Matrix<Real>,
    /// The inverse of the mass. Zero for static and kinematic bodies.
    pub inv_mass: Real,
    /// The inverse principal inertia along `principal_inertia_axes_local`.
    ///
    /// A zero component stands for an infinite inertia.
    pub inv_inertia: AngVector<Real>,
    /// The center of mass, in world-space.
    pub center_of_mass: Point<Real>,
    /// The principal axes of inertia, in world-space.
    pub principal_inertia_axes: Matrix<Real>,
    /// The inverse inertia tensor, in world-space.
    pub inv_inertia_tensor: AngularInertia<Real>,
}

impl Default for BodyMassProps {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: Vector::zeros(),
            calculate_inertia: true,
            calculate_center_of_mass: true,
            center_of_mass_local: Point::origin(),
            principal_inertia_axes_local: Matrix::identity(),
            inv_mass: 1.0,
            inv_inertia: AngVector::zeros(),
            center_of_mass: Point::origin(),
            principal_inertia_axes: Matrix::identity(),
            inv_inertia_tensor: AngularInertia::zero(),
        }
    }
}

impl BodyMassProps {
    /// Refreshes the world-space center of mass, principal axes and inverse inertia tensor
    /// from their local-space counterparts and the body's transform.
    ///
    /// This is idempotent for a fixed transform and local mass properties.
    pub fn update_transform_dependent(&mut self, transform: &Transform) {
        self.center_of_mass = transform.xform_point(&self.center_of_mass_local);
        self.principal_inertia_axes = transform.basis * self.principal_inertia_axes_local;

        let axes = &self.principal_inertia_axes;
        self.inv_inertia_tensor =
            axes * Matrix::from_diagonal(&self.inv_inertia) * axes.transpose();
    }

    /// The world-space center of mass relative to the body's origin.
    pub fn center_of_mass_offset(&self, transform: &Transform) -> Vector<Real> {
        self.center_of_mass.coords - transform.origin
    }
}

/// The current and target transforms of a body.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyPosition {
    /// The transform of the body.
    pub transform: Transform,
    /// The inverse of `transform`.
    pub inv_transform: Transform,
    /// The transform a kinematic body will reach at the end of the next step.
    pub new_transform: Transform,
}

impl BodyPosition {
    /// A position with the given transform, and an identical target.
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            inv_transform: transform.affine_inverse(),
            new_transform: transform,
        }
    }
}

/// The velocities of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyVelocity {
    /// The linear velocity.
    pub linvel: Vector<Real>,
    /// The angular velocity, as a rotation axis scaled by the rotation speed.
    pub angvel: AngVector<Real>,
    /// A position-correction velocity set by a solver, consumed by the next integration.
    pub biased_linvel: Vector<Real>,
    /// A position-correction angular velocity set by a solver, consumed by the next integration.
    pub biased_angvel: AngVector<Real>,
    /// A linear velocity kinematic bodies report in addition to the one implied by their motion.
    pub constant_linvel: Vector<Real>,
    /// An angular velocity kinematic bodies report in addition to the one implied by their motion.
    pub constant_angvel: AngVector<Real>,
}

impl Default for BodyVelocity {
    fn default() -> Self {
        Self::zero()
    }
}

impl BodyVelocity {
    /// All velocities set to zero.
    pub fn zero() -> Self {
        Self {
            linvel: Vector::zeros(),
            angvel: AngVector::zeros(),
            biased_linvel: Vector::zeros(),
            biased_angvel: AngVector::zeros(),
            constant_linvel: Vector::zeros(),
            constant_angvel: AngVector::zeros(),
        }
    }
}

/// The forces accumulated on a body, and the gravity acting on it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyForces {
    /// Force accumulated since the last step. Cleared by every force integration.
    pub applied_force: Vector<Real>,
    /// Torque accumulated since the last step. Cleared by every force integration.
    pub applied_torque: AngVector<Real>,
    /// The gravity resulting from the last area aggregation, already scaled.
    pub gravity: Vector<Real>,
    /// Multiplier applied to the aggregated gravity.
    pub gravity_scale: Real,
}

impl Default for BodyForces {
    fn default() -> Self {
        Self {
            applied_force: Vector::zeros(),
            applied_torque: AngVector::zeros(),
            gravity: Vector::zeros(),
            gravity_scale: 1.0,
        }
    }
}

/// The damping of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyDamping {
    /// The body's own linear damping. Negative values defer to the overlapping areas.
    pub linear_damp: Real,
    /// The body's own angular damping. Negative values defer to the overlapping areas.
    pub angular_damp: Real,
    /// The linear damping resulting from the last area aggregation.
    pub area_linear_damp: Real,
    /// The angular damping resulting from the last area aggregation.
    pub area_angular_damp: Real,
}

impl Default for BodyDamping {
    fn default() -> Self {
        Self {
            linear_damp: -1.0,
            angular_damp: -1.0,
            area_linear_damp: 0.0,
            area_angular_damp: 0.0,
        }
    }
}

/// The activation state of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyActivation {
    /// Is the body simulated during the next step?
    pub active: bool,
    /// Is the body allowed to fall asleep?
    pub can_sleep: bool,
    /// For how long the body velocities have stayed below the sleep thresholds.
    pub still_time: Real,
}

impl Default for BodyActivation {
    fn default() -> Self {
        Self {
            active: true,
            can_sleep: true,
            still_time: 0.0,
        }
    }
}

/// Continuous collision detection data of a body.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyCcd {
    /// Is the swept motion of this body reported at each step?
    pub enabled: bool,
    /// The motion computed by the last force integration, if any.
    pub pending_motion: Option<Vector<Real>>,
}

/// Surface parameters of a body, read by external contact solvers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyMaterial {
    /// Restitution coefficient.
    pub bounce: Real,
    /// Friction coefficient.
    pub friction: Real,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            bounce: 0.0,
            friction: 1.0,
        }
    }
}

/// An area overlapping a body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AreaOverlap {
    /// The overlapping area.
    pub area: AreaHandle,
    /// How many shapes of the body overlap this area.
    pub ref_count: u32,
}
