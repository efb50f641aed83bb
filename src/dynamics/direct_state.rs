use crate::dynamics::Body;
use crate::math::{AngVector, AngularInertia, Matrix, Point, Real, Vector};
use crate::utils::Transform;

/// A snapshot of the state of a body, handed to its callbacks.
///
/// The snapshot is created lazily the first time a callback needs it, then reused and refreshed
/// before every dispatch. Velocities, forces, impulses and the sleep state written here are
/// applied back to the body once the callback returns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectBodyState {
    pub(crate) transform: Transform,
    pub(crate) linvel: Vector<Real>,
    pub(crate) angvel: AngVector<Real>,
    pub(crate) center_of_mass: Point<Real>,
    pub(crate) center_of_mass_local: Point<Real>,
    pub(crate) principal_inertia_axes: Matrix<Real>,
    pub(crate) inv_mass: Real,
    pub(crate) inv_inertia: AngVector<Real>,
    pub(crate) inv_inertia_tensor: AngularInertia<Real>,
    pub(crate) total_gravity: Vector<Real>,
    pub(crate) total_linear_damp: Real,
    pub(crate) total_angular_damp: Real,
    pub(crate) step: Real,
    pub(crate) sleeping: bool,
    pub(crate) contact_count: usize,
    pub(crate) added_force: Vector<Real>,
    pub(crate) added_torque: AngVector<Real>,
}

impl DirectBodyState {
    /// Overwrites this snapshot with the current state of `body`.
    pub(crate) fn read_from(&mut self, body: &Body, step: Real) {
        let mprops = &body.mprops;

        self.transform = body.pos.transform;
        self.linvel = body.vels.linvel;
        self.angvel = body.vels.angvel;
        self.center_of_mass = mprops.center_of_mass;
        self.center_of_mass_local = mprops.center_of_mass_local;
        self.principal_inertia_axes = mprops.principal_inertia_axes;
        self.inv_mass = mprops.inv_mass;
        self.inv_inertia = mprops.inv_inertia;
        self.inv_inertia_tensor = mprops.inv_inertia_tensor;
        self.total_gravity = body.forces.gravity;
        self.total_linear_damp = body.damping.area_linear_damp;
        self.total_angular_damp = body.damping.area_angular_damp;
        self.step = step;
        self.sleeping = !body.activation.active;
        self.contact_count = body.contact_count;
        self.added_force = Vector::zeros();
        self.added_torque = AngVector::zeros();
    }

    fn center_of_mass_offset(&self) -> Vector<Real> {
        self.center_of_mass.coords - self.transform.origin
    }

    /// The transform of the body.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The linear velocity of the body.
    pub fn linear_velocity(&self) -> Vector<Real> {
        self.linvel
    }

    /// Sets the linear velocity of the body.
    pub fn set_linear_velocity(&mut self, linvel: Vector<Real>) {
        self.linvel = linvel;
    }

    /// The angular velocity of the body.
    pub fn angular_velocity(&self) -> AngVector<Real> {
        self.angvel
    }

    /// Sets the angular velocity of the body.
    pub fn set_angular_velocity(&mut self, angvel: AngVector<Real>) {
        self.angvel = angvel;
    }

    /// The world-space center of mass.
    pub fn center_of_mass(&self) -> Point<Real> {
        self.center_of_mass
    }

    /// The local-space center of mass.
    pub fn center_of_mass_local(&self) -> Point<Real> {
        self.center_of_mass_local
    }

    /// The world-space principal axes of inertia.
    pub fn principal_inertia_axes(&self) -> &Matrix<Real> {
        &self.principal_inertia_axes
    }

    /// The inverse mass of the body.
    pub fn inverse_mass(&self) -> Real {
        self.inv_mass
    }

    /// The inverse principal inertia of the body.
    pub fn inverse_inertia(&self) -> AngVector<Real> {
        self.inv_inertia
    }

    /// The world-space inverse inertia tensor.
    pub fn inverse_inertia_tensor(&self) -> &AngularInertia<Real> {
        &self.inv_inertia_tensor
    }

    /// The gravity applied during the last step, gravity scale included.
    pub fn total_gravity(&self) -> Vector<Real> {
        self.total_gravity
    }

    /// The linear damping applied during the last step.
    pub fn total_linear_damp(&self) -> Real {
        self.total_linear_damp
    }

    /// The angular damping applied during the last step.
    pub fn total_angular_damp(&self) -> Real {
        self.total_angular_damp
    }

    /// The length of the last step.
    pub fn step(&self) -> Real {
        self.step
    }

    /// The number of contacts reported to the body during the last step.
    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Is the body asleep?
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Puts the body to sleep, or wakes it up.
    pub fn set_sleep_state(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    /// The velocity of the point at `position`, expressed relative to the body origin.
    pub fn velocity_at_local_position(&self, position: &Vector<Real>) -> Vector<Real> {
        self.linvel + self.angvel.cross(&(position - self.center_of_mass_offset()))
    }

    /// Applies an impulse at the center of mass.
    pub fn apply_central_impulse(&mut self, impulse: &Vector<Real>) {
        self.linvel += impulse * self.inv_mass;
    }

    /// Applies an impulse at `position`, expressed relative to the body origin.
    pub fn apply_impulse(&mut self, impulse: &Vector<Real>, position: &Vector<Real>) {
        let torque_impulse = (position - self.center_of_mass_offset()).cross(impulse);
        self.linvel += impulse * self.inv_mass;
        self.angvel += self.inv_inertia_tensor * torque_impulse;
    }

    /// Applies an angular impulse.
    pub fn apply_torque_impulse(&mut self, torque_impulse: &AngVector<Real>) {
        self.angvel += self.inv_inertia_tensor * torque_impulse;
    }

    /// Adds a force at the center of mass, integrated during the next step.
    pub fn apply_central_force(&mut self, force: &Vector<Real>) {
        self.added_force += force;
    }

    /// Adds a force at `position`, expressed relative to the body origin, integrated during the
    /// next step.
    pub fn apply_force(&mut self, force: &Vector<Real>, position: &Vector<Real>) {
        self.added_force += force;
        self.added_torque += (position - self.center_of_mass_offset()).cross(force);
    }

    /// Adds a torque, integrated during the next step.
    pub fn apply_torque(&mut self, torque: &AngVector<Real>) {
        self.added_torque += torque;
    }
}
