use crate::dynamics::{
    AreaOverlap, BodyActivation, BodyCcd, BodyDamping, BodyError, BodyForces, BodyHandle,
    BodyListMembership, BodyLists, BodyMassProps, BodyMaterial, BodyMode, BodyParamValue,
    BodyParameter, BodyPosition, BodyState, BodyStateValue, BodyVelocity, ConstraintHandle,
    DirectBodyState, LockedAxes,
};
use crate::dynamics::callbacks::BodyCallbacks;
use crate::geometry::{AreaHandle, BodyShape, Shape};
use crate::math::{AngVector, Matrix, Point, Real, Vector};
use crate::utils::{self, Transform};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A static, kinematic or dynamic body.
///
/// To create a new body, use the [`BodyBuilder`] structure.
#[derive(Debug)]
pub struct Body {
    pub(crate) mode: BodyMode,
    pub(crate) pos: BodyPosition,
    pub(crate) mprops: BodyMassProps,
    pub(crate) vels: BodyVelocity,
    pub(crate) forces: BodyForces,
    pub(crate) damping: BodyDamping,
    pub(crate) activation: BodyActivation,
    pub(crate) ccd: BodyCcd,
    pub(crate) material: BodyMaterial,
    pub(crate) locked_axes: LockedAxes,
    pub(crate) shapes: Vec<BodyShape>,
    /// Sorted by increasing priority.
    pub(crate) area_overlaps: Vec<AreaOverlap>,
    /// Maps each constraint this body is part of to the body's index within that constraint.
    pub(crate) constraints: BTreeMap<ConstraintHandle, usize>,
    pub(crate) contact_count: usize,
    pub(crate) omit_force_integration: bool,
    pub(crate) first_time_kinematic: bool,
    pub(crate) handle: Option<BodyHandle>,
    pub(crate) membership: BodyListMembership,
    pub(crate) callbacks: BodyCallbacks,
    pub(crate) direct_state: Option<Box<DirectBodyState>>,
    /// User-defined data associated to this body.
    pub user_data: u128,
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    /// A detached dynamic body with a unit mass, at the origin.
    pub fn new() -> Self {
        Self {
            mode: BodyMode::Dynamic,
            pos: BodyPosition::default(),
            mprops: BodyMassProps::default(),
            vels: BodyVelocity::default(),
            forces: BodyForces::default(),
            damping: BodyDamping::default(),
            activation: BodyActivation::default(),
            ccd: BodyCcd::default(),
            material: BodyMaterial::default(),
            locked_axes: LockedAxes::empty(),
            shapes: Vec::new(),
            area_overlaps: Vec::new(),
            constraints: BTreeMap::new(),
            contact_count: 0,
            omit_force_integration: false,
            first_time_kinematic: false,
            handle: None,
            membership: BodyListMembership::empty(),
            callbacks: BodyCallbacks::default(),
            direct_state: None,
            user_data: 0,
        }
    }

    /// The handle of this body in its space, if it is attached to one.
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// The scheduling lists this body is currently registered in.
    pub fn list_membership(&self) -> BodyListMembership {
        self.membership
    }

    pub(crate) fn attach(&mut self, handle: BodyHandle, lists: &mut BodyLists) {
        self.handle = Some(handle);
        self.mass_properties_changed(lists);

        if self.activation.active {
            lists.add(BodyListMembership::ACTIVE, handle, &mut self.membership);
        }
    }

    pub(crate) fn detach(&mut self, lists: &mut BodyLists) {
        if let Some(handle) = self.handle.take() {
            lists.remove_from_all(handle, &mut self.membership);
        }
    }

    /*
     * Mass properties.
     */
    /// The mass properties of this body.
    #[inline]
    pub fn mass_properties(&self) -> &BodyMassProps {
        &self.mprops
    }

    /// The mass of this body.
    #[inline]
    pub fn mass(&self) -> Real {
        self.mprops.mass
    }

    /// The world-space center of mass of this body.
    #[inline]
    pub fn center_of_mass(&self) -> &Point<Real> {
        &self.mprops.center_of_mass
    }

    /// Requests a recomputation of the mass properties at the beginning of the next step.
    ///
    /// This is a no-op for a body that is not part of a space.
    pub(crate) fn mass_properties_changed(&mut self, lists: &mut BodyLists) {
        if let Some(handle) = self.handle {
            lists.add(
                BodyListMembership::MASS_PROPERTIES_UPDATE,
                handle,
                &mut self.membership,
            );
        }
    }

    /// Recomputes the mass properties of this body from its shapes, immediately.
    pub fn update_mass_properties(&mut self) {
        log::debug!("Updating the mass properties of {:?}.", self.handle);
        self.mprops
            .update_mass_properties(self.mode, &self.shapes, &self.pos.transform);
    }

    /// Re-enables the automatic computation of the inertia and center of mass.
    pub fn reset_mass_properties(&mut self, lists: &mut BodyLists) {
        self.mprops.calculate_inertia = true;
        self.mprops.calculate_center_of_mass = true;
        self.mass_properties_changed(lists);
    }

    /*
     * Shapes and overlapping areas.
     */
    /// The shapes attached to this body.
    pub fn shapes(&self) -> &[BodyShape] {
        &self.shapes
    }

    /// Attaches a shape to this body and returns its index.
    pub fn add_shape(
        &mut self,
        shape: Arc<dyn Shape>,
        transform: Transform,
        lists: &mut BodyLists,
    ) -> usize {
        self.shapes.push(BodyShape::new(shape, transform));
        self.mass_properties_changed(lists);
        self.shapes.len() - 1
    }

    /// Detaches the shape at `index`. The indices of the following shapes are shifted down.
    pub fn remove_shape(
        &mut self,
        index: usize,
        lists: &mut BodyLists,
    ) -> Result<BodyShape, BodyError> {
        if index >= self.shapes.len() {
            return Err(BodyError::InvalidShapeIndex(index));
        }

        let shape = self.shapes.remove(index);
        self.mass_properties_changed(lists);
        Ok(shape)
    }

    /// Moves the shape at `index` relative to this body.
    pub fn set_shape_transform(
        &mut self,
        index: usize,
        transform: Transform,
        lists: &mut BodyLists,
    ) -> Result<(), BodyError> {
        let shape = self
            .shapes
            .get_mut(index)
            .ok_or(BodyError::InvalidShapeIndex(index))?;
        shape.transform = transform;
        self.mass_properties_changed(lists);
        Ok(())
    }

    /// Enables or disables the shape at `index`.
    pub fn set_shape_disabled(
        &mut self,
        index: usize,
        disabled: bool,
        lists: &mut BodyLists,
    ) -> Result<(), BodyError> {
        let shape = self
            .shapes
            .get_mut(index)
            .ok_or(BodyError::InvalidShapeIndex(index))?;
        shape.disabled = disabled;
        self.mass_properties_changed(lists);
        Ok(())
    }

    /// The areas overlapping this body.
    ///
    /// They are sorted by decreasing priority during each force integration, and kept in
    /// registration order among equal priorities.
    pub fn area_overlaps(&self) -> &[AreaOverlap] {
        &self.area_overlaps
    }

    /// Records one more overlap between this body and `area`.
    ///
    /// Overlaps are reference-counted: a body overlapping an area with several shapes must
    /// report each of them, and remove each of them.
    pub fn add_area(&mut self, area: AreaHandle) {
        if let Some(overlap) = self.area_overlaps.iter_mut().find(|o| o.area == area) {
            overlap.ref_count += 1;
            return;
        }

        self.area_overlaps.push(AreaOverlap { area, ref_count: 1 });
    }

    /// Records one less overlap between this body and `area`.
    pub fn remove_area(&mut self, area: AreaHandle) {
        if let Some(i) = self.area_overlaps.iter().position(|o| o.area == area) {
            self.area_overlaps[i].ref_count -= 1;
            if self.area_overlaps[i].ref_count == 0 {
                self.area_overlaps.remove(i);
            }
        }
    }

    /// The constraints this body is part of, with the index of this body within each of them.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintHandle, usize)> + '_ {
        self.constraints.iter().map(|(h, i)| (*h, *i))
    }

    pub(crate) fn add_constraint(&mut self, constraint: ConstraintHandle, index: usize) {
        self.constraints.insert(constraint, index);
    }

    pub(crate) fn remove_constraint(&mut self, constraint: ConstraintHandle) {
        self.constraints.remove(&constraint);
    }

    /*
     * Kinematics.
     */
    /// The transform of this body.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.pos.transform
    }

    /// The inverse of the transform of this body.
    #[inline]
    pub fn inv_transform(&self) -> &Transform {
        &self.pos.inv_transform
    }

    /// The transform a kinematic body moves to during the next step.
    #[inline]
    pub fn new_transform(&self) -> &Transform {
        &self.pos.new_transform
    }

    /// The linear velocity of this body.
    #[inline]
    pub fn linvel(&self) -> &Vector<Real> {
        &self.vels.linvel
    }

    /// The angular velocity of this body.
    #[inline]
    pub fn angvel(&self) -> &AngVector<Real> {
        &self.vels.angvel
    }

    /// The velocities of this body.
    #[inline]
    pub fn velocities(&self) -> &BodyVelocity {
        &self.vels
    }

    /// Sets the position-correction linear velocity consumed by the next velocity integration.
    pub fn set_biased_linvel(&mut self, linvel: Vector<Real>) {
        self.vels.biased_linvel = linvel;
    }

    /// Sets the position-correction angular velocity consumed by the next velocity integration.
    pub fn set_biased_angvel(&mut self, angvel: AngVector<Real>) {
        self.vels.biased_angvel = angvel;
    }

    /// The velocity of the point at `position`, expressed relative to the body origin.
    pub fn velocity_at_local_position(&self, position: &Vector<Real>) -> Vector<Real> {
        let offset = self.mprops.center_of_mass_offset(&self.pos.transform);
        self.vels.linvel + self.vels.angvel.cross(&(position - offset))
    }

    /*
     * Forces.
     */
    /// The gravity applied during the last step, gravity scale included.
    #[inline]
    pub fn gravity(&self) -> &Vector<Real> {
        &self.forces.gravity
    }

    /// The force accumulated since the last step.
    #[inline]
    pub fn applied_force(&self) -> &Vector<Real> {
        &self.forces.applied_force
    }

    /// The torque accumulated since the last step.
    #[inline]
    pub fn applied_torque(&self) -> &AngVector<Real> {
        &self.forces.applied_torque
    }

    /// Adds a force at the center of mass of this body.
    pub fn apply_central_force(&mut self, force: &Vector<Real>) {
        self.forces.applied_force += force;
    }

    /// Adds a force at `position`, expressed relative to the body origin.
    pub fn apply_force(&mut self, force: &Vector<Real>, position: &Vector<Real>) {
        let offset = self.mprops.center_of_mass_offset(&self.pos.transform);
        self.forces.applied_force += force;
        self.forces.applied_torque += (position - offset).cross(force);
    }

    /// Adds a torque to this body.
    pub fn apply_torque(&mut self, torque: &AngVector<Real>) {
        self.forces.applied_torque += torque;
    }

    /// Applies an impulse at the center of mass of this body.
    pub fn apply_central_impulse(&mut self, impulse: &Vector<Real>) {
        self.vels.linvel += impulse * self.mprops.inv_mass;
    }

    /// Applies an impulse at `position`, expressed relative to the body origin.
    pub fn apply_impulse(&mut self, impulse: &Vector<Real>, position: &Vector<Real>) {
        let offset = self.mprops.center_of_mass_offset(&self.pos.transform);
        self.vels.linvel += impulse * self.mprops.inv_mass;
        self.vels.angvel += self.mprops.inv_inertia_tensor * (position - offset).cross(impulse);
    }

    /// Applies an angular impulse to this body.
    pub fn apply_torque_impulse(&mut self, torque_impulse: &AngVector<Real>) {
        self.vels.angvel += self.mprops.inv_inertia_tensor * torque_impulse;
    }

    /// The linear damping applied during the last step.
    pub fn total_linear_damp(&self) -> Real {
        self.damping.area_linear_damp
    }

    /// The angular damping applied during the last step.
    pub fn total_angular_damp(&self) -> Real {
        self.damping.area_angular_damp
    }

    /// Does a force-integration callback own the velocity update of this body?
    pub fn omit_force_integration(&self) -> bool {
        self.omit_force_integration
    }

    /// If `true`, gravity, damping and applied forces are no longer integrated: the
    /// force-integration callback is expected to update the velocities itself.
    pub fn set_omit_force_integration(&mut self, omit: bool) {
        self.omit_force_integration = omit;
    }

    /*
     * Contacts, continuous collision detection, locked axes.
     */
    /// Reports one more contact involving this body during the current step.
    pub fn add_contact(&mut self) {
        self.contact_count += 1;
    }

    /// The number of contacts reported since the last force integration.
    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Is the swept motion of this body reported at each step?
    pub fn is_ccd_enabled(&self) -> bool {
        self.ccd.enabled
    }

    /// Enables or disables the report of the swept motion of this body.
    pub fn enable_ccd(&mut self, enabled: bool) {
        self.ccd.enabled = enabled;
    }

    /// The motion computed by the last force integration, if any.
    pub fn pending_motion(&self) -> Option<&Vector<Real>> {
        self.ccd.pending_motion.as_ref()
    }

    /// The locked degrees of freedom of this body.
    pub fn locked_axes(&self) -> LockedAxes {
        self.locked_axes
    }

    /// Locks or unlocks the given degrees of freedom.
    pub fn set_axis_lock(&mut self, axes: LockedAxes, lock: bool) {
        self.locked_axes.set(axes, lock);
    }

    /// Are all the given degrees of freedom locked?
    pub fn is_axis_locked(&self, axes: LockedAxes) -> bool {
        self.locked_axes.contains(axes)
    }

    /*
     * Mode, parameters and state.
     */
    /// The simulation mode of this body.
    pub fn mode(&self) -> BodyMode {
        self.mode
    }

    /// Is this body static?
    pub fn is_static(&self) -> bool {
        self.mode.is_static()
    }

    /// Is this body kinematic?
    pub fn is_kinematic(&self) -> bool {
        self.mode.is_kinematic()
    }

    /// Is this body moved by forces?
    pub fn is_dynamic(&self) -> bool {
        self.mode.is_dynamic()
    }

    fn inv_mass_of_dynamic(&self) -> Real {
        if self.mprops.mass > 0.0 {
            1.0 / self.mprops.mass
        } else {
            0.0
        }
    }

    fn use_inertia_override(&mut self) {
        self.mprops.principal_inertia_axes_local = Matrix::identity();
        self.mprops.inv_inertia = self.mprops.inertia.map(utils::inv);
    }

    /// Switches this body to another simulation mode.
    ///
    /// Static and kinematic bodies lose their inverse mass and inertia and their velocities.
    /// Dynamic bodies are woken up and get their mass properties recomputed.
    pub fn set_mode(&mut self, mode: BodyMode, lists: &mut BodyLists) {
        let prev = self.mode;
        self.mode = mode;

        match mode {
            BodyMode::Static | BodyMode::Kinematic => {
                self.pos.inv_transform = self.pos.transform.affine_inverse();
                self.mprops.inv_mass = 0.0;
                self.mprops.inv_inertia = AngVector::zeros();
                self.set_active(mode == BodyMode::Kinematic && self.contact_count > 0, lists);
                self.vels.linvel = Vector::zeros();
                self.vels.angvel = AngVector::zeros();

                if mode == BodyMode::Kinematic && prev != mode {
                    self.first_time_kinematic = true;
                }

                self.mprops.update_transform_dependent(&self.pos.transform);
            }
            BodyMode::Dynamic => {
                self.mprops.inv_mass = self.inv_mass_of_dynamic();

                if !self.mprops.calculate_inertia {
                    self.use_inertia_override();
                    self.mprops.update_transform_dependent(&self.pos.transform);
                }

                self.mass_properties_changed(lists);
                self.set_active(true, lists);
            }
            BodyMode::DynamicLinear => {
                self.mprops.inv_mass = self.inv_mass_of_dynamic();
                self.mprops.inv_inertia = AngVector::zeros();
                self.vels.angvel = AngVector::zeros();
                self.mprops.update_transform_dependent(&self.pos.transform);
                self.set_active(true, lists);
            }
        }
    }

    /// Sets a parameter of this body.
    ///
    /// A non-positive mass is rejected and leaves the body unchanged.
    pub fn set_param(
        &mut self,
        param: BodyParameter,
        value: BodyParamValue,
        lists: &mut BodyLists,
    ) -> Result<(), BodyError> {
        match param {
            BodyParameter::Bounce => self.material.bounce = value.real(param)?,
            BodyParameter::Friction => self.material.friction = value.real(param)?,
            BodyParameter::Mass => {
                let mass = value.real(param)?;
                if mass <= 0.0 {
                    log::warn!("Ignoring the invalid mass {} of the body {:?}.", mass, self.handle);
                    return Err(BodyError::InvalidMass(mass));
                }

                self.mprops.mass = mass;
                if self.mode.is_dynamic() {
                    self.mprops.inv_mass = 1.0 / mass;
                    self.mass_properties_changed(lists);
                }
            }
            BodyParameter::Inertia => {
                let inertia = value.vector(param)?;
                self.mprops.inertia = inertia;

                if inertia.iter().any(|i| *i <= 0.0) {
                    self.mprops.calculate_inertia = true;
                    if self.mode == BodyMode::Dynamic {
                        self.mass_properties_changed(lists);
                    }
                } else {
                    self.mprops.calculate_inertia = false;
                    if self.mode == BodyMode::Dynamic {
                        self.use_inertia_override();
                        self.mprops.update_transform_dependent(&self.pos.transform);
                    }
                }
            }
            BodyParameter::CenterOfMass => {
                let com = value.vector(param)?;
                self.mprops.calculate_center_of_mass = false;
                self.mprops.center_of_mass_local = Point::from(com);
                self.mprops.update_transform_dependent(&self.pos.transform);
            }
            BodyParameter::GravityScale => self.forces.gravity_scale = value.real(param)?,
            BodyParameter::LinearDamp => self.damping.linear_damp = value.real(param)?,
            BodyParameter::AngularDamp => self.damping.angular_damp = value.real(param)?,
        }

        Ok(())
    }

    /// Reads a parameter of this body.
    ///
    /// The inertia reads as the principal inertia of dynamic bodies, and zero otherwise. The
    /// center of mass reads in world-space.
    pub fn param(&self, param: BodyParameter) -> BodyParamValue {
        match param {
            BodyParameter::Bounce => self.material.bounce.into(),
            BodyParameter::Friction => self.material.friction.into(),
            BodyParameter::Mass => self.mprops.mass.into(),
            BodyParameter::Inertia => {
                if self.mode == BodyMode::Dynamic {
                    self.mprops.inv_inertia.map(utils::inv).into()
                } else {
                    Vector::<Real>::zeros().into()
                }
            }
            BodyParameter::CenterOfMass => self.mprops.center_of_mass.coords.into(),
            BodyParameter::GravityScale => self.forces.gravity_scale.into(),
            BodyParameter::LinearDamp => self.damping.linear_damp.into(),
            BodyParameter::AngularDamp => self.damping.angular_damp.into(),
        }
    }

    /// Sets a state variable of this body.
    ///
    /// Moving a static body does not wake up the bodies constrained to it: use
    /// [`PhysicsSpace::set_body_state`](crate::pipeline::PhysicsSpace::set_body_state) for that.
    pub fn set_state(
        &mut self,
        state: BodyState,
        value: BodyStateValue,
        lists: &mut BodyLists,
    ) -> Result<(), BodyError> {
        match state {
            BodyState::Transform => {
                let transform = value.transform(state)?;

                match self.mode {
                    BodyMode::Kinematic => {
                        self.pos.new_transform = transform;
                        self.set_active(true, lists);

                        if self.first_time_kinematic {
                            self.pos.transform = transform;
                            self.pos.inv_transform = transform.affine_inverse();
                            self.mprops.update_transform_dependent(&transform);
                            self.first_time_kinematic = false;
                        }
                    }
                    BodyMode::Static => {
                        self.pos.transform = transform;
                        self.pos.inv_transform = transform.affine_inverse();
                        self.mprops.update_transform_dependent(&transform);
                    }
                    BodyMode::Dynamic | BodyMode::DynamicLinear => {
                        let transform = transform.orthonormalized();
                        // Used as the previous transform to compute the motion.
                        self.pos.new_transform = self.pos.transform;

                        if self.pos.transform == transform {
                            return Ok(());
                        }

                        self.pos.transform = transform;
                        self.pos.inv_transform = transform.inverse();
                        self.mprops.update_transform_dependent(&transform);
                    }
                }

                self.wake_up(lists);
            }
            BodyState::LinearVelocity => {
                let linvel = value.vector(state)?;
                self.vels.linvel = linvel;
                self.vels.constant_linvel = linvel;
                self.wake_up(lists);
            }
            BodyState::AngularVelocity => {
                let angvel = value.vector(state)?;
                self.vels.angvel = angvel;
                self.vels.constant_angvel = angvel;
                self.wake_up(lists);
            }
            BodyState::Sleeping => {
                let sleeping = value.boolean(state)?;

                if self.mode.is_dynamic() {
                    if sleeping {
                        self.vels.linvel = Vector::zeros();
                        self.vels.angvel = AngVector::zeros();
                        self.set_active(false, lists);
                    } else {
                        self.set_active(true, lists);
                    }
                }
            }
            BodyState::CanSleep => {
                let can_sleep = value.boolean(state)?;
                self.set_can_sleep(can_sleep, lists);
            }
        }

        Ok(())
    }

    /// Reads a state variable of this body.
    pub fn state(&self, state: BodyState) -> BodyStateValue {
        match state {
            BodyState::Transform => self.pos.transform.into(),
            BodyState::LinearVelocity => self.vels.linvel.into(),
            BodyState::AngularVelocity => self.vels.angvel.into(),
            BodyState::Sleeping => (!self.activation.active).into(),
            BodyState::CanSleep => self.activation.can_sleep.into(),
        }
    }
}

/// A builder for bodies.
#[derive(Clone, Debug)]
#[must_use = "Builder functions return the updated builder"]
pub struct BodyBuilder {
    mode: BodyMode,
    transform: Transform,
    linvel: Vector<Real>,
    angvel: AngVector<Real>,
    mass: Real,
    inertia: Vector<Real>,
    center_of_mass: Option<Point<Real>>,
    gravity_scale: Real,
    linear_damp: Real,
    angular_damp: Real,
    bounce: Real,
    friction: Real,
    can_sleep: bool,
    sleeping: bool,
    ccd_enabled: bool,
    locked_axes: LockedAxes,
    shapes: Vec<BodyShape>,
    user_data: u128,
}

impl BodyBuilder {
    /// Initialize a new builder for a body with the given mode.
    pub fn new(mode: BodyMode) -> Self {
        Self {
            mode,
            transform: Transform::identity(),
            linvel: Vector::zeros(),
            angvel: AngVector::zeros(),
            mass: 1.0,
            inertia: Vector::zeros(),
            center_of_mass: None,
            gravity_scale: 1.0,
            linear_damp: -1.0,
            angular_damp: -1.0,
            bounce: 0.0,
            friction: 1.0,
            can_sleep: true,
            sleeping: false,
            ccd_enabled: false,
            locked_axes: LockedAxes::empty(),
            shapes: Vec::new(),
            user_data: 0,
        }
    }

    /// Initializes the builder of a new static body.
    pub fn new_static() -> Self {
        Self::new(BodyMode::Static)
    }

    /// Initializes the builder of a new kinematic body.
    pub fn new_kinematic() -> Self {
        Self::new(BodyMode::Kinematic)
    }

    /// Initializes the builder of a new dynamic body.
    pub fn new_dynamic() -> Self {
        Self::new(BodyMode::Dynamic)
    }

    /// Initializes the builder of a new dynamic body that never rotates under forces.
    pub fn new_dynamic_linear() -> Self {
        Self::new(BodyMode::DynamicLinear)
    }

    /// Sets the initial transform of the body to be created.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the initial translation of the body to be created.
    pub fn translation(mut self, translation: Vector<Real>) -> Self {
        self.transform.origin = translation;
        self
    }

    /// Sets the initial linear velocity of the body to be created.
    pub fn linvel(mut self, linvel: Vector<Real>) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the initial angular velocity of the body to be created.
    pub fn angvel(mut self, angvel: AngVector<Real>) -> Self {
        self.angvel = angvel;
        self
    }

    /// Sets the mass of the body to be created. Non-positive masses are ignored.
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = mass;
        self
    }

    /// Sets the principal inertia of the body to be created.
    ///
    /// Components `<= 0` are computed from the shapes.
    pub fn inertia(mut self, inertia: Vector<Real>) -> Self {
        self.inertia = inertia;
        self
    }

    /// Sets the local center of mass of the body to be created, instead of computing it from
    /// the shapes.
    pub fn center_of_mass(mut self, center_of_mass: Point<Real>) -> Self {
        self.center_of_mass = Some(center_of_mass);
        self
    }

    /// Sets the scale applied to the gravity affecting the body to be created.
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Sets the linear damping of the body to be created. Negative values defer to the areas.
    pub fn linear_damping(mut self, damping: Real) -> Self {
        self.linear_damp = damping;
        self
    }

    /// Sets the angular damping of the body to be created. Negative values defer to the areas.
    pub fn angular_damping(mut self, damping: Real) -> Self {
        self.angular_damp = damping;
        self
    }

    /// Sets the restitution coefficient of the body to be created.
    pub fn bounce(mut self, bounce: Real) -> Self {
        self.bounce = bounce;
        self
    }

    /// Sets the friction coefficient of the body to be created.
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Sets whether or not the body to be created can sleep.
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Sets whether or not the body to be created is asleep.
    pub fn sleeping(mut self, sleeping: bool) -> Self {
        self.sleeping = sleeping;
        self
    }

    /// Enables the report of the swept motion of the body to be created.
    pub fn ccd_enabled(mut self, enabled: bool) -> Self {
        self.ccd_enabled = enabled;
        self
    }

    /// Sets the locked degrees of freedom of the body to be created.
    pub fn locked_axes(mut self, locked_axes: LockedAxes) -> Self {
        self.locked_axes = locked_axes;
        self
    }

    /// Attaches a shape to the body to be created.
    pub fn shape(mut self, shape: Arc<dyn Shape>, transform: Transform) -> Self {
        self.shapes.push(BodyShape::new(shape, transform));
        self
    }

    /// An arbitrary user-defined 128-bit integer associated to the body to be created.
    pub fn user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Build a new body with the parameters configured with this builder.
    ///
    /// The body is detached: its mass properties are computed right away.
    pub fn build(&self) -> Body {
        // A detached body never registers itself in any list.
        let mut detached = BodyLists::new();
        let mut body = Body::new();

        body.pos = BodyPosition::new(self.transform);
        body.shapes = self.shapes.clone();
        body.material = BodyMaterial {
            bounce: self.bounce,
            friction: self.friction,
        };
        body.forces.gravity_scale = self.gravity_scale;
        body.damping.linear_damp = self.linear_damp;
        body.damping.angular_damp = self.angular_damp;
        body.ccd.enabled = self.ccd_enabled;
        body.locked_axes = self.locked_axes;
        body.user_data = self.user_data;

        // Invalid masses are reported and ignored.
        let _ = body.set_param(BodyParameter::Mass, self.mass.into(), &mut detached);
        if self.inertia != Vector::zeros() {
            let _ = body.set_param(BodyParameter::Inertia, self.inertia.into(), &mut detached);
        }
        if let Some(com) = self.center_of_mass {
            let _ = body.set_param(
                BodyParameter::CenterOfMass,
                com.coords.into(),
                &mut detached,
            );
        }

        body.set_mode(self.mode, &mut detached);
        body.update_mass_properties();

        body.vels.linvel = self.linvel;
        body.vels.constant_linvel = self.linvel;
        if self.mode != BodyMode::DynamicLinear {
            body.vels.angvel = self.angvel;
            body.vels.constant_angvel = self.angvel;
        }

        body.activation.can_sleep = self.can_sleep;
        if self.sleeping && self.mode.is_dynamic() {
            body.vels.linvel = Vector::zeros();
            body.vels.angvel = AngVector::zeros();
            body.activation.active = false;
        }

        body
    }
}

impl From<BodyBuilder> for Body {
    fn from(val: BodyBuilder) -> Body {
        val.build()
    }
}
