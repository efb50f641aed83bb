use crate::dynamics::{
    Body, BodyError, BodyHandle, BodyListMembership, BodyLists, BodyMode, BodyParamValue,
    BodyParameter, BodySet, BodyState, BodyStateValue, Constraint, ConstraintHandle,
    ConstraintSet, IntegrationParameters,
};
use crate::geometry::{Area, AreaHandle, AreaSet};
use crate::pipeline::EventHandler;

/// The owner of the bodies, areas and constraints simulated together, and of their scheduling
/// lists.
///
/// Collision detection and constraint solving are not performed here: a step only integrates
/// the active bodies and dispatches their callbacks.
#[derive(Debug)]
pub struct PhysicsSpace {
    /// The parameters of each step.
    pub integration_parameters: IntegrationParameters,
    bodies: BodySet,
    areas: AreaSet,
    constraints: ConstraintSet,
    lists: BodyLists,
    default_area: Option<AreaHandle>,
}

impl Default for PhysicsSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSpace {
    /// An empty space, with a default area applying a downward gravity of `9.8`.
    pub fn new() -> Self {
        let mut areas = AreaSet::new();
        let default_area = Some(areas.insert(Area::default()));

        Self {
            integration_parameters: IntegrationParameters::default(),
            bodies: BodySet::new(),
            areas,
            constraints: ConstraintSet::new(),
            lists: BodyLists::new(),
            default_area,
        }
    }

    /// The area applying everywhere, after the areas overlapping each body.
    pub fn default_area(&self) -> Option<AreaHandle> {
        self.default_area
    }

    /// Sets the area applying everywhere.
    ///
    /// Stepping a space without default area is a fatal error.
    pub fn set_default_area(&mut self, area: Option<AreaHandle>) {
        self.default_area = area;
    }

    /// The scheduling lists of this space.
    pub fn lists(&self) -> &BodyLists {
        &self.lists
    }

    /// The bodies of this space.
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// The body with the given handle.
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    /// The body with the given handle, along with the lists its mutating methods need.
    pub fn body_and_lists_mut(&mut self, handle: BodyHandle) -> Option<(&mut Body, &mut BodyLists)> {
        let body = self.bodies.get_mut(handle)?;
        Some((body, &mut self.lists))
    }

    /// The areas of this space.
    pub fn areas(&self) -> &AreaSet {
        &self.areas
    }

    /// The areas of this space, mutably.
    pub fn areas_mut(&mut self) -> &mut AreaSet {
        &mut self.areas
    }

    /// The constraints of this space.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Adds a body to this space.
    pub fn insert_body(&mut self, body: impl Into<Body>) -> BodyHandle {
        self.bodies.insert(body, &mut self.lists)
    }

    /// Removes a body from this space, along with the constraints attached to it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies
            .remove(handle, &mut self.lists, &mut self.constraints)
    }

    /// Adds an area to this space.
    pub fn insert_area(&mut self, area: Area) -> AreaHandle {
        self.areas.insert(area)
    }

    /// Removes an area from this space. Removing the default area unsets it.
    pub fn remove_area(&mut self, handle: AreaHandle) -> Option<Area> {
        if self.default_area == Some(handle) {
            self.default_area = None;
        }

        self.areas.remove(handle)
    }

    /// Adds a constraint between bodies of this space.
    pub fn insert_constraint(&mut self, constraint: Constraint) -> ConstraintHandle {
        self.constraints.insert(constraint, &mut self.bodies)
    }

    /// Removes a constraint from this space.
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Option<Constraint> {
        self.constraints.remove(handle, &mut self.bodies)
    }

    /// Runs `f` on a body of this space, then wakes up its neighbours if `f` activated it.
    fn modify_body(
        &mut self,
        handle: BodyHandle,
        f: impl FnOnce(&mut Body, &mut BodyLists) -> Result<(), BodyError>,
    ) -> Result<(), BodyError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(BodyError::InvalidHandle(handle))?;
        let was_active = body.is_active();
        f(body, &mut self.lists)?;

        if !was_active && body.is_active() {
            self.wake_up_neighbours(handle);
        }

        Ok(())
    }

    /// Sets a parameter of a body of this space.
    pub fn set_body_param(
        &mut self,
        handle: BodyHandle,
        param: BodyParameter,
        value: BodyParamValue,
    ) -> Result<(), BodyError> {
        self.modify_body(handle, |body, lists| body.set_param(param, value, lists))
    }

    /// Sets a state variable of a body of this space.
    ///
    /// Moving a static body, or waking up a body, wakes up the bodies constrained to it.
    pub fn set_body_state(
        &mut self,
        handle: BodyHandle,
        state: BodyState,
        value: BodyStateValue,
    ) -> Result<(), BodyError> {
        self.modify_body(handle, |body, lists| body.set_state(state, value, lists))?;

        if state == BodyState::Transform && self.bodies[handle].is_static() {
            self.wake_up_neighbours(handle);
        }

        Ok(())
    }

    /// Switches a body of this space to another simulation mode.
    pub fn set_body_mode(&mut self, handle: BodyHandle, mode: BodyMode) -> Result<(), BodyError> {
        self.modify_body(handle, |body, lists| {
            body.set_mode(mode, lists);
            Ok(())
        })
    }

    /// Activates or deactivates a body of this space. Activation wakes up its neighbours.
    pub fn set_body_active(&mut self, handle: BodyHandle, active: bool) -> Result<(), BodyError> {
        self.modify_body(handle, |body, lists| {
            body.set_active(active, lists);
            Ok(())
        })
    }

    /// Wakes up the movable bodies sharing a constraint with `handle`.
    pub fn wake_up_neighbours(&mut self, handle: BodyHandle) {
        self.bodies
            .wake_up_neighbours(handle, &self.constraints, &mut self.lists);
    }

    /// Advances the simulation by `integration_parameters.dt`.
    ///
    /// Pending mass properties are recomputed first. Then every active body integrates its forces,
    /// then its velocities, and falls asleep if it stayed still long enough. Finally, the
    /// callbacks of the simulated bodies are dispatched.
    #[profiling::function]
    pub fn step(&mut self, events: &dyn EventHandler) {
        let params = self.integration_parameters;
        let dt = params.dt;

        for handle in std::mem::take(&mut self.lists.mass_properties_update) {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.membership
                    .remove(BodyListMembership::MASS_PROPERTIES_UPDATE);
                body.update_mass_properties();
            }
        }

        // Bodies may leave the active list while being integrated.
        let active = self.lists.active.clone();
        log::trace!("Stepping {} active bodies by {}.", active.len(), dt);

        for handle in &active {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.integrate_forces(dt, &self.areas, self.default_area, events);
            }
        }

        for handle in &active {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.integrate_velocities(dt, &mut self.lists);
            }
        }

        for handle in &active {
            if let Some(body) = self.bodies.get_mut(*handle) {
                if body.is_dynamic() && body.is_active() && body.sleep_test(dt, &params) {
                    body.set_active(false, &mut self.lists);
                }
            }
        }

        for handle in std::mem::take(&mut self.lists.state_query) {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.membership.remove(BodyListMembership::STATE_QUERY);
                body.call_queries(dt, &mut self.lists);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{BodyBuilder, DirectBodyState};
    use crate::geometry::Cuboid;
    use crate::math::{Real, Vector};
    use crate::utils::Transform;
    use approx::assert_relative_eq;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn weightless_space() -> PhysicsSpace {
        let mut space = PhysicsSpace::new();
        let default_area = space.default_area().unwrap();
        let area = space.areas_mut().get_mut(default_area).unwrap();
        area.gravity = 0.0;
        area.linear_damp = 0.0;
        area.angular_damp = 0.0;
        space
    }

    #[test]
    fn falling_body() {
        let mut space = PhysicsSpace::new();
        let handle = space.insert_body(BodyBuilder::new_dynamic());

        space.step(&());

        let dt = space.integration_parameters.dt;
        let body = space.body(handle).unwrap();
        assert_relative_eq!(*body.linvel(), Vector::new(0.0, -9.8 * dt, 0.0), epsilon = 1.0e-6);
        assert!(body.transform().origin.y < 0.0);
    }

    #[test]
    fn mass_properties_are_recomputed_before_integration() {
        let mut space = weightless_space();
        let handle = space.insert_body(BodyBuilder::new_dynamic().mass(2.0));
        assert_eq!(space.lists().mass_properties_update_queue(), &[handle]);

        let (body, lists) = space.body_and_lists_mut(handle).unwrap();
        body.add_shape(
            Arc::new(Cuboid::new(Vector::new(0.5, 0.5, 0.5))),
            Transform::from_translation(Vector::new(1.0, 0.0, 0.0)),
            lists,
        );
        assert_eq!(body.center_of_mass().x, 0.0);

        space.step(&());
        let body = space.body(handle).unwrap();
        assert_relative_eq!(body.center_of_mass().x, 1.0);
        assert!(space.lists().mass_properties_update_queue().is_empty());
        assert!(!body
            .list_membership()
            .contains(BodyListMembership::MASS_PROPERTIES_UPDATE));
    }

    #[test]
    fn callbacks_are_dispatched_once_per_step() {
        let mut space = PhysicsSpace::new();
        let handle = space.insert_body(BodyBuilder::new_dynamic());
        let forces = Arc::new(AtomicUsize::new(0));
        let syncs = Arc::new(AtomicUsize::new(0));

        let counter = forces.clone();
        let (body, _) = space.body_and_lists_mut(handle).unwrap();
        body.set_force_integration_callback(
            move |_: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            None,
        );
        let counter = syncs.clone();
        body.set_state_sync_callback(move |_: &DirectBodyState| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        space.step(&());
        space.step(&());

        assert_eq!(forces.load(Ordering::SeqCst), 2);
        assert_eq!(syncs.load(Ordering::SeqCst), 2);
        assert!(space.lists().state_query_queue().is_empty());
    }

    #[test]
    fn still_bodies_fall_asleep() {
        let mut space = weightless_space();
        space.integration_parameters.dt = 0.125;
        space.integration_parameters.body_time_to_sleep = 0.5;
        let handle = space.insert_body(BodyBuilder::new_dynamic());
        let insomniac = space.insert_body(BodyBuilder::new_dynamic().can_sleep(false));

        for _ in 0..3 {
            space.step(&());
        }
        assert!(space.body(handle).unwrap().is_active());

        space.step(&());
        assert!(space.body(handle).unwrap().is_sleeping());
        assert_eq!(space.lists().active_bodies(), &[insomniac]);

        // Sleeping bodies are not integrated anymore.
        space
            .set_body_param(handle, BodyParameter::GravityScale, (2.0 as Real).into())
            .unwrap();
        space.step(&());
        assert_eq!(space.body(handle).unwrap().still_time(), 0.5);
    }

    #[test]
    fn callbacks_wake_up_bodies_that_just_fell_asleep() {
        let mut space = weightless_space();
        space.integration_parameters.body_time_to_sleep = 0.0;
        let handle = space.insert_body(BodyBuilder::new_dynamic());
        let (body, _) = space.body_and_lists_mut(handle).unwrap();
        body.set_force_integration_callback(
            |state: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {
                state.set_linear_velocity(Vector::new(5.0, 0.0, 0.0))
            },
            None,
        );

        space.step(&());
        let body = space.body(handle).unwrap();
        assert!(body.is_active());
        assert_eq!(body.linvel(), &Vector::new(5.0, 0.0, 0.0));

        space.step(&());
        let dt = space.integration_parameters.dt;
        assert_relative_eq!(
            space.body(handle).unwrap().transform().origin,
            Vector::new(5.0 * dt, 0.0, 0.0),
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn moving_a_static_body_wakes_its_neighbours() {
        let mut space = weightless_space();
        let ground = space.insert_body(BodyBuilder::new_static());
        let sleeper = space.insert_body(BodyBuilder::new_dynamic().sleeping(true));
        space.insert_constraint(Constraint::new([ground, sleeper]));
        assert!(space.lists().active_bodies().is_empty());

        space
            .set_body_state(
                ground,
                BodyState::Transform,
                Transform::from_translation(Vector::new(0.0, 1.0, 0.0)).into(),
            )
            .unwrap();

        assert!(space.body(sleeper).unwrap().is_active());
        assert_eq!(space.lists().active_bodies(), &[sleeper]);
    }

    #[test]
    fn waking_a_body_wakes_its_neighbours() {
        let mut space = weightless_space();
        let a = space.insert_body(BodyBuilder::new_dynamic().sleeping(true));
        let b = space.insert_body(BodyBuilder::new_dynamic().sleeping(true));
        let c = space.insert_body(BodyBuilder::new_dynamic().sleeping(true));
        space.insert_constraint(Constraint::new([a, b]));
        space.insert_constraint(Constraint::new([b, c]));

        space.set_body_active(a, true).unwrap();
        assert_eq!(space.lists().active_bodies(), &[a, b]);

        // Deactivation is never propagated.
        space.set_body_active(a, false).unwrap();
        assert!(space.body(b).unwrap().is_active());

        space
            .set_body_state(c, BodyState::Sleeping, false.into())
            .unwrap();
        assert_eq!(space.lists().active_bodies(), &[b, c]);
    }

    #[test]
    fn removed_bodies_leave_the_space() {
        let mut space = PhysicsSpace::new();
        let a = space.insert_body(BodyBuilder::new_dynamic());
        let b = space.insert_body(BodyBuilder::new_dynamic());
        let c = space.insert_constraint(Constraint::new([a, b]));

        assert!(space.remove_body(a).is_some());
        assert!(space.remove_body(a).is_none());
        assert!(!space.constraints().contains(c));
        assert_eq!(space.lists().active_bodies(), &[b]);
        assert_eq!(
            space.set_body_mode(a, BodyMode::Static),
            Err(BodyError::InvalidHandle(a))
        );
    }

    #[test]
    #[should_panic]
    fn stepping_without_default_area() {
        let mut space = PhysicsSpace::new();
        let default_area = space.default_area().unwrap();
        space.insert_body(BodyBuilder::new_dynamic());
        assert!(space.remove_area(default_area).is_some());
        assert_eq!(space.default_area(), None);

        space.step(&());
    }
}
