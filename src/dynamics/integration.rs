use crate::dynamics::area_override::aggregate_area_effects;
use crate::dynamics::{Body, BodyListMembership, BodyLists, BodyMode, LockedAxes};
use crate::error_handler;
use crate::geometry::{AreaHandle, AreaQuery, AreaSet};
use crate::math::{AngVector, Matrix, Point, Real, Rotation, Vector, DIM};
use crate::pipeline::{EventHandler, SweptMotionEvent};
use crate::utils::{self, Transform};
use std::cmp::Reverse;

impl Body {
    /// Aggregates the areas overlapping this body, then integrates the forces applied to it
    /// into its velocities.
    ///
    /// Kinematic bodies get the velocities implied by their motion towards their target
    /// transform instead. The accumulated forces and the biased velocities are cleared, and so is
    /// the contact count.
    ///
    /// If `default_area` is missing from `areas`, the error is reported through the
    /// [`error_handler`](crate::error_handler) and the body is left unchanged.
    #[profiling::function]
    pub fn integrate_forces(
        &mut self,
        dt: Real,
        areas: &AreaSet,
        default_area: Option<AreaHandle>,
        events: &dyn EventHandler,
    ) {
        if self.mode.is_static() {
            return;
        }

        // Priorities may have changed since the overlaps were registered.
        self.area_overlaps.sort_by_key(|overlap| {
            Reverse(areas.get(overlap.area).map(|area| area.priority()))
        });
        let overlapping = self
            .area_overlaps
            .iter()
            .filter_map(|overlap| areas.get(overlap.area));
        let effects = match aggregate_area_effects(
            &Point::from(self.pos.transform.origin),
            overlapping,
            default_area.and_then(|h| areas.get(h)),
            self.forces.gravity_scale,
            self.damping.linear_damp,
            self.damping.angular_damp,
        ) {
            Ok(effects) => effects,
            Err(err) => {
                error_handler::default_error_handler()(err);
                return;
            }
        };

        log::trace!("Area effects on {:?}: {:?}", self.handle, effects);
        self.forces.gravity = effects.gravity;
        self.damping.area_linear_damp = effects.linear_damp;
        self.damping.area_angular_damp = effects.angular_damp;

        let mut motion = None;

        if self.mode == BodyMode::Kinematic {
            let translation = self.pos.new_transform.origin - self.pos.transform.origin;
            self.vels.linvel = self.vels.constant_linvel + translation / dt;

            let rot = self.pos.new_transform.orthonormalized().basis
                * self.pos.transform.orthonormalized().basis.transpose();
            let scaled_axis = Rotation::from_matrix_unchecked(rot).scaled_axis();
            self.vels.angvel = self.vels.constant_angvel + scaled_axis / dt;

            motion = Some(translation);
        } else {
            if !self.omit_force_integration {
                let force = self.forces.gravity * self.mprops.mass + self.forces.applied_force;
                let torque = self.forces.applied_torque;

                let linear_damp = (1.0 - dt * self.damping.area_linear_damp).max(0.0);
                let angular_damp = (1.0 - dt * self.damping.area_angular_damp).max(0.0);

                self.vels.linvel *= linear_damp;
                self.vels.angvel *= angular_damp;

                self.vels.linvel += force * (self.mprops.inv_mass * dt);
                self.vels.angvel += self.mprops.inv_inertia_tensor * torque * dt;
            }

            if self.ccd.enabled {
                motion = Some(self.vels.linvel * dt);
            }
        }

        self.forces.applied_force = Vector::zeros();
        self.forces.applied_torque = AngVector::zeros();
        self.vels.biased_linvel = Vector::zeros();
        self.vels.biased_angvel = AngVector::zeros();

        self.ccd.pending_motion = motion;
        if let (Some(motion), Some(body)) = (motion, self.handle) {
            events.handle_swept_motion_event(SweptMotionEvent { body, motion });
        }

        self.contact_count = 0;
    }

    /// Integrates the velocities of this body into its transform.
    ///
    /// Locked axes are enforced first. Kinematic bodies jump to their target transform and
    /// deactivate once they stopped moving. Other bodies rotate around their center of mass, then
    /// translate.
    #[profiling::function]
    pub fn integrate_velocities(&mut self, dt: Real, lists: &mut BodyLists) {
        if self.mode.is_static() {
            return;
        }

        if let Some(handle) = self.handle {
            if !self.callbacks.is_empty() {
                lists.add(
                    BodyListMembership::STATE_QUERY,
                    handle,
                    &mut self.membership,
                );
            }
        }

        for i in 0..DIM {
            if self.locked_axes.contains(LockedAxes::translation_axis(i)) {
                self.vels.linvel[i] = 0.0;
                self.vels.biased_linvel[i] = 0.0;
                self.pos.new_transform.origin[i] = self.pos.transform.origin[i];
            }
        }

        for i in 0..DIM {
            if self.locked_axes.contains(LockedAxes::rotation_axis(i)) {
                self.vels.angvel[i] = 0.0;
                self.vels.biased_angvel[i] = 0.0;
            }
        }

        if self.mode == BodyMode::Kinematic {
            self.pos.transform = self.pos.new_transform;
            self.pos.inv_transform = self.pos.new_transform.affine_inverse();
            self.mprops.update_transform_dependent(&self.pos.transform);

            if self.contact_count == 0
                && self.vels.linvel == Vector::zeros()
                && self.vels.angvel == AngVector::zeros()
            {
                // Stopped moving.
                self.set_active(false, lists);
            }
            return;
        }

        let mut transform = self.pos.transform;
        let total_angvel = self.vels.angvel + self.vels.biased_angvel;
        let speed = total_angvel.norm();

        if !utils::is_zero_approx(speed) {
            let rot = utils::rotation_from_axis_angle(&(total_angvel / speed), speed * dt);
            let pivot = (Matrix::identity() - rot) * transform.basis;
            transform.origin += pivot * self.mprops.center_of_mass_local.coords;
            transform.basis = rot * transform.basis;
            transform.orthonormalize();
        }

        transform.origin += (self.vels.linvel + self.vels.biased_linvel) * dt;
        self.set_transform_and_update(transform);
    }

    fn set_transform_and_update(&mut self, transform: Transform) {
        self.pos.transform = transform;
        self.pos.inv_transform = transform.inverse();
        self.mprops.update_transform_dependent(&transform);
    }
}

#[cfg(test)]
mod test {
    use crate::dynamics::{
        Body, BodyBuilder, BodyHandle, BodyLists, BodyParameter, BodyState, LockedAxes,
    };
    use crate::geometry::{Area, AreaHandle, AreaSet, AreaSpaceOverrideMode};
    use crate::math::{Point, Real, Vector};
    use crate::pipeline::{ChannelEventCollector, SweptMotionEvent};
    use crate::utils::Transform;
    use approx::assert_relative_eq;
    use std::sync::mpsc::channel;

    fn areas(gravity: Real, damp: Real) -> (AreaSet, AreaHandle) {
        let mut areas = AreaSet::new();
        let default = areas.insert(Area::new(Vector::new(0.0, -1.0, 0.0), gravity, damp, damp));
        (areas, default)
    }

    fn attached(body: Body, lists: &mut BodyLists) -> Body {
        let mut body = body;
        body.attach(BodyHandle::from_raw_parts(0, 0), lists);
        body
    }

    #[test]
    fn free_fall() {
        let (areas, default) = areas(9.8, 0.0);
        let mut lists = BodyLists::new();
        let mut body = attached(BodyBuilder::new_dynamic().mass(3.0).build(), &mut lists);

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(*body.linvel(), Vector::new(0.0, -0.98, 0.0), epsilon = 1.0e-6);
        assert_eq!(body.gravity(), &Vector::new(0.0, -9.8, 0.0));

        body.integrate_velocities(0.1, &mut lists);
        assert_relative_eq!(
            body.transform().origin,
            Vector::new(0.0, -0.098, 0.0),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn damping_is_clamped() {
        let (areas, default) = areas(0.0, 20.0);
        let mut body = BodyBuilder::new_dynamic()
            .linvel(Vector::new(5.0, 0.0, 0.0))
            .angvel(Vector::new(0.0, 5.0, 0.0))
            .build();

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_eq!(body.linvel(), &Vector::zeros());
        assert_eq!(body.angvel(), &Vector::zeros());
    }

    #[test]
    fn body_damping_replaces_the_areas_damping() {
        let (areas, default) = areas(0.0, 20.0);
        let mut body = BodyBuilder::new_dynamic()
            .linvel(Vector::new(5.0, 0.0, 0.0))
            .linear_damping(1.0)
            .build();

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(*body.linvel(), Vector::new(4.5, 0.0, 0.0), epsilon = 1.0e-5);
        assert_eq!(body.total_linear_damp(), 1.0);
        assert_eq!(body.total_angular_damp(), 20.0);
    }

    #[test]
    fn overlapping_area_overrides_gravity() {
        let (mut areas, default) = areas(9.8, 0.0);
        let up = areas.insert(
            Area::new(Vector::new(0.0, 1.0, 0.0), 2.0, 0.0, 0.0)
                .with_override(1, AreaSpaceOverrideMode::Replace),
        );
        let mut body = BodyBuilder::new_dynamic().gravity_scale(2.0).build();
        body.add_area(up);

        body.integrate_forces(0.5, &areas, Some(default), &());
        assert_relative_eq!(*body.gravity(), Vector::new(0.0, 4.0, 0.0));
        assert_relative_eq!(*body.linvel(), Vector::new(0.0, 2.0, 0.0));

        // Stale overlaps are skipped.
        areas.remove(up);
        body.integrate_forces(0.5, &areas, Some(default), &());
        assert_relative_eq!(*body.gravity(), Vector::new(0.0, -19.6, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn point_gravity_is_sampled_at_the_body_origin() {
        let mut areas = AreaSet::new();
        let attractor = areas.insert(Area {
            gravity: 1.0,
            gravity_vector: Vector::zeros(),
            gravity_is_point: true,
            linear_damp: 0.0,
            angular_damp: 0.0,
            ..Default::default()
        });
        let mut body = BodyBuilder::new_dynamic()
            .translation(Vector::new(0.0, 5.0, 0.0))
            .center_of_mass(Point::new(0.0, -10.0, 0.0))
            .build();
        assert_relative_eq!(body.center_of_mass().y, -5.0);

        body.integrate_forces(0.1, &areas, Some(attractor), &());
        assert_relative_eq!(*body.gravity(), Vector::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn area_priorities_are_read_at_each_step() {
        let (mut areas, default) = areas(0.0, 0.0);
        let up = areas.insert(
            Area::new(Vector::new(0.0, 1.0, 0.0), 1.0, 0.0, 0.0)
                .with_override(1, AreaSpaceOverrideMode::Replace),
        );
        let down = areas.insert(
            Area::new(Vector::new(0.0, -1.0, 0.0), 1.0, 0.0, 0.0)
                .with_override(2, AreaSpaceOverrideMode::Replace),
        );
        let mut body = BodyBuilder::new_dynamic().build();
        body.add_area(up);
        body.add_area(down);

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(*body.gravity(), Vector::new(0.0, -1.0, 0.0));

        areas.get_mut(up).unwrap().priority = 5;
        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(*body.gravity(), Vector::new(0.0, 1.0, 0.0));
        assert_eq!(body.area_overlaps()[0].area, up);
    }

    #[test]
    fn forces_and_biased_velocities_are_consumed() {
        let (areas, default) = areas(0.0, 0.0);
        let mut body = BodyBuilder::new_dynamic()
            .mass(2.0)
            .inertia(Vector::repeat(0.5))
            .build();

        body.apply_central_force(&Vector::new(4.0, 0.0, 0.0));
        body.apply_torque(&Vector::new(0.0, 0.0, 1.0));
        body.set_biased_linvel(Vector::new(0.0, 1.0, 0.0));
        body.add_contact();

        body.integrate_forces(0.5, &areas, Some(default), &());
        assert_relative_eq!(*body.linvel(), Vector::new(1.0, 0.0, 0.0));
        assert_relative_eq!(*body.angvel(), Vector::new(0.0, 0.0, 1.0));
        assert_eq!(body.applied_force(), &Vector::zeros());
        assert_eq!(body.applied_torque(), &Vector::zeros());
        assert_eq!(body.velocities().biased_linvel, Vector::zeros());
        assert_eq!(body.contact_count(), 0);

        // Every subsequent step without new forces leaves the velocities unchanged.
        body.integrate_forces(0.5, &areas, Some(default), &());
        assert_relative_eq!(*body.linvel(), Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn omitted_force_integration_keeps_velocities() {
        let (areas, default) = areas(9.8, 1.0);
        let mut body = BodyBuilder::new_dynamic()
            .linvel(Vector::new(1.0, 0.0, 0.0))
            .build();
        body.set_omit_force_integration(true);
        body.apply_central_force(&Vector::new(0.0, 0.0, 100.0));

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_eq!(body.linvel(), &Vector::new(1.0, 0.0, 0.0));
        assert_eq!(body.applied_force(), &Vector::zeros());
    }

    #[test]
    fn dynamic_linear_bodies_do_not_rotate() {
        let (areas, default) = areas(0.0, 0.0);
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic_linear().build();

        body.apply_force(&Vector::new(0.0, 1.0, 0.0), &Vector::new(1.0, 0.0, 0.0));
        body.integrate_forces(0.1, &areas, Some(default), &());
        body.integrate_velocities(0.1, &mut lists);

        assert_eq!(body.angvel(), &Vector::zeros());
        assert_eq!(body.transform().basis, Transform::identity().basis);
        assert_relative_eq!(*body.linvel(), Vector::new(0.0, 0.1, 0.0));
    }

    #[test]
    fn kinematic_velocities_follow_the_motion() {
        let (areas, default) = areas(9.8, 0.0);
        let mut lists = BodyLists::new();
        let mut body = attached(BodyBuilder::new_kinematic().build(), &mut lists);

        body.set_state(BodyState::Transform, Transform::identity().into(), &mut lists)
            .unwrap();
        body.set_state(
            BodyState::Transform,
            Transform::from_translation(Vector::new(1.0, 0.0, 0.0)).into(),
            &mut lists,
        )
        .unwrap();
        assert!(body.is_active());

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(*body.linvel(), Vector::new(10.0, 0.0, 0.0), epsilon = 1.0e-4);
        assert_eq!(body.pending_motion(), Some(&Vector::new(1.0, 0.0, 0.0)));

        body.integrate_velocities(0.1, &mut lists);
        assert_eq!(body.transform().origin, Vector::new(1.0, 0.0, 0.0));
        assert!(body.is_active());

        // No motion left: the body deactivates.
        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_eq!(body.linvel(), &Vector::zeros());
        body.integrate_velocities(0.1, &mut lists);
        assert!(!body.is_active());
        assert!(lists.active_bodies().is_empty());
    }

    #[test]
    fn kinematic_rotation_gives_an_angular_velocity() {
        let (areas, default) = areas(9.8, 0.0);
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_kinematic().build();
        let quarter_turn = Transform::from_axis_angle(
            &Vector::z(),
            std::f32::consts::FRAC_PI_2 as Real,
            Vector::zeros(),
        );

        body.set_state(BodyState::Transform, Transform::identity().into(), &mut lists)
            .unwrap();
        body.set_state(BodyState::Transform, quarter_turn.into(), &mut lists)
            .unwrap();

        body.integrate_forces(0.1, &areas, Some(default), &());
        assert_relative_eq!(
            *body.angvel(),
            Vector::new(0.0, 0.0, std::f32::consts::FRAC_PI_2 as Real / 0.1),
            epsilon = 1.0e-3
        );
    }

    #[test]
    fn locked_translation_axis() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic()
            .linvel(Vector::new(1.0, 1.0, 0.0))
            .angvel(Vector::new(0.0, 0.0, 1.0))
            .locked_axes(LockedAxes::TRANSLATION_LOCKED_Y | LockedAxes::ROTATION_LOCKED)
            .build();

        body.integrate_velocities(1.0, &mut lists);
        assert_eq!(body.linvel(), &Vector::new(1.0, 0.0, 0.0));
        assert_eq!(body.angvel(), &Vector::zeros());
        assert_relative_eq!(body.transform().origin, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn locked_translation_axis_holds_the_kinematic_target() {
        let (areas, default) = areas(0.0, 0.0);
        let mut lists = BodyLists::new();
        let mut body = attached(
            BodyBuilder::new_kinematic()
                .locked_axes(LockedAxes::TRANSLATION_LOCKED_Y)
                .build(),
            &mut lists,
        );

        body.set_state(BodyState::Transform, Transform::identity().into(), &mut lists)
            .unwrap();
        body.set_state(
            BodyState::Transform,
            Transform::from_translation(Vector::new(1.0, 2.0, 0.0)).into(),
            &mut lists,
        )
        .unwrap();

        body.integrate_forces(0.5, &areas, Some(default), &());
        body.integrate_velocities(0.5, &mut lists);
        assert_eq!(body.linvel(), &Vector::new(2.0, 0.0, 0.0));
        assert_eq!(body.new_transform().origin.y, 0.0);
        assert_eq!(body.transform().origin, Vector::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_is_around_the_center_of_mass() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic()
            .angvel(Vector::new(0.0, 0.0, 1.0))
            .build();
        body.set_param(
            BodyParameter::CenterOfMass,
            Vector::new(1.0, 0.0, 0.0).into(),
            &mut lists,
        )
        .unwrap();

        for _ in 0..4 {
            body.integrate_velocities(0.25, &mut lists);
            assert_relative_eq!(
                *body.center_of_mass(),
                Point::new(1.0, 0.0, 0.0),
                epsilon = 1.0e-5
            );
        }
        assert!(body.transform().origin.norm() > 0.1);
    }

    #[test]
    fn swept_motion_is_reported() {
        let (areas, default) = areas(0.0, 0.0);
        let (sender, receiver) = channel();
        let events = ChannelEventCollector::new(sender);
        let mut lists = BodyLists::new();
        let mut body = attached(
            BodyBuilder::new_dynamic()
                .linvel(Vector::new(2.0, 0.0, 0.0))
                .ccd_enabled(true)
                .build(),
            &mut lists,
        );

        body.integrate_forces(0.5, &areas, Some(default), &events);
        assert_eq!(body.pending_motion(), Some(&Vector::new(1.0, 0.0, 0.0)));
        assert_eq!(
            receiver.try_recv().ok(),
            Some(SweptMotionEvent {
                body: BodyHandle::from_raw_parts(0, 0),
                motion: Vector::new(1.0, 0.0, 0.0),
            })
        );

        body.enable_ccd(false);
        body.integrate_forces(0.5, &areas, Some(default), &events);
        assert_eq!(body.pending_motion(), None);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn bodies_with_callbacks_are_queued_for_state_queries() {
        let mut lists = BodyLists::new();
        let mut body = attached(BodyBuilder::new_dynamic().build(), &mut lists);

        body.integrate_velocities(0.1, &mut lists);
        assert!(lists.state_query_queue().is_empty());

        body.set_state_sync_callback(|_: &crate::dynamics::DirectBodyState| {});
        body.integrate_velocities(0.1, &mut lists);
        body.integrate_velocities(0.1, &mut lists);
        assert_eq!(lists.state_query_queue(), &[BodyHandle::from_raw_parts(0, 0)]);
    }

    #[test]
    #[should_panic]
    fn missing_default_area() {
        let mut body = BodyBuilder::new_dynamic().build();
        body.integrate_forces(0.1, &AreaSet::new(), None, &());
    }
}
