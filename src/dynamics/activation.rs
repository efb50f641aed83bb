use crate::dynamics::{Body, BodyListMembership, BodyLists, IntegrationParameters};
use crate::math::Real;

impl Body {
    /// Is this body simulated during the next step?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.activation.active
    }

    /// Is this body asleep?
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        !self.activation.active
    }

    /// Is this body allowed to fall asleep?
    #[inline]
    pub fn can_sleep(&self) -> bool {
        self.activation.can_sleep
    }

    /// For how long the velocities of this body have stayed below the sleep thresholds.
    #[inline]
    pub fn still_time(&self) -> Real {
        self.activation.still_time
    }

    /// Activates or deactivates this body.
    ///
    /// Static bodies are never active. An attached body joins or leaves the active list of its
    /// space accordingly.
    pub fn set_active(&mut self, active: bool, lists: &mut BodyLists) {
        if self.activation.active == active {
            return;
        }

        if active && self.mode.is_static() {
            return;
        }

        self.activation.active = active;
        log::debug!(
            "Body {:?} {}.",
            self.handle,
            if active { "activated" } else { "deactivated" }
        );

        if active {
            self.activation.still_time = 0.0;
        }

        if let Some(handle) = self.handle {
            if active {
                lists.add(BodyListMembership::ACTIVE, handle, &mut self.membership);
            } else {
                lists.remove(BodyListMembership::ACTIVE, handle, &mut self.membership);
            }
        }
    }

    /// Allows or forbids this body to fall asleep. Forbidding it wakes up a sleeping body.
    pub fn set_can_sleep(&mut self, can_sleep: bool, lists: &mut BodyLists) {
        self.activation.can_sleep = can_sleep;

        if self.mode.is_dynamic() && !self.activation.active && !can_sleep {
            self.set_active(true, lists);
        }
    }

    /// Wakes this body up, if it is part of a space and moved by forces.
    pub fn wake_up(&mut self, lists: &mut BodyLists) {
        if self.handle.is_none() || !self.mode.is_dynamic() {
            return;
        }

        self.set_active(true, lists);
    }

    /// Accumulates the time this body has been still, and tells if it may now fall asleep.
    ///
    /// The still time is reset as soon as one of the velocities exceeds its threshold.
    pub fn sleep_test(&mut self, dt: Real, params: &IntegrationParameters) -> bool {
        if !self.mode.is_dynamic() {
            return true;
        }

        if !self.activation.can_sleep {
            return false;
        }

        let linear_threshold = params.body_linear_velocity_sleep_threshold;
        if self.vels.angvel.norm() < params.body_angular_velocity_sleep_threshold
            && self.vels.linvel.norm_squared() < linear_threshold * linear_threshold
        {
            self.activation.still_time += dt;
            self.activation.still_time >= params.body_time_to_sleep
        } else {
            self.activation.still_time = 0.0;
            false
        }
    }
}
