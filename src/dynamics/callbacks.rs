use crate::dynamics::{Body, BodyLists, BodyState, DirectBodyState};
use crate::math::{AngVector, Real, Vector};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Arbitrary data handed back to a force-integration callback.
pub type CallbackUserData = Box<dyn Any + Send + Sync>;

/// A user hook run after each step a body was simulated, able to alter its velocities and
/// accumulate forces for the next step.
///
/// Closures taking `(&mut DirectBodyState, Option<&(dyn Any + Send + Sync)>)` implement this
/// trait and are always alive.
pub trait ForceIntegrationCallback: Send + Sync {
    /// Is the target of this callback still alive?
    ///
    /// A callback that is not alive anymore is unregistered instead of being called.
    fn is_alive(&self) -> bool {
        true
    }

    /// Runs the callback.
    fn integrate_forces(
        &mut self,
        state: &mut DirectBodyState,
        user_data: Option<&(dyn Any + Send + Sync)>,
    );
}

impl<F> ForceIntegrationCallback for F
where
    F: FnMut(&mut DirectBodyState, Option<&(dyn Any + Send + Sync)>) + Send + Sync,
{
    fn integrate_forces(
        &mut self,
        state: &mut DirectBodyState,
        user_data: Option<&(dyn Any + Send + Sync)>,
    ) {
        self(state, user_data)
    }
}

/// A force-integration callback bound to a shared target.
///
/// The body only keeps a weak reference to the target: once every strong reference is dropped,
/// the callback is silently unregistered.
pub struct TargetedCallback<T, F> {
    target: Weak<T>,
    callback: F,
}

impl<T, F> TargetedCallback<T, F> {
    /// Calls `callback` on `target` for as long as `target` is alive.
    pub fn new(target: &Arc<T>, callback: F) -> Self {
        Self {
            target: Arc::downgrade(target),
            callback,
        }
    }
}

impl<T, F> ForceIntegrationCallback for TargetedCallback<T, F>
where
    T: Send + Sync,
    F: FnMut(&T, &mut DirectBodyState, Option<&(dyn Any + Send + Sync)>) + Send + Sync,
{
    fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn integrate_forces(
        &mut self,
        state: &mut DirectBodyState,
        user_data: Option<&(dyn Any + Send + Sync)>,
    ) {
        if let Some(target) = self.target.upgrade() {
            (self.callback)(target.as_ref(), state, user_data)
        }
    }
}

/// A user hook receiving the state of a body after each step it was simulated, typically to
/// synchronize an external representation of the body.
pub trait StateSyncCallback: Send + Sync {
    /// Runs the callback.
    fn sync_state(&mut self, state: &DirectBodyState);
}

impl<F> StateSyncCallback for F
where
    F: FnMut(&DirectBodyState) + Send + Sync,
{
    fn sync_state(&mut self, state: &DirectBodyState) {
        self(state)
    }
}

pub(crate) struct ForceIntegrationCallbackData {
    callback: Box<dyn ForceIntegrationCallback>,
    user_data: Option<CallbackUserData>,
}

/// The callbacks registered on a body.
#[derive(Default)]
pub(crate) struct BodyCallbacks {
    force_integration: Option<ForceIntegrationCallbackData>,
    state_sync: Option<Box<dyn StateSyncCallback>>,
}

impl BodyCallbacks {
    pub fn is_empty(&self) -> bool {
        self.force_integration.is_none() && self.state_sync.is_none()
    }
}

impl fmt::Debug for BodyCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyCallbacks")
            .field("force_integration", &self.force_integration.is_some())
            .field("state_sync", &self.state_sync.is_some())
            .finish()
    }
}

impl Body {
    /// Registers the force-integration callback of this body, replacing the previous one.
    ///
    /// `user_data` is handed back to the callback at each call.
    pub fn set_force_integration_callback(
        &mut self,
        callback: impl ForceIntegrationCallback + 'static,
        user_data: Option<CallbackUserData>,
    ) {
        self.callbacks.force_integration = Some(ForceIntegrationCallbackData {
            callback: Box::new(callback),
            user_data,
        });
    }

    /// Removes the force-integration callback of this body.
    pub fn clear_force_integration_callback(&mut self) {
        self.callbacks.force_integration = None;
    }

    /// Does this body have a force-integration callback?
    pub fn has_force_integration_callback(&self) -> bool {
        self.callbacks.force_integration.is_some()
    }

    /// Registers the state-sync callback of this body, replacing the previous one.
    pub fn set_state_sync_callback(&mut self, callback: impl StateSyncCallback + 'static) {
        self.callbacks.state_sync = Some(Box::new(callback));
    }

    /// Removes the state-sync callback of this body.
    pub fn clear_state_sync_callback(&mut self) {
        self.callbacks.state_sync = None;
    }

    /// Does this body have a state-sync callback?
    pub fn has_state_sync_callback(&self) -> bool {
        self.callbacks.state_sync.is_some()
    }

    /// The state snapshot of this body, created on first use and refreshed by this call.
    pub fn direct_state(&mut self, step: Real) -> &DirectBodyState {
        let mut state = self.direct_state.take().unwrap_or_default();
        state.read_from(self, step);
        self.direct_state.insert(state)
    }

    /// Applies the writes performed on `state` by a callback.
    ///
    /// Changing a velocity or adding a force wakes the body up.
    fn apply_direct_state(&mut self, state: &DirectBodyState, lists: &mut BodyLists) {
        let was_sleeping = !self.activation.active;
        let moved = state.linvel != self.vels.linvel
            || state.angvel != self.vels.angvel
            || state.added_force != Vector::zeros()
            || state.added_torque != AngVector::zeros();

        self.vels.linvel = state.linvel;
        self.vels.angvel = state.angvel;
        self.forces.applied_force += state.added_force;
        self.forces.applied_torque += state.added_torque;

        if moved {
            self.wake_up(lists);
        }

        if state.sleeping != was_sleeping {
            // Sleep writes never fail.
            let _ = self.set_state(BodyState::Sleeping, state.sleeping.into(), lists);
        }
    }

    /// Dispatches the callbacks of this body.
    ///
    /// The force-integration callback runs first, and its writes to the state snapshot are
    /// applied before the state-sync callback sees it. A force-integration callback whose target
    /// died is unregistered without being called.
    #[profiling::function]
    pub fn call_queries(&mut self, step: Real, lists: &mut BodyLists) {
        let mut state = self.direct_state.take().unwrap_or_default();

        if let Some(mut data) = self.callbacks.force_integration.take() {
            if data.callback.is_alive() {
                state.read_from(self, step);
                data.callback
                    .integrate_forces(&mut state, data.user_data.as_deref());
                self.apply_direct_state(&state, lists);
                self.callbacks.force_integration = Some(data);
            } else {
                log::debug!("Unregistering a force-integration callback with a dead target.");
            }
        }

        if self.callbacks.state_sync.is_some() {
            state.read_from(self, step);
            if let Some(sync) = &mut self.callbacks.state_sync {
                sync.sync_state(&state);
            }
        }

        self.direct_state = Some(state);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{BodyBuilder, BodyHandle};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dead_target_is_unregistered() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic().build();
        let calls = Arc::new(AtomicUsize::new(0));
        let target = Arc::new(());
        let counter = calls.clone();
        body.set_force_integration_callback(
            TargetedCallback::new(
                &target,
                move |_: &(), _: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            ),
            None,
        );

        body.call_queries(0.1, &mut lists);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(target);
        body.call_queries(0.1, &mut lists);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!body.has_force_integration_callback());
    }

    #[test]
    fn callback_writes_are_applied_before_state_sync() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic().mass(2.0).build();
        let synced = Arc::new(std::sync::Mutex::new(None));

        body.set_force_integration_callback(
            |state: &mut DirectBodyState, user_data: Option<&(dyn Any + Send + Sync)>| {
                let scale = user_data
                    .and_then(|data| data.downcast_ref::<Real>())
                    .copied()
                    .unwrap_or(1.0);
                state.set_linear_velocity(Vector::new(1.0, 0.0, 0.0) * scale);
                state.apply_central_force(&Vector::new(0.0, 4.0, 0.0));
            },
            Some(Box::new(3.0 as Real)),
        );
        let sink = synced.clone();
        body.set_state_sync_callback(move |state: &DirectBodyState| {
            *sink.lock().unwrap() = Some(state.linear_velocity());
        });

        body.call_queries(0.5, &mut lists);

        assert_eq!(body.linvel(), &Vector::new(3.0, 0.0, 0.0));
        assert_eq!(body.forces.applied_force, Vector::new(0.0, 4.0, 0.0));
        assert_eq!(*synced.lock().unwrap(), Some(Vector::new(3.0, 0.0, 0.0)));
        assert_eq!(body.direct_state(0.5).step(), 0.5);
    }

    #[test]
    fn callback_writes_wake_the_body_up() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic().sleeping(true).build();
        body.attach(BodyHandle::from_raw_parts(0, 0), &mut lists);
        body.set_force_integration_callback(
            |state: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {
                state.set_linear_velocity(Vector::new(5.0, 0.0, 0.0))
            },
            None,
        );

        body.call_queries(0.1, &mut lists);
        assert!(body.is_active());
        assert_eq!(body.linvel(), &Vector::new(5.0, 0.0, 0.0));
        assert_eq!(lists.active_bodies(), &[BodyHandle::from_raw_parts(0, 0)]);

        // Callbacks leaving the state untouched do not wake the body up.
        body.set_active(false, &mut lists);
        body.set_force_integration_callback(
            |_: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {},
            None,
        );
        body.call_queries(0.1, &mut lists);
        assert!(!body.is_active());
    }

    #[test]
    fn callback_can_put_the_body_to_sleep() {
        let mut lists = BodyLists::new();
        let mut body = BodyBuilder::new_dynamic()
            .linvel(Vector::new(0.0, 1.0, 0.0))
            .build();
        body.set_force_integration_callback(
            |state: &mut DirectBodyState, _: Option<&(dyn Any + Send + Sync)>| {
                state.set_sleep_state(true)
            },
            None,
        );

        body.call_queries(0.1, &mut lists);
        assert!(!body.is_active());
        assert_eq!(body.linvel(), &Vector::zeros());
    }
}
