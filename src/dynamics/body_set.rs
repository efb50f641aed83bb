use crate::data::arena::Arena;
use crate::dynamics::{Body, BodyHandle, BodyLists, ConstraintSet};
use std::ops::{Index, IndexMut};

/// A set of bodies that can be handled by a physics space.
#[derive(Debug, Default)]
pub struct BodySet {
    bodies: Arena<Body>,
}

impl BodySet {
    /// Create a new empty set of bodies.
    pub fn new() -> Self {
        Self {
            bodies: Arena::new(),
        }
    }

    /// The number of bodies in this set.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// `true` if there are no bodies in this set.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Is the given body handle valid?
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Insert a body into this set and retrieve its handle.
    ///
    /// The body gets its mass properties recomputed during the next step, and joins the active
    /// list if it is active.
    pub fn insert(&mut self, body: impl Into<Body>, lists: &mut BodyLists) -> BodyHandle {
        let handle = BodyHandle(self.bodies.insert(body.into()));
        self.bodies[handle.0].attach(handle, lists);
        handle
    }

    /// Removes a body from this set, along with every constraint attached to it.
    ///
    /// The removed body is detached: it leaves every scheduling list of `lists`.
    pub fn remove(
        &mut self,
        handle: BodyHandle,
        lists: &mut BodyLists,
        constraints: &mut ConstraintSet,
    ) -> Option<Body> {
        let mut body = self.bodies.remove(handle.0)?;
        body.detach(lists);
        constraints.remove_attached(handle, self);
        body.constraints.clear();
        Some(body)
    }

    /// Gets the body with the given handle.
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    /// Gets a mutable reference to the body with the given handle.
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    /// Iterates through all the bodies of this set.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter().map(|(h, b)| (BodyHandle(h), b))
    }

    /// Iterates mutably through all the bodies of this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body)> {
        self.bodies.iter_mut().map(|(h, b)| (BodyHandle(h), b))
    }

    /// Wakes up the movable bodies sharing a constraint with `handle`.
    ///
    /// The body `handle` itself is never affected, even if it appears several times in one of
    /// its constraints.
    pub fn wake_up_neighbours(
        &mut self,
        handle: BodyHandle,
        constraints: &ConstraintSet,
        lists: &mut BodyLists,
    ) {
        let Some(body) = self.get(handle) else {
            return;
        };

        // Collected first: the neighbours are mutated below.
        let mut neighbours = Vec::new();
        for (constraint, own_index) in body.constraints() {
            if let Some(constraint) = constraints.get(constraint) {
                for (i, other) in constraint.bodies.iter().enumerate() {
                    if i != own_index && *other != handle {
                        neighbours.push(*other);
                    }
                }
            }
        }

        for other in neighbours {
            if let Some(other) = self.get_mut(other) {
                if other.mode().is_dynamic() && !other.is_active() {
                    other.set_active(true, lists);
                }
            }
        }
    }
}

impl Index<BodyHandle> for BodySet {
    type Output = Body;

    fn index(&self, index: BodyHandle) -> &Body {
        &self.bodies[index.0]
    }
}

impl IndexMut<BodyHandle> for BodySet {
    fn index_mut(&mut self, index: BodyHandle) -> &mut Body {
        &mut self.bodies[index.0]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{BodyBuilder, BodyListMembership, Constraint};

    #[test]
    fn insertion_and_removal_maintain_the_lists() {
        let mut lists = BodyLists::new();
        let mut bodies = BodySet::new();
        let mut constraints = ConstraintSet::new();

        let dynamic = bodies.insert(BodyBuilder::new_dynamic().build(), &mut lists);
        let fixed = bodies.insert(BodyBuilder::new_static().build(), &mut lists);

        assert_eq!(lists.active_bodies(), &[dynamic]);
        assert_eq!(lists.mass_properties_update_queue(), &[dynamic, fixed]);
        assert_eq!(bodies[dynamic].handle(), Some(dynamic));

        constraints.insert(Constraint::new([dynamic, fixed]), &mut bodies);
        let removed = bodies
            .remove(dynamic, &mut lists, &mut constraints)
            .unwrap();

        assert_eq!(removed.handle(), None);
        assert_eq!(removed.list_membership(), BodyListMembership::empty());
        assert!(lists.active_bodies().is_empty());
        assert_eq!(lists.mass_properties_update_queue(), &[fixed]);
        assert!(constraints.is_empty());
        assert_eq!(bodies[fixed].constraints().count(), 0);
        assert!(!bodies.contains(dynamic));
    }

    #[test]
    fn wake_up_reaches_movable_neighbours_only() {
        let mut lists = BodyLists::new();
        let mut bodies = BodySet::new();
        let mut constraints = ConstraintSet::new();

        let origin = bodies.insert(BodyBuilder::new_static().build(), &mut lists);
        let sleeper = bodies.insert(BodyBuilder::new_dynamic().sleeping(true).build(), &mut lists);
        let linear = bodies.insert(
            BodyBuilder::new_dynamic_linear().sleeping(true).build(),
            &mut lists,
        );
        let kinematic = bodies.insert(BodyBuilder::new_kinematic().build(), &mut lists);
        let far = bodies.insert(BodyBuilder::new_dynamic().sleeping(true).build(), &mut lists);

        constraints.insert(Constraint::new([origin, sleeper, kinematic]), &mut bodies);
        constraints.insert(Constraint::new([linear, origin]), &mut bodies);
        constraints.insert(Constraint::new([sleeper, far]), &mut bodies);

        bodies.wake_up_neighbours(origin, &constraints, &mut lists);

        assert!(!bodies[origin].is_active());
        assert!(bodies[sleeper].is_active());
        assert!(bodies[linear].is_active());
        assert!(!bodies[kinematic].is_active());
        // Propagation is a single hop.
        assert!(!bodies[far].is_active());
        assert_eq!(lists.active_bodies(), &[sleeper, linear]);
    }
}
