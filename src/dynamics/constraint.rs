use crate::data::arena::Arena;
use crate::dynamics::{BodyHandle, BodySet};

/// The unique identifier of a constraint added to a constraint set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct ConstraintHandle(pub crate::data::arena::Index);

impl ConstraintHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs an handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(crate::data::arena::Index::from_raw_parts(id, generation))
    }

    /// An always-invalid constraint handle.
    pub fn invalid() -> Self {
        Self::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32)
    }
}

/// A constraint coupling several bodies.
///
/// Only the adjacency matters here: the constraint itself is solved elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// The bodies attached to this constraint.
    pub bodies: Vec<BodyHandle>,
}

impl Constraint {
    /// A constraint between the given bodies.
    pub fn new(bodies: impl IntoIterator<Item = BodyHandle>) -> Self {
        Self {
            bodies: bodies.into_iter().collect(),
        }
    }
}

/// A set of constraints that can be handled by a physics space.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConstraintSet {
    constraints: Arena<Constraint>,
}

impl ConstraintSet {
    /// Creates a new empty set of constraints.
    pub fn new() -> Self {
        Self {
            constraints: Arena::new(),
        }
    }

    /// The number of constraints on this set.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// `true` if there are no constraints in this set.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Is the given constraint handle valid?
    pub fn contains(&self, handle: ConstraintHandle) -> bool {
        self.constraints.contains(handle.0)
    }

    /// Gets the constraint with the given handle.
    pub fn get(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.constraints.get(handle.0)
    }

    /// Iterates through all the constraints of this set.
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintHandle, &Constraint)> {
        self.constraints
            .iter()
            .map(|(h, c)| (ConstraintHandle(h), c))
    }

    /// Inserts a new constraint and registers it on each of its bodies, along with the index of
    /// the body within the constraint.
    pub fn insert(&mut self, constraint: Constraint, bodies: &mut BodySet) -> ConstraintHandle {
        let handle = ConstraintHandle(self.constraints.insert(constraint));

        for (i, body) in self.constraints[handle.0].bodies.iter().enumerate() {
            if let Some(body) = bodies.get_mut(*body) {
                body.add_constraint(handle, i);
            }
        }

        handle
    }

    /// Removes a constraint from this set, and unregisters it from its bodies.
    pub fn remove(
        &mut self,
        handle: ConstraintHandle,
        bodies: &mut BodySet,
    ) -> Option<Constraint> {
        let constraint = self.constraints.remove(handle.0)?;

        for body in &constraint.bodies {
            if let Some(body) = bodies.get_mut(*body) {
                body.remove_constraint(handle);
            }
        }

        Some(constraint)
    }

    /// Removes every constraint attached to `body`. Called when the body leaves its set.
    pub(crate) fn remove_attached(&mut self, body: BodyHandle, bodies: &mut BodySet) {
        let attached: Vec<_> = self
            .iter()
            .filter(|(_, c)| c.bodies.contains(&body))
            .map(|(h, _)| h)
            .collect();

        for handle in attached {
            let _ = self.remove(handle, bodies);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::{BodyBuilder, BodyLists};

    #[test]
    fn bodies_know_their_index_in_each_constraint() {
        let mut lists = BodyLists::new();
        let mut bodies = BodySet::new();
        let mut constraints = ConstraintSet::new();
        let a = bodies.insert(BodyBuilder::new_dynamic().build(), &mut lists);
        let b = bodies.insert(BodyBuilder::new_static().build(), &mut lists);

        let c1 = constraints.insert(Constraint::new([a, b]), &mut bodies);
        let c2 = constraints.insert(Constraint::new([b, a]), &mut bodies);

        assert_eq!(bodies[a].constraints().collect::<Vec<_>>(), vec![(c1, 0), (c2, 1)]);
        assert_eq!(bodies[b].constraints().collect::<Vec<_>>(), vec![(c1, 1), (c2, 0)]);

        assert!(constraints.remove(c1, &mut bodies).is_some());
        assert!(constraints.remove(c1, &mut bodies).is_none());
        assert_eq!(bodies[a].constraints().collect::<Vec<_>>(), vec![(c2, 1)]);

        constraints.remove_attached(b, &mut bodies);
        assert!(constraints.is_empty());
        assert_eq!(bodies[a].constraints().count(), 0);
    }
}
