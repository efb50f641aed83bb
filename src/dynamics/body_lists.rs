use crate::dynamics::BodyHandle;

bitflags::bitflags! {
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
    /// The scheduling lists of a [`BodyLists`] a body is currently registered in.
    pub struct BodyListMembership: u8 {
        /// The body is simulated at each step.
        const ACTIVE = 1 << 0;
        /// The body's mass properties are recomputed at the beginning of the next step.
        const MASS_PROPERTIES_UPDATE = 1 << 1;
        /// The body's callbacks are dispatched at the end of the next step.
        const STATE_QUERY = 1 << 2;
    }
}

/// The scheduling lists of a physics space.
///
/// Each body tracks its own membership, so that registering twice is a no-op and leaving a list
/// is not a search through the other ones. Lists preserve insertion order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BodyLists {
    pub(crate) active: Vec<BodyHandle>,
    pub(crate) mass_properties_update: Vec<BodyHandle>,
    pub(crate) state_query: Vec<BodyHandle>,
}

impl BodyLists {
    /// Creates empty scheduling lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bodies simulated at each step.
    pub fn active_bodies(&self) -> &[BodyHandle] {
        &self.active
    }

    /// The bodies waiting for a mass properties recomputation.
    pub fn mass_properties_update_queue(&self) -> &[BodyHandle] {
        &self.mass_properties_update
    }

    /// The bodies waiting for their callbacks to be dispatched.
    pub fn state_query_queue(&self) -> &[BodyHandle] {
        &self.state_query
    }

    fn list_mut(&mut self, list: BodyListMembership) -> &mut Vec<BodyHandle> {
        if list == BodyListMembership::ACTIVE {
            &mut self.active
        } else if list == BodyListMembership::MASS_PROPERTIES_UPDATE {
            &mut self.mass_properties_update
        } else {
            &mut self.state_query
        }
    }

    /// Registers `handle` in `list`, unless `membership` says it already is.
    pub(crate) fn add(
        &mut self,
        list: BodyListMembership,
        handle: BodyHandle,
        membership: &mut BodyListMembership,
    ) {
        if !membership.contains(list) {
            membership.insert(list);
            self.list_mut(list).push(handle);
        }
    }

    /// Unregisters `handle` from `list`, if `membership` says it is there.
    pub(crate) fn remove(
        &mut self,
        list: BodyListMembership,
        handle: BodyHandle,
        membership: &mut BodyListMembership,
    ) {
        if membership.contains(list) {
            membership.remove(list);
            let entries = self.list_mut(list);
            if let Some(i) = entries.iter().position(|h| *h == handle) {
                entries.remove(i);
            }
        }
    }

    /// Unregisters `handle` from every list.
    pub(crate) fn remove_from_all(
        &mut self,
        handle: BodyHandle,
        membership: &mut BodyListMembership,
    ) {
        for list in [
            BodyListMembership::ACTIVE,
            BodyListMembership::MASS_PROPERTIES_UPDATE,
            BodyListMembership::STATE_QUERY,
        ] {
            self.remove(list, handle, membership);
        }
    }
}
