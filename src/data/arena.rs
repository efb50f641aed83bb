//! A generational arena.
//!
//! Removing an element bumps the generation of its slot so that stale indices never alias the
//! element later inserted in the same slot. Slot reuse is LIFO, which keeps index attribution
//! deterministic for a given sequence of insertions and removals.

use std::ops;

/// An index (and generation) into an `Arena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Index {
    index: u32,
    generation: u32,
}

impl Default for Index {
    fn default() -> Self {
        Self::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32)
    }
}

impl Index {
    /// Creates a new `Index` from its raw parts.
    ///
    /// The parts should have been returned from an earlier call to `into_raw_parts`.
    pub fn from_raw_parts(index: u32, generation: u32) -> Index {
        Index { index, generation }
    }

    /// Converts this `Index` into its raw parts.
    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A container of `T` addressed by generational [`Index`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena`.
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// The number of elements in this arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this arena empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value` and returns its index.
    pub fn insert(&mut self, value: T) -> Index {
        self.len += 1;

        if let Some(i) = self.free.pop() {
            let slot = &mut self.slots[i as usize];
            slot.value = Some(value);
            Index::from_raw_parts(i, slot.generation)
        } else {
            let i = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            Index::from_raw_parts(i, 0)
        }
    }

    /// Removes the element at `i`, if `i` is still valid.
    pub fn remove(&mut self, i: Index) -> Option<T> {
        let slot = self.slots.get_mut(i.index as usize)?;

        if slot.generation != i.generation || slot.value.is_none() {
            return None;
        }

        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(i.index);
        self.len -= 1;
        slot.value.take()
    }

    /// Is `i` the index of an element of this arena?
    pub fn contains(&self, i: Index) -> bool {
        self.get(i).is_some()
    }

    /// A reference to the element at `i`, if `i` is still valid.
    pub fn get(&self, i: Index) -> Option<&T> {
        self.slots
            .get(i.index as usize)
            .filter(|slot| slot.generation == i.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// A mutable reference to the element at `i`, if `i` is still valid.
    pub fn get_mut(&mut self, i: Index) -> Option<&mut T> {
        self.slots
            .get_mut(i.index as usize)
            .filter(|slot| slot.generation == i.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Iterates through all the elements of this arena, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|value| (Index::from_raw_parts(i as u32, slot.generation), value))
        })
    }

    /// Mutably iterates through all the elements of this arena, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (Index::from_raw_parts(i as u32, generation), value))
        })
    }
}

impl<T> ops::Index<Index> for Arena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        self.get(index).expect("No element at index")
    }
}

impl<T> ops::IndexMut<Index> for Arena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        self.get_mut(index).expect("No element at index")
    }
}
