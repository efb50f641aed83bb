use crate::data::arena::Arena;
use crate::math::{Point, Real, Vector};
use crate::utils::{self, Transform};

/// The unique handle of an area added to an `AreaSet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct AreaHandle(pub crate::data::arena::Index);

impl AreaHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs an handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(crate::data::arena::Index::from_raw_parts(id, generation))
    }

    /// An always-invalid area handle.
    pub fn invalid() -> Self {
        Self::from_raw_parts(crate::INVALID_U32, crate::INVALID_U32)
    }
}

/// How an area's gravity and damping combine with the areas of lower priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum AreaSpaceOverrideMode {
    /// The area has no influence on the bodies it overlaps.
    #[default]
    Disabled,
    /// Adds to what has been accumulated so far, then keeps evaluating lower priorities.
    Combine,
    /// Adds to what has been accumulated so far, then stops.
    CombineReplace,
    /// Discards what has been accumulated so far, then stops.
    Replace,
    /// Discards what has been accumulated so far, then keeps evaluating lower priorities.
    ReplaceCombine,
}

/// The queries a body needs from an area it overlaps.
pub trait AreaQuery {
    /// The gravity this area applies at the given world-space point.
    fn compute_gravity(&self, position: &Point<Real>) -> Vector<Real>;
    /// The linear damping contributed by this area.
    fn linear_damp(&self) -> Real;
    /// The angular damping contributed by this area.
    fn angular_damp(&self) -> Real;
    /// How this area combines with lower-priority areas.
    fn space_override_mode(&self) -> AreaSpaceOverrideMode;
    /// The priority of this area. Higher priorities are evaluated first.
    fn priority(&self) -> i32;
}

/// A region of space altering the gravity and damping of the bodies it overlaps.
///
/// The default area of a space is an `Area` too: it applies everywhere, after every overlapping
/// area that did not stop the evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Area {
    /// The pose of this area in world-space.
    pub transform: Transform,
    /// The gravity strength.
    pub gravity: Real,
    /// The gravity direction, or the local-space attraction point if `gravity_is_point` is set.
    pub gravity_vector: Vector<Real>,
    /// Does the gravity pull towards a point instead of along a direction?
    pub gravity_is_point: bool,
    /// The distance at which a point gravity has exactly the strength `gravity`.
    ///
    /// If zero, the point gravity has the same strength at every distance.
    pub gravity_point_unit_distance: Real,
    /// The linear damping contributed by this area.
    pub linear_damp: Real,
    /// The angular damping contributed by this area.
    pub angular_damp: Real,
    /// The priority of this area.
    pub priority: i32,
    /// How this area combines with lower-priority areas.
    pub space_override_mode: AreaSpaceOverrideMode,
}

impl Default for Area {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            gravity: 9.8,
            gravity_vector: Vector::new(0.0, -1.0, 0.0),
            gravity_is_point: false,
            gravity_point_unit_distance: 0.0,
            linear_damp: 0.1,
            angular_damp: 0.1,
            priority: 0,
            space_override_mode: AreaSpaceOverrideMode::Disabled,
        }
    }
}

impl Area {
    /// An area with the given directional gravity and damping.
    pub fn new(
        gravity_direction: Vector<Real>,
        gravity: Real,
        linear_damp: Real,
        angular_damp: Real,
    ) -> Self {
        Self {
            gravity,
            gravity_vector: gravity_direction,
            linear_damp,
            angular_damp,
            ..Default::default()
        }
    }

    /// Sets the priority and override mode of this area.
    pub fn with_override(mut self, priority: i32, mode: AreaSpaceOverrideMode) -> Self {
        self.priority = priority;
        self.space_override_mode = mode;
        self
    }
}

impl AreaQuery for Area {
    fn compute_gravity(&self, position: &Point<Real>) -> Vector<Real> {
        if !self.gravity_is_point {
            return self.gravity_vector * self.gravity;
        }

        let to_center = self.transform.xform(&self.gravity_vector) - position.coords;

        if self.gravity_point_unit_distance > 0.0 {
            let dist_sq = to_center.norm_squared();
            if dist_sq > 0.0 {
                let unit_sq = self.gravity_point_unit_distance * self.gravity_point_unit_distance;
                let strength = self.gravity * unit_sq / dist_sq;
                to_center.normalize() * strength
            } else {
                Vector::zeros()
            }
        } else {
            utils::normalize_or_zero(&to_center) * self.gravity
        }
    }

    fn linear_damp(&self) -> Real {
        self.linear_damp
    }

    fn angular_damp(&self) -> Real {
        self.angular_damp
    }

    fn space_override_mode(&self) -> AreaSpaceOverrideMode {
        self.space_override_mode
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// A set of areas that can be handled by a physics space.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AreaSet {
    areas: Arena<Area>,
}

impl AreaSet {
    /// Create a new empty set of areas.
    pub fn new() -> Self {
        Self {
            areas: Arena::new(),
        }
    }

    /// The number of areas in this set.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// `true` if there are no areas in this set.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Insert an area into this set and retrieve its handle.
    pub fn insert(&mut self, area: Area) -> AreaHandle {
        AreaHandle(self.areas.insert(area))
    }

    /// Removes an area from this set.
    ///
    /// Bodies still referencing it simply stop being affected by it.
    pub fn remove(&mut self, handle: AreaHandle) -> Option<Area> {
        self.areas.remove(handle.0)
    }

    /// Gets the area with the given handle.
    pub fn get(&self, handle: AreaHandle) -> Option<&Area> {
        self.areas.get(handle.0)
    }

    /// Gets a mutable reference to the area with the given handle.
    pub fn get_mut(&mut self, handle: AreaHandle) -> Option<&mut Area> {
        self.areas.get_mut(handle.0)
    }

    /// Iterates through all the areas of this set.
    pub fn iter(&self) -> impl Iterator<Item = (AreaHandle, &Area)> {
        self.areas.iter().map(|(h, a)| (AreaHandle(h), a))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn point_gravity_falloff() {
        let area = Area {
            transform: Transform::from_translation(Vector::new(0.0, 10.0, 0.0)),
            gravity: 4.0,
            gravity_vector: Vector::zeros(),
            gravity_is_point: true,
            gravity_point_unit_distance: 1.0,
            ..Default::default()
        };

        // At twice the unit distance, the strength is divided by four.
        let g = area.compute_gravity(&Point::new(0.0, 8.0, 0.0));
        assert_relative_eq!(g, Vector::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
        // At the attraction point itself, there is no pull.
        assert_eq!(
            area.compute_gravity(&Point::new(0.0, 10.0, 0.0)),
            Vector::zeros()
        );
    }

    #[test]
    fn directional_gravity_ignores_position() {
        let area = Area::default();
        assert_relative_eq!(
            area.compute_gravity(&Point::new(3.0, -2.0, 1.0)),
            Vector::new(0.0, -9.8, 0.0)
        );
    }
}
