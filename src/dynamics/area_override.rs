//! Aggregation of the gravity and damping of the areas overlapping a body.

use crate::error_handler::Error;
use crate::geometry::{AreaQuery, AreaSpaceOverrideMode};
use crate::math::{Point, Real, Vector};

/// The environment a body is subject to, after aggregating every area overlapping it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AreaEffects {
    /// The total gravity, scaled by the body's gravity scale.
    pub gravity: Vector<Real>,
    /// The linear damping the body will be subject to.
    pub linear_damp: Real,
    /// The angular damping the body will be subject to.
    pub angular_damp: Real,
}

#[derive(Default)]
struct Accumulator {
    gravity: Vector<Real>,
    linear_damp: Real,
    angular_damp: Real,
}

impl Accumulator {
    fn add(&mut self, area: &(impl AreaQuery + ?Sized), position: &Point<Real>) {
        self.gravity += area.compute_gravity(position);
        self.linear_damp += area.linear_damp();
        self.angular_damp += area.angular_damp();
    }
}

/// Folds the areas overlapping a body into a single gravity and damping.
///
/// `overlapping` must yield the areas from the highest priority to the lowest. Each area is
/// combined according to its [`AreaSpaceOverrideMode`]; the `default_area` is added last unless
/// an area stopped the evaluation. The resulting gravity is multiplied by `gravity_scale`, and a
/// non-negative `linear_damp` or `angular_damp` of the body replaces the aggregated one.
pub fn aggregate_area_effects<'a, A: AreaQuery + ?Sized + 'a>(
    position: &Point<Real>,
    overlapping: impl IntoIterator<Item = &'a A>,
    default_area: Option<&A>,
    gravity_scale: Real,
    linear_damp: Real,
    angular_damp: Real,
) -> Result<AreaEffects, Error> {
    let default_area = default_area.ok_or(Error::MissingDefaultArea)?;
    let mut acc = Accumulator::default();
    let mut stopped = false;

    for area in overlapping {
        match area.space_override_mode() {
            AreaSpaceOverrideMode::Disabled => {}
            AreaSpaceOverrideMode::Combine => acc.add(area, position),
            AreaSpaceOverrideMode::CombineReplace => {
                acc.add(area, position);
                stopped = true;
            }
            AreaSpaceOverrideMode::ReplaceCombine => {
                acc = Accumulator::default();
                acc.add(area, position);
            }
            AreaSpaceOverrideMode::Replace => {
                acc = Accumulator::default();
                acc.add(area, position);
                stopped = true;
            }
        }

        if stopped {
            break;
        }
    }

    if !stopped {
        acc.add(default_area, position);
    }

    Ok(AreaEffects {
        gravity: acc.gravity * gravity_scale,
        linear_damp: if linear_damp >= 0.0 {
            linear_damp
        } else {
            acc.linear_damp
        },
        angular_damp: if angular_damp >= 0.0 {
            angular_damp
        } else {
            acc.angular_damp
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Area;
    use approx::assert_relative_eq;

    fn area(g: Real, damp: Real, priority: i32, mode: AreaSpaceOverrideMode) -> Area {
        Area::new(Vector::new(0.0, -1.0, 0.0), g, damp, damp).with_override(priority, mode)
    }

    fn default_area() -> Area {
        Area::new(Vector::new(0.0, -1.0, 0.0), 10.0, 0.1, 0.2)
    }

    #[test]
    fn combine_then_replace_stops_at_replace() {
        use AreaSpaceOverrideMode::*;
        let areas = [
            area(1.0, 1.0, 3, Combine),
            area(2.0, 2.0, 2, Combine),
            area(4.0, 4.0, 1, Replace),
        ];
        let effects = aggregate_area_effects(
            &Point::origin(),
            areas.iter(),
            Some(&default_area()),
            1.0,
            -1.0,
            -1.0,
        )
        .unwrap();

        // Everything accumulated before the replacing area is discarded, the default included.
        assert_relative_eq!(effects.gravity, Vector::new(0.0, -4.0, 0.0));
        assert_relative_eq!(effects.linear_damp, 4.0);
        assert_relative_eq!(effects.angular_damp, 4.0);
    }

    #[test]
    fn combine_adds_the_default_area() {
        let areas = [area(1.0, 0.5, 0, AreaSpaceOverrideMode::Combine)];
        let effects = aggregate_area_effects(
            &Point::origin(),
            areas.iter(),
            Some(&default_area()),
            2.0,
            -1.0,
            -1.0,
        )
        .unwrap();

        assert_relative_eq!(effects.gravity, Vector::new(0.0, -22.0, 0.0));
        assert_relative_eq!(effects.linear_damp, 0.6);
        assert_relative_eq!(effects.angular_damp, 0.7);
    }

    #[test]
    fn combine_replace_stops_after_adding() {
        use AreaSpaceOverrideMode::*;
        let areas = [
            area(1.0, 1.0, 2, Combine),
            area(2.0, 2.0, 1, CombineReplace),
            area(4.0, 4.0, 0, Combine),
        ];
        let effects = aggregate_area_effects(
            &Point::origin(),
            areas.iter(),
            Some(&default_area()),
            1.0,
            -1.0,
            -1.0,
        )
        .unwrap();

        assert_relative_eq!(effects.gravity, Vector::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn replace_combine_resets_and_continues() {
        use AreaSpaceOverrideMode::*;
        let areas = [
            area(1.0, 1.0, 2, Combine),
            area(2.0, 2.0, 1, ReplaceCombine),
            area(4.0, 4.0, 0, Disabled),
        ];
        let effects = aggregate_area_effects(
            &Point::origin(),
            areas.iter(),
            Some(&default_area()),
            1.0,
            -1.0,
            -1.0,
        )
        .unwrap();

        assert_relative_eq!(effects.gravity, Vector::new(0.0, -12.0, 0.0));
        assert_relative_eq!(effects.linear_damp, 2.1);
    }

    #[test]
    fn body_damping_overrides_areas() {
        let effects = aggregate_area_effects(
            &Point::origin(),
            Vec::<&Area>::new(),
            Some(&default_area()),
            1.0,
            0.0,
            3.0,
        )
        .unwrap();

        assert_eq!(effects.linear_damp, 0.0);
        assert_eq!(effects.angular_damp, 3.0);
        assert_relative_eq!(effects.gravity, Vector::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn missing_default_area() {
        let result = aggregate_area_effects(
            &Point::origin(),
            Vec::<&Area>::new(),
            None,
            1.0,
            -1.0,
            -1.0,
        );
        assert_eq!(result, Err(Error::MissingDefaultArea));
    }
}
