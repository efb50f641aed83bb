use crate::math::Real;

/// Parameters for a time-step of a physics space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IntegrationParameters {
    /// The timestep length (default: `1.0 / 60.0`).
    pub dt: Real,
    /// Linear speed below which a body is considered still (default: `0.1`).
    pub body_linear_velocity_sleep_threshold: Real,
    /// Angular speed, in radians per second, below which a body is considered still
    /// (default: 8 degrees per second).
    pub body_angular_velocity_sleep_threshold: Real,
    /// How long a body must stay still before falling asleep, in seconds (default: `0.5`).
    pub body_time_to_sleep: Real,
}

impl IntegrationParameters {
    /// The inverse of the time-stepping length, i.e. the steps per seconds (Hz).
    ///
    /// This is zero if `self.dt` is zero.
    #[inline(always)]
    pub fn inv_dt(&self) -> Real {
        if self.dt == 0.0 {
            0.0
        } else {
            1.0 / self.dt
        }
    }

    /// Sets the inverse time-stepping length (i.e. the frequency).
    ///
    /// This automatically recompute `self.dt`.
    #[inline]
    pub fn set_inv_dt(&mut self, inv_dt: Real) {
        if inv_dt == 0.0 {
            self.dt = 0.0
        } else {
            self.dt = 1.0 / inv_dt
        }
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            body_linear_velocity_sleep_threshold: 0.1,
            body_angular_velocity_sleep_threshold: (8.0 as Real).to_radians(),
            body_time_to_sleep: 0.5,
        }
    }
}
