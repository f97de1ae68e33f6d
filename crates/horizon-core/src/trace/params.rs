//! Integration parameters shared by every pixel of a render.

use serde::{Deserialize, Serialize};

use crate::scene::BlackHole;

/// Step-size policy, step budget and redshift switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationParams {
    /// Step length at the Schwarzschild radius.
    pub min_tick: f64,
    /// Exponent applied to `r / radius`. 0 gives a fixed step.
    pub step_power: f64,
    /// Upper bound on `r / radius` when growing the step.
    pub max_step_ratio: f64,
    /// Steps after which a path is abandoned.
    pub max_steps: u32,
    /// Apply gravitational redshift to sampled radiance.
    pub enable_redshift: bool,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            min_tick: 1.0,
            step_power: 0.0,
            max_step_ratio: 5.0,
            max_steps: 1000,
            enable_redshift: true,
        }
    }
}

impl IntegrationParams {
    /// Minimum step as a fraction of the Schwarzschild radius.
    pub const TUNED_MIN_TICK_RATIO: f64 = 2e-3;
    pub const TUNED_STEP_POWER: f64 = 4.0;
    pub const TUNED_MAX_STEP_RATIO: f64 = 5.0;

    /// Parameters scaled to `hole`, with enough steps to cross the
    /// observer's distance five times at the minimum step.
    pub fn tuned_for(hole: &BlackHole, observer_radius: f64) -> Self {
        let min_tick = Self::TUNED_MIN_TICK_RATIO * hole.radius();
        let max_steps = (5.0 * (observer_radius / min_tick).round()).min(f64::from(u32::MAX));
        Self {
            min_tick,
            step_power: Self::TUNED_STEP_POWER,
            max_step_ratio: Self::TUNED_MAX_STEP_RATIO,
            max_steps: max_steps as u32,
            enable_redshift: true,
        }
    }

    /// Adaptive step length at distance `r` from a hole of radius `radius`.
    ///
    /// `min_tick * min(r / radius, max_step_ratio) ^ step_power`: short near
    /// the horizon where curvature is strong, capped far away.
    pub fn step_size(&self, r: f64, radius: f64) -> f64 {
        self.min_tick * (r / radius).min(self.max_step_ratio).powf(self.step_power)
    }
}
