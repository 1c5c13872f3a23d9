//! Frame-rate independent exponential smoothing.
//!
//! A value approaching a target closes 99% of the remaining gap every
//! `duration` seconds, whatever the step size:
//!
//! ```text
//! factor = 1 - 0.01^(dt / duration)
//! next   = lerp(current, target, factor)
//! ```
//!
//! Two steps of `dt` leave `0.01^(2 dt / D)` of the error, exactly what one
//! step of `2 dt` leaves, so fixed and variable time steps converge alike.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fraction of the error left after `duration` seconds.
const RESIDUAL: f32 = 0.01;

/// Blend factor for a step of `delta_time` with the given time constant.
///
/// A non-positive duration snaps straight to the target.
#[inline]
pub fn blend_factor(delta_time: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    1.0 - RESIDUAL.powf(delta_time.max(0.0) / duration)
}

/// Gap, in units of f32 resolution at the target, under which a value lands
/// on the target exactly.
const SETTLE_ULPS: f32 = 16.0;

/// Near the target `(target - current) * factor` rounds to nothing and the
/// value would stall a few ulps short, so it lands on the target instead.
#[inline]
fn settle(next: f32, target: f32) -> f32 {
    if (target - next).abs() <= SETTLE_ULPS * f32::EPSILON * target.abs().max(1.0) {
        target
    } else {
        next
    }
}

/// A scalar that eases toward its targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedScalar {
    value: f32,
}

impl SmoothedScalar {
    pub fn new(value: f32) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump straight to `value`.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
    }

    /// Advance toward `target` by one step and return the new value.
    pub fn approach(&mut self, target: f32, delta_time: f32, duration: f32) -> f32 {
        let factor = blend_factor(delta_time, duration);
        self.value = settle(self.value + (target - self.value) * factor, target);
        self.value
    }
}

/// A vector that eases toward its targets, component-wise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothedVector {
    value: Vec3,
}

impl SmoothedVector {
    pub fn new(value: Vec3) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> Vec3 {
        self.value
    }

    pub fn approach(&mut self, target: Vec3, delta_time: f32, duration: f32) -> Vec3 {
        let next = self.value.lerp(target, blend_factor(delta_time, duration));
        self.value = Vec3::new(
            settle(next.x, target.x),
            settle(next.y, target.y),
            settle(next.z, target.z),
        );
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: f32 = 0.2;

    #[test]
    fn test_one_duration_closes_ninety_nine_percent() {
        let mut s = SmoothedScalar::new(0.0);
        s.approach(10.0, DURATION, DURATION);
        assert!((s.value() - 9.9).abs() < 1e-4);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut s = SmoothedScalar::new(3.0);
        assert_eq!(s.approach(7.0, 0.016, 0.0), 7.0);
        assert_eq!(blend_factor(0.016, -1.0), 1.0);
    }

    #[test]
    fn test_zero_delta_time_holds_value() {
        let mut s = SmoothedScalar::new(3.0);
        assert_eq!(s.approach(7.0, 0.0, DURATION), 3.0);
    }

    #[test]
    fn test_converges_within_five_durations_fixed_step() {
        let mut s = SmoothedScalar::new(2.0);
        // 5 * D = 1.0s in 100 fixed steps
        for _ in 0..100 {
            s.approach(0.0, 0.01, DURATION);
        }
        assert!(s.value().abs() < 1e-8, "value = {}", s.value());
    }

    #[test]
    fn test_variable_step_matches_fixed_step() {
        let mut fixed = SmoothedScalar::new(2.0);
        for _ in 0..100 {
            fixed.approach(0.0, 0.01, DURATION);
        }

        // Same 1.0s total in uneven steps
        let steps: [f32; 4] = [0.003, 0.017, 0.031, 0.049];
        let mut variable = SmoothedScalar::new(2.0);
        let mut elapsed = 0.0;
        let mut i = 0;
        while elapsed < 1.0 - 1e-6 {
            let dt = steps[i % steps.len()].min(1.0 - elapsed);
            variable.approach(0.0, dt, DURATION);
            elapsed += dt;
            i += 1;
        }

        assert!(variable.value().abs() < 1e-8);
        assert!((variable.value() - fixed.value()).abs() < 1e-8);
    }

    fn run_fixed(from: f32, to: f32) -> SmoothedScalar {
        let mut s = SmoothedScalar::new(from);
        for _ in 0..100 {
            s.approach(to, 0.01, DURATION);
        }
        s
    }

    fn run_variable(from: f32, to: f32) -> SmoothedScalar {
        let steps: [f32; 5] = [0.004, 0.021, 0.009, 0.033, 0.013];
        let mut s = SmoothedScalar::new(from);
        let mut elapsed = 0.0_f32;
        let mut i = 0;
        while elapsed < 1.0 - 1e-6 {
            let dt = steps[i % steps.len()].min(1.0 - elapsed);
            s.approach(to, dt, DURATION);
            elapsed += dt;
            i += 1;
        }
        s
    }

    #[test]
    fn test_converges_to_nonzero_targets_fixed_step() {
        for (from, to) in [(0.0, 10.0), (7.0, 2.0), (0.0, 1.0), (-3.0, 4.0)] {
            let s = run_fixed(from, to);
            assert!((s.value() - to).abs() < 1e-8, "{from} -> {to}: value = {}", s.value());
        }
    }

    #[test]
    fn test_converges_to_nonzero_targets_variable_step() {
        for (from, to) in [(0.0, 10.0), (7.0, 2.0)] {
            let fixed = run_fixed(from, to);
            let variable = run_variable(from, to);
            assert!((variable.value() - to).abs() < 1e-8, "{from} -> {to}: value = {}", variable.value());
            assert!((variable.value() - fixed.value()).abs() < 1e-8);
        }
    }

    #[test]
    fn test_settled_value_stays_on_target() {
        let mut s = run_fixed(0.0, 10.0);
        s.approach(10.0, 0.01, DURATION);
        assert_eq!(s.value(), 10.0);
    }

    #[test]
    fn test_half_steps_equal_one_full_step() {
        let mut one = SmoothedScalar::new(1.0);
        one.approach(0.0, 0.1, DURATION);

        let mut two = SmoothedScalar::new(1.0);
        two.approach(0.0, 0.05, DURATION);
        two.approach(0.0, 0.05, DURATION);

        assert!((one.value() - two.value()).abs() < 1e-6);
    }

    #[test]
    fn test_vector_converges() {
        let mut v = SmoothedVector::new(Vec3::new(0.0, 0.9, 0.0));
        let target = Vec3::new(0.0, 0.5, 0.0);
        for _ in 0..60 {
            v.approach(target, 1.0 / 60.0, DURATION);
        }
        assert!((v.value() - target).length() < 1e-4);
    }

    #[test]
    fn test_vector_lands_exactly_on_nonzero_target() {
        let mut v = SmoothedVector::new(Vec3::new(0.0, 0.9, 0.0));
        let target = Vec3::new(0.1, 0.5, -0.25);
        for _ in 0..100 {
            v.approach(target, 0.01, DURATION);
        }
        assert_eq!(v.value(), target);
    }
}
