//! Schedules of scalar hyperparameters over global training steps.
use serde::{Deserialize, Serialize};

/// A scalar value scheduled over global training steps.
///
/// Used for the exploration rate consumed by the acting loop and the
/// learning rate consumed by the learning loop.
pub trait Schedule {
    /// Value of the schedule at step `t`.
    fn value(&self, t: usize) -> f32;
}

/// A schedule that returns the same value at every step.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ConstantSchedule {
    /// The constant value.
    pub v: f32,
}

impl ConstantSchedule {
    /// Creates a constant schedule.
    pub fn new(v: f32) -> Self {
        Self { v }
    }
}

impl Schedule for ConstantSchedule {
    fn value(&self, _t: usize) -> f32 {
        self.v
    }
}

/// Linear interpolation from `v_0` to `v_final` over `n_final` steps,
/// constant afterwards.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LinearSchedule {
    /// Initial value.
    pub v_0: f32,

    /// Final value.
    pub v_final: f32,

    /// Step at which the schedule reaches its final value.
    pub n_final: usize,
}

impl LinearSchedule {
    /// Creates a linear schedule.
    pub fn new(v_0: f32, v_final: f32, n_final: usize) -> Self {
        Self {
            v_0,
            v_final,
            n_final,
        }
    }
}

impl Schedule for LinearSchedule {
    fn value(&self, t: usize) -> f32 {
        if t >= self.n_final {
            self.v_final
        } else {
            let d = self.v_final - self.v_0;
            self.v_0 + d * (t as f32 / self.n_final as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_schedule_interpolates_and_clamps() {
        let s = LinearSchedule::new(1.0, 0.1, 100);
        assert_eq!(s.value(0), 1.0);
        assert!((s.value(50) - 0.55).abs() < 1e-6);
        assert_eq!(s.value(100), 0.1);
        assert_eq!(s.value(1000), 0.1);
    }

    #[test]
    fn constant_schedule_ignores_step() {
        let s = ConstantSchedule::new(0.05);
        assert_eq!(s.value(0), 0.05);
        assert_eq!(s.value(123456), 0.05);
    }
}
