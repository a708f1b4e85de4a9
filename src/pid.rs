//! Closed-loop PID controller with output clamping.
//!
//! Error-driven and geometry-agnostic: the same controller regulates a
//! wheel velocity or a heading error depending on what the caller feeds
//! it. The only guard against integral windup is the output clamp; that
//! matches the controller's intended use in short, reset-bounded control
//! phases.

use crate::config::PidConfig;

/// PID controller with tunable gains, a mutable setpoint, and clamped
/// output.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    min_output: f64,
    max_output: f64,
    setpoint: f64,
    error_sum: f64,
    prev_error: f64,
}

impl PidController {
    /// Create a controller with the given gains and output bounds.
    ///
    /// The setpoint starts at zero; accumulated state starts cleared.
    pub fn new(kp: f64, ki: f64, kd: f64, min_output: f64, max_output: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            min_output,
            max_output,
            setpoint: 0.0,
            error_sum: 0.0,
            prev_error: 0.0,
        }
    }

    /// Create a controller from a validated [`PidConfig`].
    pub fn from_config(config: &PidConfig) -> Self {
        Self::new(
            config.kp,
            config.ki,
            config.kd,
            config.min_output,
            config.max_output,
        )
    }

    /// Store a new setpoint.
    ///
    /// Any value is accepted; physical plausibility is the caller's
    /// responsibility.
    pub fn set_target(&mut self, value: f64) {
        self.setpoint = value;
    }

    /// Current setpoint.
    pub fn target(&self) -> f64 {
        self.setpoint
    }

    /// Run one controller step against a measurement and return the
    /// clamped output.
    pub fn compute(&mut self, measurement: f64) -> f64 {
        let error = self.setpoint - measurement;
        self.error_sum += error;

        let p = self.kp * error;
        let i = self.ki * self.error_sum;
        let d = self.kd * (error - self.prev_error);

        let output = (p + i + d).clamp(self.min_output, self.max_output);

        self.prev_error = error;
        output
    }

    /// Clear accumulated and previous error.
    ///
    /// Gains, bounds, and setpoint are preserved. Called when a control
    /// phase ends so stale integral state cannot leak into the next one.
    pub fn reset(&mut self) {
        self.error_sum = 0.0;
        self.prev_error = 0.0;
    }
}
