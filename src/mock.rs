//! Mock sensors and actuators for hardware-free testing.
//!
//! Each mock is a cloneable handle over shared state, so a test can keep
//! one clone to script sensor readings while the controller owns another.

use crate::sensors::{DisplacementSensor, HeadingSensor, RotationSensor, VelocityActuator};
use std::sync::{Arc, Mutex};

/// Mock wheel encoder reporting a scripted cumulative displacement.
#[derive(Clone, Default)]
pub struct MockEncoder {
    position: Arc<Mutex<f64>>,
}

impl MockEncoder {
    /// Create a new encoder reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute cumulative reading.
    pub fn set_position(&self, position: f64) {
        *self.position.lock().unwrap() = position;
    }

    /// Advance the cumulative reading by a delta.
    pub fn advance(&self, delta: f64) {
        *self.position.lock().unwrap() += delta;
    }
}

impl DisplacementSensor for MockEncoder {
    fn position(&self) -> f64 {
        *self.position.lock().unwrap()
    }
}

/// Mock inertial sensor reporting a scripted heading in degrees.
#[derive(Clone, Default)]
pub struct MockImu {
    heading: Arc<Mutex<f64>>,
}

impl MockImu {
    /// Create a new IMU reading zero degrees.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute heading in degrees (unbounded, like the real
    /// sensor's accumulating output).
    pub fn set_heading(&self, degrees: f64) {
        *self.heading.lock().unwrap() = degrees;
    }
}

impl HeadingSensor for MockImu {
    fn heading(&self) -> f64 {
        *self.heading.lock().unwrap()
    }
}

/// Mock rotation sensor reporting a scripted angle in radians.
#[derive(Clone, Default)]
pub struct MockRotationSensor {
    rotation: Arc<Mutex<f64>>,
}

impl MockRotationSensor {
    /// Create a new rotation sensor reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total rotation in radians.
    pub fn set_rotation(&self, radians: f64) {
        *self.rotation.lock().unwrap() = radians;
    }
}

impl RotationSensor for MockRotationSensor {
    fn rotation(&self) -> f64 {
        *self.rotation.lock().unwrap()
    }
}

/// Mock motor group that records the last commanded velocity and echoes
/// it back as its measured velocity.
#[derive(Clone, Default)]
pub struct MockMotorGroup {
    velocity: Arc<Mutex<f64>>,
}

impl MockMotorGroup {
    /// Create a new motor group at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last commanded velocity, for test assertions.
    pub fn commanded(&self) -> f64 {
        *self.velocity.lock().unwrap()
    }
}

impl VelocityActuator for MockMotorGroup {
    fn set_velocity(&mut self, velocity: f64) {
        *self.velocity.lock().unwrap() = velocity;
    }

    fn velocity(&self) -> f64 {
        *self.velocity.lock().unwrap()
    }
}
