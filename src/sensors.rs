//! Capability traits for sensor and actuator collaborators.
//!
//! The controller never owns hardware lifetime; it holds handles that
//! expose exactly the capability it consumes. Implementations are
//! expected to be cheap cloneable handles over the real device driver.
//!
//! All sensor reads are infallible by contract: on a hardware fault the
//! collaborator returns its last-known value (or zero before the first
//! good read). Fault detection and recovery live in the device layer.

/// Cumulative linear displacement, e.g. a tracked wheel's travel.
///
/// The reading may wrap or reset with the underlying encoder; handling
/// that is the device layer's responsibility.
pub trait DisplacementSensor: Send {
    /// Current cumulative displacement in linear units.
    fn position(&self) -> f64;
}

/// Absolute heading from an inertial sensor.
pub trait HeadingSensor: Send {
    /// Current heading in degrees. Accumulates without bound: values
    /// beyond 360 and negative values are expected.
    fn heading(&self) -> f64;
}

/// Raw angular position, e.g. a rotation sensor on a tracking wheel axle.
pub trait RotationSensor: Send {
    /// Total rotation in radians since power-on or last reset.
    fn rotation(&self) -> f64;
}

/// A velocity command sink with readback, e.g. a motor group.
pub trait VelocityActuator: Send {
    /// Command a signed velocity.
    fn set_velocity(&mut self, velocity: f64);

    /// Most recent measured (or, for open-loop devices, commanded)
    /// velocity. Used as the feedback term of the wheel-velocity loop.
    fn velocity(&self) -> f64;
}

/// Adapts an angular [`RotationSensor`] into a [`DisplacementSensor`]
/// by scaling with the wheel radius.
pub struct TrackingWheel<S: RotationSensor> {
    sensor: S,
    wheel_radius: f64,
}

impl<S: RotationSensor> TrackingWheel<S> {
    /// Wrap a rotation sensor mounted on a wheel of the given radius.
    pub fn new(sensor: S, wheel_radius: f64) -> Self {
        Self {
            sensor,
            wheel_radius,
        }
    }
}

impl<S: RotationSensor> DisplacementSensor for TrackingWheel<S> {
    fn position(&self) -> f64 {
        self.sensor.rotation() * self.wheel_radius
    }
}
