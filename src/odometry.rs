//! Wheel and inertial odometry for pose estimation.
//!
//! Fuses two cumulative wheel displacements and one absolute heading into
//! a planar pose by incremental dead reckoning. Translation integrates
//! wheel deltas; heading is taken wholesale from the inertial sensor,
//! which is treated as ground truth for orientation.
//!
//! The estimate drifts with wheel slip and sensor noise; callers can
//! re-anchor it at known positions with [`Odometry::set_pose`].

use crate::math::normalize_heading;
use crate::pose::Pose;
use crate::sensors::{DisplacementSensor, HeadingSensor};

/// Dead-reckoning pose estimator for a differential drivetrain.
///
/// Owns capability handles to its sensors, never the hardware itself.
/// Must be updated exactly once per control period, before anything in
/// that period reads the pose.
pub struct Odometry {
    left: Box<dyn DisplacementSensor>,
    right: Box<dyn DisplacementSensor>,
    imu: Box<dyn HeadingSensor>,

    /// Sensor readings cached from the previous update.
    prev_left: f64,
    prev_right: f64,
    prev_heading: f64,

    x: f64,
    y: f64,
    /// Raw cumulative heading in degrees; normalized only on read.
    heading: f64,
}

impl Odometry {
    /// Create an estimator anchored at (0, 0) with the heading the
    /// inertial sensor currently reports.
    ///
    /// Reads all three sensors once to seed the delta caches.
    pub fn new(
        left: Box<dyn DisplacementSensor>,
        right: Box<dyn DisplacementSensor>,
        imu: Box<dyn HeadingSensor>,
    ) -> Self {
        let prev_left = left.position();
        let prev_right = right.position();
        let prev_heading = imu.heading();

        log::info!(
            "odometry: initial readings left={:.3} right={:.3} heading={:.1}",
            prev_left,
            prev_right,
            prev_heading
        );

        Self {
            left,
            right,
            imu,
            prev_left,
            prev_right,
            prev_heading,
            x: 0.0,
            y: 0.0,
            heading: prev_heading,
        }
    }

    /// Integrate one cycle of sensor readings into the pose.
    ///
    /// Wheel deltas are averaged into a scalar displacement and projected
    /// onto the world frame using the heading cached from the previous
    /// cycle, a first-order approximation that holds for the short
    /// per-cycle displacements of a polled control loop. Heading itself
    /// is replaced by the fresh inertial reading rather than integrated.
    pub fn update(&mut self) {
        let current_left = self.left.position();
        let current_right = self.right.position();
        let current_heading = self.imu.heading();

        let delta_left = current_left - self.prev_left;
        let delta_right = current_right - self.prev_right;
        let delta_distance = (delta_left + delta_right) / 2.0;

        let prev_rad = normalize_heading(self.prev_heading).to_radians();
        self.x += delta_distance * prev_rad.cos();
        self.y += delta_distance * prev_rad.sin();
        self.heading = current_heading;

        self.prev_left = current_left;
        self.prev_right = current_right;
        self.prev_heading = current_heading;
    }

    /// Current X position.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Current Y position.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Current heading in degrees, normalized to [0, 360).
    pub fn heading(&self) -> f64 {
        normalize_heading(self.heading)
    }

    /// Raw cumulative heading in degrees, as accumulated by the inertial
    /// sensor. Exceeds 360 and goes negative with continued rotation.
    pub fn raw_heading(&self) -> f64 {
        self.heading
    }

    /// Current pose snapshot.
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.heading)
    }

    /// Re-anchor the estimate at a known pose.
    ///
    /// The heading override lasts until the next [`update`](Self::update),
    /// when the inertial reading becomes authoritative again; hosts that
    /// re-anchor heading should also re-zero the inertial sensor.
    pub fn set_pose(&mut self, x: f64, y: f64, heading_degrees: f64) {
        self.x = x;
        self.y = y;
        self.heading = normalize_heading(heading_degrees);
        log::debug!(
            "odometry: pose re-anchored to ({:.3}, {:.3}, {:.1})",
            x,
            y,
            self.heading
        );
    }
}
