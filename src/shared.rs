//! Lock-free telemetry snapshots for cross-thread observers.
//!
//! The control loop is single-owner: no other thread may touch the
//! estimator or the supervisor directly. Read-only consumers (status
//! reporting, dashboards) observe the loop through [`SharedTelemetry`],
//! which publishes consistent snapshots through atomics.

use crate::pose::Pose;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic wrapper for f64 values.
/// Uses AtomicU64 with bit reinterpretation.
#[derive(Debug, Default)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub fn new(val: f64) -> Self {
        Self(AtomicU64::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f64, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Atomic wrapper for [`Pose`].
///
/// Packs x and y into one atomic u64 (each as i32 in thousandths of a
/// unit) so position reads are internally consistent; heading rides in
/// its own atomic. Snapshot precision is 0.001 unit / degree, plenty for
/// telemetry.
#[derive(Debug, Default)]
pub struct AtomicPose {
    xy: AtomicU64,
    heading: AtomicF64,
}

impl AtomicPose {
    pub fn new(pose: Pose) -> Self {
        let this = Self::default();
        this.store(pose, Ordering::Relaxed);
        this
    }

    pub fn load(&self, order: Ordering) -> Pose {
        let xy = self.xy.load(order);
        let x_milli = (xy >> 32) as i32;
        let y_milli = xy as i32;

        Pose::new(
            x_milli as f64 / 1000.0,
            y_milli as f64 / 1000.0,
            self.heading.load(order),
        )
    }

    pub fn store(&self, pose: Pose, order: Ordering) {
        let x_milli = (pose.x * 1000.0) as i32;
        let y_milli = (pose.y * 1000.0) as i32;
        let xy = ((x_milli as u64) << 32) | (y_milli as u32 as u64);

        self.xy.store(xy, order);
        self.heading.store(pose.heading, order);
    }
}

/// Telemetry published by the motion supervisor once per control cycle.
#[derive(Debug, Default)]
pub struct SharedTelemetry {
    pose: AtomicPose,
    left_velocity: AtomicF64,
    right_velocity: AtomicF64,
}

impl SharedTelemetry {
    /// Create telemetry state starting at the origin, at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published pose snapshot.
    pub fn pose(&self) -> Pose {
        self.pose.load(Ordering::Acquire)
    }

    /// Publish a pose snapshot (called by the control loop).
    pub fn set_pose(&self, pose: Pose) {
        self.pose.store(pose, Ordering::Release);
    }

    /// Latest commanded wheel velocities (left, right).
    pub fn velocity(&self) -> (f64, f64) {
        (
            self.left_velocity.load(Ordering::Acquire),
            self.right_velocity.load(Ordering::Acquire),
        )
    }

    /// Publish commanded wheel velocities (called by the control loop).
    pub fn set_velocity(&self, left: f64, right: f64) {
        self.left_velocity.store(left, Ordering::Release);
        self.right_velocity.store(right, Ordering::Release);
    }
}
