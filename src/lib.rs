//! GatiDrive - Differential-drive motion controller
//!
//! Estimates a robot's planar pose from wheel and inertial sensors and
//! converts a motion target — a heading to turn to, or a multi-point
//! path to follow — into left/right wheel velocity commands.
//!
//! ## Architecture
//!
//! Sensors feed the pose estimator; the motion supervisor reads the
//! estimated pose, recomputes the target-following geometry, and emits
//! per-wheel velocity commands through closed-loop controllers. The
//! whole core is a polling loop: the host calls
//! [`Drivetrain::update_odometry`](drivetrain::Drivetrain::update_odometry)
//! once per period, then one motion operation, every period.
//!
//! - [`odometry`]: dead-reckoning pose estimation from two wheel
//!   displacements and an absolute heading.
//! - [`pid`]: generic error-driven controller with output clamping.
//! - [`path`]: waypoint and path model.
//! - [`drivetrain`]: pure-pursuit path following and slew-limited
//!   turn-in-place.
//! - [`sensors`]: capability traits for the sensor/actuator
//!   collaborators the core borrows.
//! - [`shared`]: atomic telemetry snapshots for cross-thread observers.
//! - [`mock`]: scripted devices for hardware-free testing.

pub mod config;
pub mod drivetrain;
pub mod error;
pub mod math;
pub mod mock;
pub mod odometry;
pub mod path;
pub mod pid;
pub mod pose;
pub mod sensors;
pub mod shared;

// Re-export commonly used types
pub use config::DriveConfig;
pub use drivetrain::{Drivetrain, DriveState};
pub use error::{Error, Result};
pub use odometry::Odometry;
pub use path::{Path, Waypoint};
pub use pid::PidController;
pub use pose::Pose;
pub use shared::SharedTelemetry;
