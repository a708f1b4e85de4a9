//! Motion supervisor for a differential drivetrain.
//!
//! Owns the pose estimator, a closed-loop controller per side, and the
//! two velocity sinks, and turns a target into left/right wheel
//! commands. Two capabilities:
//!
//! - **Pure pursuit path following**: steer toward the path point one
//!   lookahead radius ahead, converting the resulting curvature into a
//!   wheel-speed differential.
//! - **Turn-in-place**: rotate to a target heading with slew-limited
//!   acceleration so velocity ramps instead of stepping.
//!
//! Both run one cycle per call inside the host's polling loop. The host
//! must call [`Drivetrain::update_odometry`] exactly once per cycle,
//! before the cycle's motion call. Stopping a movement is cooperative:
//! stop calling it, or call [`Drivetrain::stop`] to also clear
//! controller state.

use std::sync::Arc;

use crate::config::DriveConfig;
use crate::error::Result;
use crate::math::{sq, wrap_degrees};
use crate::odometry::Odometry;
use crate::path::{Path, Waypoint};
use crate::pid::PidController;
use crate::pose::Pose;
use crate::sensors::VelocityActuator;
use crate::shared::SharedTelemetry;

/// Mutable follower state plus the physical constants it runs against.
///
/// The commanded velocities persist across cycles; they are the memory
/// that lets turn-in-place ramp smoothly instead of stepping.
#[derive(Debug, Clone)]
pub struct DriveState {
    /// Left-side commanded velocity, carried across cycles.
    pub left_velocity: f64,
    /// Right-side commanded velocity, carried across cycles.
    pub right_velocity: f64,
    /// Distance between the left and right wheel contact lines.
    pub wheel_base: f64,
    /// Maximum wheel velocity command magnitude.
    pub max_velocity: f64,
    /// Maximum commanded acceleration for slew limiting.
    pub max_acceleration: f64,
    /// Pursuit lookahead radius.
    pub lookahead_distance: f64,
    /// Index of the current lookahead waypoint; non-decreasing within a
    /// traversal, reset when a new path is set.
    pub lookahead_index: usize,
}

/// The motion supervisor.
pub struct Drivetrain {
    odometry: Odometry,
    left_pid: PidController,
    right_pid: PidController,
    left_motors: Box<dyn VelocityActuator>,
    right_motors: Box<dyn VelocityActuator>,
    path: Path,
    state: DriveState,
    telemetry: Arc<SharedTelemetry>,
}

impl Drivetrain {
    /// Build a supervisor from a validated configuration.
    ///
    /// Fails fast on non-physical configuration values; nothing else in
    /// this type can fail after construction.
    pub fn new(
        config: &DriveConfig,
        odometry: Odometry,
        left_motors: Box<dyn VelocityActuator>,
        right_motors: Box<dyn VelocityActuator>,
    ) -> Result<Self> {
        config.validate()?;

        log::info!(
            "drivetrain: wheel_base={:.2} lookahead={:.2} max_velocity={:.1} max_acceleration={:.1}",
            config.robot.wheel_base,
            config.motion.lookahead_distance,
            config.motion.max_velocity,
            config.motion.max_acceleration
        );

        Ok(Self {
            odometry,
            left_pid: PidController::from_config(&config.pid),
            right_pid: PidController::from_config(&config.pid),
            left_motors,
            right_motors,
            path: Path::new(),
            state: DriveState {
                left_velocity: 0.0,
                right_velocity: 0.0,
                wheel_base: config.robot.wheel_base,
                max_velocity: config.motion.max_velocity,
                max_acceleration: config.motion.max_acceleration,
                lookahead_distance: config.motion.lookahead_distance,
                lookahead_index: 0,
            },
            telemetry: Arc::new(SharedTelemetry::new()),
        })
    }

    /// Pull fresh sensor readings into the pose estimate.
    ///
    /// Call exactly once per control period, before the period's motion
    /// call reads the pose.
    pub fn update_odometry(&mut self) {
        self.odometry.update();
    }

    /// Current pose estimate.
    pub fn pose(&self) -> Pose {
        self.odometry.pose()
    }

    /// Re-anchor the pose estimate at a known position.
    pub fn set_pose(&mut self, x: f64, y: f64, heading_degrees: f64) {
        self.odometry.set_pose(x, y, heading_degrees);
    }

    /// Follower and slew state, for diagnostics.
    pub fn state(&self) -> &DriveState {
        &self.state
    }

    /// The active path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Handle for read-only telemetry consumers on other threads.
    pub fn telemetry(&self) -> Arc<SharedTelemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Replace the active path and start a fresh traversal.
    ///
    /// The previous path is dropped wholesale, the lookahead index
    /// rewinds to the start, and both controllers are cleared so state
    /// from the previous movement cannot leak into this one.
    pub fn set_path(&mut self, waypoints: Vec<Waypoint>) {
        log::info!("drivetrain: new path with {} waypoints", waypoints.len());
        self.path = Path::from(waypoints);
        self.state.lookahead_index = 0;
        self.left_pid.reset();
        self.right_pid.reset();
    }

    /// Run one pure-pursuit cycle against the active path.
    ///
    /// An empty path is a no-op apart from a pose snapshot: no motion
    /// command is emitted and the actuators hold whatever they were last
    /// commanded.
    pub fn follow_path(&mut self) {
        let pose = self.odometry.pose();
        self.telemetry.set_pose(pose);

        if self.path.is_empty() {
            log::warn!("follow_path: no active path, holding");
            return;
        }

        // Closest waypoint; first index wins ties so the scan is stable.
        let mut closest_index = 0;
        let mut closest_distance = f64::MAX;
        for (i, waypoint) in self.path.iter().enumerate() {
            let distance = pose.distance_to(waypoint.x, waypoint.y);
            if distance < closest_distance {
                closest_distance = distance;
                closest_index = i;
            }
        }

        // Advance the lookahead while the next waypoint is still inside
        // the lookahead radius. Starting from the furthest index reached
        // so far keeps the traversal from revisiting passed waypoints.
        let mut lookahead_index = closest_index.max(self.state.lookahead_index);
        let lookahead_sq = sq(self.state.lookahead_distance);
        while lookahead_index < self.path.len() - 1 {
            let next = &self.path[lookahead_index + 1];
            let dx = next.x - pose.x;
            let dy = next.y - pose.y;
            if dx * dx + dy * dy > lookahead_sq {
                break;
            }
            lookahead_index += 1;
        }
        self.state.lookahead_index = lookahead_index;

        let target = &self.path[lookahead_index];
        let desired_heading = (target.y - pose.y).atan2(target.x - pose.x);
        let curvature =
            2.0 * (desired_heading - pose.heading_radians()).sin() / self.state.lookahead_distance;

        // Curvature to wheel-speed differential, then a common-factor
        // saturation that keeps the differential ratio intact.
        let half_track = curvature * self.state.wheel_base / 2.0;
        let (left_desired, right_desired) = saturate(
            self.state.max_velocity * (2.0 + half_track),
            self.state.max_velocity * (2.0 - half_track),
            self.state.max_velocity,
        );

        log::debug!(
            "follow_path: closest={} lookahead={} curvature={:.4} desired=({:.2}, {:.2})",
            closest_index,
            lookahead_index,
            curvature,
            left_desired,
            right_desired
        );

        // Velocity regulation: feed-forward the desired velocity and let
        // the controller trim against the actuator's own readback.
        self.left_pid.set_target(left_desired);
        self.right_pid.set_target(right_desired);
        let left_command = left_desired + self.left_pid.compute(self.left_motors.velocity());
        let right_command = right_desired + self.right_pid.compute(self.right_motors.velocity());

        self.left_motors.set_velocity(left_command);
        self.right_motors.set_velocity(right_command);
        self.telemetry.set_velocity(left_command, right_command);
    }

    /// Run one turn-in-place cycle toward `target_heading` degrees.
    ///
    /// `full_speed_angle` is the remaining rotation, in degrees, below
    /// which the commanded speed is no longer acceleration-limited
    /// toward full speed. The per-side commanded velocities persist in
    /// [`DriveState`] across cycles, which is what makes the ramp
    /// continuous.
    pub fn turn_in_place(&mut self, target_heading: f64, full_speed_angle: f64) {
        let current_heading = self.odometry.heading();
        self.telemetry.set_pose(self.odometry.pose());

        let target = wrap_degrees(target_heading);
        let mut error = target - current_heading;
        if error > 180.0 {
            error -= 360.0;
        } else if error < -180.0 {
            error += 360.0;
        }

        // Opposite-sign errors into the two controllers spin the sides
        // against each other; setpoints pinned at zero so each output
        // opposes its error.
        self.left_pid.set_target(0.0);
        self.right_pid.set_target(0.0);
        let desired_left = self.left_pid.compute(error);
        let desired_right = self.right_pid.compute(-error);

        let angle_remaining = error.abs();
        let distance_to_full_speed = (angle_remaining - full_speed_angle).max(0.0);

        self.state.left_velocity = adjust_velocity(
            self.state.left_velocity,
            desired_left,
            distance_to_full_speed,
            self.state.max_acceleration,
        );
        self.state.right_velocity = adjust_velocity(
            self.state.right_velocity,
            desired_right,
            distance_to_full_speed,
            self.state.max_acceleration,
        );

        log::debug!(
            "turn_in_place: error={:.2} to_full_speed={:.2} v=({:.2}, {:.2})",
            error,
            distance_to_full_speed,
            self.state.left_velocity,
            self.state.right_velocity
        );

        self.left_motors.set_velocity(self.state.left_velocity);
        self.right_motors.set_velocity(self.state.right_velocity);
        self.telemetry
            .set_velocity(self.state.left_velocity, self.state.right_velocity);
    }

    /// Command both sides to rest and clear all per-movement state.
    ///
    /// Call between movements so the next phase starts from a clean
    /// controller and zero velocity memory.
    pub fn stop(&mut self) {
        self.state.left_velocity = 0.0;
        self.state.right_velocity = 0.0;
        self.left_pid.reset();
        self.right_pid.reset();
        self.left_motors.set_velocity(0.0);
        self.right_motors.set_velocity(0.0);
        self.telemetry.set_velocity(0.0, 0.0);
    }
}

/// Move `current` toward `desired` with the step bounded by the
/// acceleration needed over the remaining distance.
///
/// Uses `a = (desired² - current²) / (2 * distance_remaining)`, clamps
/// its magnitude to `max_acceleration`, and never overshoots `desired`.
/// Zero (or negative) remaining distance short-circuits to a
/// max-acceleration step rather than dividing by zero.
pub fn adjust_velocity(
    current: f64,
    desired: f64,
    distance_remaining: f64,
    max_acceleration: f64,
) -> f64 {
    let step = if distance_remaining > 0.0 {
        let required = (sq(desired) - sq(current)) / (2.0 * distance_remaining);
        required.abs().min(max_acceleration)
    } else {
        max_acceleration
    };

    if desired > current {
        (current + step).min(desired)
    } else {
        (current - step).max(desired)
    }
}

/// Scale a velocity pair by a common factor so neither magnitude
/// exceeds `limit`, preserving their ratio.
fn saturate(left: f64, right: f64, limit: f64) -> (f64, f64) {
    let peak = left.abs().max(right.abs());
    if peak <= limit || peak == 0.0 {
        return (left, right);
    }
    let scale = limit / peak;
    (left * scale, right * scale)
}
