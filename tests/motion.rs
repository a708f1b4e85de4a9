//! Full control-loop scenarios
//!
//! Drives the supervisor against scripted and simulated sensors to
//! validate the polling-loop contract end to end:
//! - odometry scenarios from known encoder/heading sequences
//! - pure pursuit traversal of a multi-point path
//! - turn-in-place convergence under slew-limited acceleration
//!
//! Run with: `cargo test --test motion`

use approx::assert_relative_eq;
use gati_drive::mock::{MockEncoder, MockImu, MockMotorGroup};
use gati_drive::sensors::HeadingSensor;
use gati_drive::{DriveConfig, Drivetrain, Odometry, Waypoint};

// ============================================================================
// Test Harness
// ============================================================================

struct Robot {
    drivetrain: Drivetrain,
    left_encoder: MockEncoder,
    right_encoder: MockEncoder,
    imu: MockImu,
    left_motors: MockMotorGroup,
    right_motors: MockMotorGroup,
}

fn test_drive_config() -> DriveConfig {
    let mut config = DriveConfig::default();
    config.robot.wheel_base = 12.0;
    config.motion.lookahead_distance = 5.0;
    config.motion.max_velocity = 100.0;
    config.motion.max_acceleration = 10.0;
    config.pid.kp = 1.0;
    config.pid.ki = 0.0;
    config.pid.kd = 0.0;
    config.pid.min_output = -100.0;
    config.pid.max_output = 100.0;
    config
}

fn make_robot(config: &DriveConfig) -> Robot {
    let left_encoder = MockEncoder::new();
    let right_encoder = MockEncoder::new();
    let imu = MockImu::new();
    let left_motors = MockMotorGroup::new();
    let right_motors = MockMotorGroup::new();

    let odometry = Odometry::new(
        Box::new(left_encoder.clone()),
        Box::new(right_encoder.clone()),
        Box::new(imu.clone()),
    );
    let drivetrain = Drivetrain::new(
        config,
        odometry,
        Box::new(left_motors.clone()),
        Box::new(right_motors.clone()),
    )
    .expect("test config must validate");

    Robot {
        drivetrain,
        left_encoder,
        right_encoder,
        imu,
        left_motors,
        right_motors,
    }
}

impl Robot {
    /// Apply the last wheel commands to a simple differential-drive
    /// plant: wheels advance with their commands, heading changes with
    /// the command differential (same sign convention as the wheel
    /// mixing: a left-biased differential turns toward +y).
    fn step_plant(&self, distance_per_unit: f64, degrees_per_unit: f64) {
        let left = self.left_motors.commanded();
        let right = self.right_motors.commanded();

        self.left_encoder.advance(left * distance_per_unit);
        self.right_encoder.advance(right * distance_per_unit);
        self.imu
            .set_heading(self.imu.heading() + (left - right) * degrees_per_unit);
    }
}

// ============================================================================
// Scenario: Odometry from scripted readings
// ============================================================================

#[test]
fn test_odometry_scenario_straight_ten_units() {
    let mut robot = make_robot(&test_drive_config());

    // Fresh construction: everything zero.
    let pose = robot.drivetrain.pose();
    assert_eq!((pose.x, pose.y, pose.heading), (0.0, 0.0, 0.0));

    // Both wheels report 10, heading stays 0.
    robot.left_encoder.set_position(10.0);
    robot.right_encoder.set_position(10.0);
    robot.drivetrain.update_odometry();

    let pose = robot.drivetrain.pose();
    assert_relative_eq!(pose.x, 10.0, epsilon = 1e-9);
    assert_relative_eq!(pose.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(pose.heading, 0.0, epsilon = 1e-9);
}

#[test]
fn test_odometry_incremental_matches_wholesale() {
    // Integrating 100 small steps lands where one big step does, since
    // heading never changes.
    let mut stepped = make_robot(&test_drive_config());
    for i in 1..=100 {
        stepped.left_encoder.set_position(i as f64 * 0.1);
        stepped.right_encoder.set_position(i as f64 * 0.1);
        stepped.drivetrain.update_odometry();
    }

    let pose = stepped.drivetrain.pose();
    assert_relative_eq!(pose.x, 10.0, epsilon = 1e-6);
    assert_relative_eq!(pose.y, 0.0, epsilon = 1e-6);
}

// ============================================================================
// Scenario: Pure pursuit along a straight path
// ============================================================================

#[test]
fn test_pursuit_straight_path_scenario() {
    let mut robot = make_robot(&test_drive_config());
    robot.drivetrain.set_path(vec![
        Waypoint::new(0.0, 0.0, 0.0),
        Waypoint::new(10.0, 0.0, 0.0),
    ]);

    robot.drivetrain.update_odometry();
    robot.drivetrain.follow_path();

    // Facing straight down the path: no curvature, equal commands.
    let left = robot.left_motors.commanded();
    let right = robot.right_motors.commanded();
    assert_relative_eq!(left, right, epsilon = 1e-9);
    assert!(left > 0.0);
}

#[test]
fn test_pursuit_traverses_path_with_monotonic_lookahead() {
    let mut robot = make_robot(&test_drive_config());
    let waypoints: Vec<Waypoint> = (0..=10)
        .map(|i| Waypoint::new(i as f64 * 2.0, 0.0, 0.0))
        .collect();
    let last = waypoints.len() - 1;
    robot.drivetrain.set_path(waypoints);

    let mut previous_index = 0;
    for cycle in 0..200 {
        robot.drivetrain.update_odometry();
        robot.drivetrain.follow_path();
        robot.step_plant(0.001, 0.0005);

        let index = robot.drivetrain.state().lookahead_index;
        assert!(
            index >= previous_index,
            "lookahead regressed from {} to {} at cycle {}",
            previous_index,
            index,
            cycle
        );
        previous_index = index;
    }

    // The robot walked the whole path: the lookahead reached the final
    // waypoint and the pose ended near it.
    assert_eq!(previous_index, last);
    let pose = robot.drivetrain.pose();
    assert!(
        pose.x > 18.0,
        "expected to approach x=20, got x={:.2}",
        pose.x
    );
    assert!(
        pose.y.abs() < 1.0,
        "expected to stay near the path, got y={:.2}",
        pose.y
    );
}

// ============================================================================
// Scenario: Turn-in-place convergence
// ============================================================================

#[test]
fn test_turn_in_place_first_cycle_is_slew_limited() {
    let mut robot = make_robot(&test_drive_config());

    robot.drivetrain.update_odometry();
    robot.drivetrain.turn_in_place(90.0, 10.0);

    // error = 90, distance to full speed = 80; the commanded magnitude
    // must step from rest, bounded by max_acceleration, not jump to the
    // controller's full output.
    let state = robot.drivetrain.state();
    assert!(state.right_velocity > 0.0);
    assert!(
        state.right_velocity.abs() <= 10.0 + 1e-9,
        "first-cycle velocity {} exceeds one acceleration step",
        state.right_velocity
    );
    assert!(state.right_velocity.abs() < 90.0);
}

#[test]
fn test_turn_in_place_converges_to_target_heading() {
    let mut robot = make_robot(&test_drive_config());

    for _ in 0..400 {
        robot.drivetrain.update_odometry();
        robot.drivetrain.turn_in_place(90.0, 10.0);
        // Rotation-only plant matching the turn sign convention: a
        // positive heading error speeds the right side, which rotates
        // the robot toward larger headings.
        let left = robot.left_motors.commanded();
        let right = robot.right_motors.commanded();
        robot
            .imu
            .set_heading(robot.imu.heading() + (right - left) * 0.025);
    }

    robot.drivetrain.update_odometry();
    let heading = robot.drivetrain.pose().heading;
    assert!(
        (heading - 90.0).abs() < 5.0,
        "expected convergence near 90 degrees, got {:.2}",
        heading
    );

    // Settled: the commanded velocities have ramped back down.
    let state = robot.drivetrain.state();
    assert!(
        state.left_velocity.abs() < 15.0 && state.right_velocity.abs() < 15.0,
        "velocities still large after settling: ({:.2}, {:.2})",
        state.left_velocity,
        state.right_velocity
    );
}

#[test]
fn test_turn_then_follow_path_phases_are_isolated() {
    let mut robot = make_robot(&test_drive_config());

    // Spin up a turn, then stop and switch phases.
    for _ in 0..5 {
        robot.drivetrain.update_odometry();
        robot.drivetrain.turn_in_place(90.0, 10.0);
    }
    robot.drivetrain.stop();
    assert_eq!(robot.left_motors.commanded(), 0.0);

    robot.imu.set_heading(0.0);
    robot.drivetrain.set_path(vec![
        Waypoint::new(0.0, 0.0, 0.0),
        Waypoint::new(10.0, 0.0, 0.0),
    ]);
    robot.drivetrain.update_odometry();
    robot.drivetrain.follow_path();

    // The straight-path command is symmetric; nothing from the turn
    // phase leaked into the follower's controllers.
    assert_relative_eq!(
        robot.left_motors.commanded(),
        robot.right_motors.commanded(),
        epsilon = 1e-9
    );
}
