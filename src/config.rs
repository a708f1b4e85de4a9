//! Configuration for the motion controller.
//!
//! All physical constants and controller gains are supplied once at
//! construction, either programmatically or from a TOML file. Validation
//! happens exactly once, before any control state is built.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level drive configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriveConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub pid: PidConfig,
}

/// Robot physical parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RobotConfig {
    /// Wheel radius, used by tracking-wheel adapters to convert angular
    /// sensor readings to linear displacement
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f64,

    /// Distance between the left and right wheel contact lines
    #[serde(default = "default_wheel_base")]
    pub wheel_base: f64,
}

/// Motion limits and pursuit geometry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Radius used to select the path point to steer toward
    #[serde(default = "default_lookahead_distance")]
    pub lookahead_distance: f64,

    /// Maximum wheel velocity command magnitude
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,

    /// Maximum commanded acceleration for slew limiting
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f64,
}

/// Per-wheel closed-loop controller gains and output bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PidConfig {
    #[serde(default = "default_kp")]
    pub kp: f64,
    #[serde(default)]
    pub ki: f64,
    #[serde(default)]
    pub kd: f64,
    #[serde(default = "default_min_output")]
    pub min_output: f64,
    #[serde(default = "default_max_output")]
    pub max_output: f64,
}

// Default value functions
fn default_wheel_radius() -> f64 {
    1.625
}
fn default_wheel_base() -> f64 {
    12.0
}
fn default_lookahead_distance() -> f64 {
    5.0
}
fn default_max_velocity() -> f64 {
    100.0
}
fn default_max_acceleration() -> f64 {
    10.0
}
fn default_kp() -> f64 {
    1.0
}
fn default_min_output() -> f64 {
    -100.0
}
fn default_max_output() -> f64 {
    100.0
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_radius: default_wheel_radius(),
            wheel_base: default_wheel_base(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            lookahead_distance: default_lookahead_distance(),
            max_velocity: default_max_velocity(),
            max_acceleration: default_max_acceleration(),
        }
    }
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: default_kp(),
            ki: 0.0,
            kd: 0.0,
            min_output: default_min_output(),
            max_output: default_max_output(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            motion: MotionConfig::default(),
            pid: PidConfig::default(),
        }
    }
}

impl DriveConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DriveConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every value for physical plausibility.
    ///
    /// Called once by the motion supervisor's constructor; a failure here
    /// is fatal, never deferred into the control loop.
    pub fn validate(&self) -> Result<()> {
        if !(self.robot.wheel_radius > 0.0) {
            return Err(Error::Config(format!(
                "wheel_radius must be positive, got {}",
                self.robot.wheel_radius
            )));
        }
        if !(self.robot.wheel_base > 0.0) {
            return Err(Error::Config(format!(
                "wheel_base must be positive, got {}",
                self.robot.wheel_base
            )));
        }
        if !(self.motion.lookahead_distance > 0.0) {
            return Err(Error::Config(format!(
                "lookahead_distance must be positive, got {}",
                self.motion.lookahead_distance
            )));
        }
        if !(self.motion.max_velocity > 0.0) {
            return Err(Error::Config(format!(
                "max_velocity must be positive, got {}",
                self.motion.max_velocity
            )));
        }
        if !(self.motion.max_acceleration > 0.0) {
            return Err(Error::Config(format!(
                "max_acceleration must be positive, got {}",
                self.motion.max_acceleration
            )));
        }
        if !(self.pid.max_output > self.pid.min_output) {
            return Err(Error::Config(format!(
                "max_output ({}) must exceed min_output ({})",
                self.pid.max_output, self.pid.min_output
            )));
        }
        Ok(())
    }
}
