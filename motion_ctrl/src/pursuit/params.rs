//! # Adaptive pure pursuit parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters controlling the adaptive pure pursuit controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Lookahead distance at standstill.
    ///
    /// Units: millimetres
    pub min_lookahead: f64,

    /// Upper bound on the lookahead distance.
    ///
    /// Units: millimetres
    pub max_lookahead: f64,

    /// Lookahead growth per unit of linear speed.
    ///
    /// Units: millimetres per (millimetre/period)
    pub lookahead_speed_ratio: f64,

    /// Maximum commanded linear speed.
    ///
    /// Units: millimetres/period
    pub max_linear_speed: f64,

    /// Maximum commanded angular speed.
    ///
    /// Units: degrees/period
    pub max_angular_speed: f64,

    /// Distance to the goal below which the position is considered reached.
    ///
    /// Units: millimetres
    pub linear_threshold: f64,

    /// Heading error below which the final orientation is considered
    /// reached.
    ///
    /// Units: degrees
    pub angular_threshold: f64,

    /// Heading error below which the initial rotation towards the path is
    /// considered done.
    ///
    /// Units: degrees
    pub initial_rotation_threshold: f64,

    /// Limit on the linear speed increase per period.
    ///
    /// Units: millimetres/period^2
    pub linear_acceleration: f64,

    /// Deceleration used to slow down on approach to the goal.
    ///
    /// Units: millimetres/period^2
    pub linear_deceleration: f64,

    /// Deceleration used to slow rotations on approach to the target
    /// heading.
    ///
    /// Units: degrees/period^2
    pub angular_deceleration: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when validating a [`Params`] instance.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Lookahead bounds are invalid: min = {0}, max = {1}")]
    InvalidLookahead(f64, f64),

    #[error("Speed limits must be positive: linear = {0}, angular = {1}")]
    InvalidSpeedLimits(f64, f64),

    #[error("Thresholds must be positive: linear = {0}, angular = {1}, initial rotation = {2}")]
    InvalidThresholds(f64, f64, f64),

    #[error("Accelerations must be positive: accel = {0}, decel = {1}, angular decel = {2}")]
    InvalidAccelerations(f64, f64, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            min_lookahead: 100.0,
            max_lookahead: 300.0,
            lookahead_speed_ratio: 10.0,
            max_linear_speed: 10.0,
            max_angular_speed: 5.0,
            linear_threshold: 10.0,
            angular_threshold: 2.0,
            initial_rotation_threshold: 45.0,
            linear_acceleration: 0.1,
            linear_deceleration: 0.1,
            angular_deceleration: 0.1,
        }
    }
}

impl Params {
    /// Check the parameters are mutually consistent.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_lookahead <= 0.0 || self.max_lookahead < self.min_lookahead {
            return Err(ParamsError::InvalidLookahead(
                self.min_lookahead,
                self.max_lookahead,
            ));
        }

        if self.max_linear_speed <= 0.0 || self.max_angular_speed <= 0.0 {
            return Err(ParamsError::InvalidSpeedLimits(
                self.max_linear_speed,
                self.max_angular_speed,
            ));
        }

        if self.linear_threshold <= 0.0
            || self.angular_threshold <= 0.0
            || self.initial_rotation_threshold <= 0.0
        {
            return Err(ParamsError::InvalidThresholds(
                self.linear_threshold,
                self.angular_threshold,
                self.initial_rotation_threshold,
            ));
        }

        if self.linear_acceleration <= 0.0
            || self.linear_deceleration <= 0.0
            || self.angular_deceleration <= 0.0
        {
            return Err(ParamsError::InvalidAccelerations(
                self.linear_acceleration,
                self.linear_deceleration,
                self.angular_deceleration,
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
