//! # Motion Telecommands
//!
//! Waypoint payloads appended to the robot's path by the planner.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Wire code for a waypoint which may be approached driving either way.
pub const MOTION_DIRECTION_BIDIRECTIONAL: i32 = 0;

/// Wire code for a waypoint which must be approached driving forwards.
pub const MOTION_DIRECTION_FORWARD_ONLY: i32 = 1;

/// Wire code for a waypoint which must be approached driving backwards.
pub const MOTION_DIRECTION_BACKWARD_ONLY: i32 = 2;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A single waypoint as it appears on the wire.
///
/// Positions are in millimetres in the table frame, headings in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TcWaypoint {
    /// The x-coordinate of the waypoint.
    pub x_mm: f64,

    /// The y-coordinate of the waypoint.
    pub y_mm: f64,

    /// The heading the robot should have at the waypoint.
    pub heading_deg: f64,

    /// Allowed direction of travel towards the waypoint, one of the
    /// `MOTION_DIRECTION_*` codes.
    #[serde(default)]
    pub motion_direction: i32,

    /// If true the robot does not turn to `heading_deg` on arrival.
    #[serde(default)]
    pub bypass_final_orientation: bool,

    /// If true the waypoint is an intermediate stop on a longer route.
    #[serde(default)]
    pub is_intermediate: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur when parsing a motion telecommand.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl TcWaypoint {
    /// Parse a waypoint from a JSON payload string.
    pub fn from_json(payload: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(payload).map_err(TcParseError::InvalidJson)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
