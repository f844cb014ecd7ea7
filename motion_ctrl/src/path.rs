//! # Waypoint path container
//!
//! A path is a bounded polyline of waypoints with per-waypoint metadata and a
//! built-in traversal cursor. Planner style consumers drive the cursor with
//! `start`/`advance`/`stop`; the pure pursuit controller instead keeps its own
//! progress state and only reads the waypoints.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use comms_if::tc::motion::{
    TcWaypoint, MOTION_DIRECTION_BACKWARD_ONLY, MOTION_DIRECTION_BIDIRECTIONAL,
    MOTION_DIRECTION_FORWARD_ONLY,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of waypoints a path can hold.
pub const MAX_WAYPOINTS: usize = 32;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Allowed direction of travel towards a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionDirection {
    /// The robot may drive forwards or backwards, whichever is shorter.
    Bidirectional,

    /// The robot must drive forwards.
    ForwardOnly,

    /// The robot must drive backwards.
    BackwardOnly,
}

impl Default for MotionDirection {
    fn default() -> Self {
        MotionDirection::Bidirectional
    }
}

impl MotionDirection {
    /// Decode a wire motion direction code, `None` for unknown codes.
    pub fn from_wire(code: i32) -> Option<Self> {
        match code {
            MOTION_DIRECTION_BIDIRECTIONAL => Some(MotionDirection::Bidirectional),
            MOTION_DIRECTION_FORWARD_ONLY => Some(MotionDirection::ForwardOnly),
            MOTION_DIRECTION_BACKWARD_ONLY => Some(MotionDirection::BackwardOnly),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A position and heading on the table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// x-coordinate in millimetres.
    pub x_mm: f64,

    /// y-coordinate in millimetres.
    pub y_mm: f64,

    /// Heading in degrees.
    pub heading_deg: f64,
}

/// A waypoint of a path: a pose plus traversal metadata.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    /// The pose of the waypoint.
    pub pose: Pose,

    /// Allowed direction of travel towards this waypoint.
    #[serde(default)]
    pub motion_direction: MotionDirection,

    /// If true the robot does not turn to the waypoint heading on arrival.
    #[serde(default)]
    pub bypass_final_orientation: bool,

    /// If true the waypoint is an intermediate stop on a longer route.
    #[serde(default)]
    pub is_intermediate: bool,
}

/// A bounded polyline of waypoints with a traversal cursor.
#[derive(Debug, Clone, Default)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    cursor: Option<usize>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a pose.
    pub fn new(x_mm: f64, y_mm: f64, heading_deg: f64) -> Self {
        Self {
            x_mm,
            y_mm,
            heading_deg,
        }
    }

    /// Position of the pose as a 2D vector.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x_mm, self.y_mm)
    }
}

impl Waypoint {
    /// Create a waypoint at the given pose with default metadata.
    pub fn at(x_mm: f64, y_mm: f64, heading_deg: f64) -> Self {
        Self {
            pose: Pose::new(x_mm, y_mm, heading_deg),
            ..Default::default()
        }
    }

    /// Position of the waypoint as a 2D vector.
    pub fn position(&self) -> Vector2<f64> {
        self.pose.position()
    }
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self {
            waypoints: Vec::with_capacity(MAX_WAYPOINTS),
            cursor: None,
        }
    }

    /// Append a waypoint.
    ///
    /// Returns false (and leaves the path unchanged) when the path is full.
    pub fn add_point(&mut self, waypoint: Waypoint) -> bool {
        if self.waypoints.len() >= MAX_WAYPOINTS {
            warn!("Path is full ({} waypoints), dropping waypoint", MAX_WAYPOINTS);
            return false;
        }

        self.waypoints.push(waypoint);
        true
    }

    /// Append a waypoint received as a telecommand payload.
    ///
    /// Returns false when the path is full or the motion direction code is
    /// unknown.
    pub fn add_point_from_tc(&mut self, tc: &TcWaypoint) -> bool {
        let motion_direction = match MotionDirection::from_wire(tc.motion_direction) {
            Some(d) => d,
            None => {
                warn!(
                    "Unknown motion direction code {}, dropping waypoint",
                    tc.motion_direction
                );
                return false;
            }
        };

        self.add_point(Waypoint {
            pose: Pose::new(tc.x_mm, tc.y_mm, tc.heading_deg),
            motion_direction,
            bypass_final_orientation: tc.bypass_final_orientation,
            is_intermediate: tc.is_intermediate,
        })
    }

    /// Begin traversal at the first waypoint.
    pub fn start(&mut self) {
        if self.waypoints.is_empty() {
            warn!("Cannot start an empty path");
            return;
        }

        self.cursor = Some(0);
    }

    /// End traversal, clearing the cursor.
    pub fn stop(&mut self) {
        self.cursor = None;
    }

    /// True while the path is being traversed.
    pub fn is_started(&self) -> bool {
        self.cursor.is_some()
    }

    /// Move the cursor to the next waypoint, saturating at the last.
    pub fn advance(&mut self) {
        if let Some(i) = self.cursor {
            self.cursor = Some((i + 1).min(self.waypoints.len() - 1));
        }
    }

    /// The waypoint under the cursor, `None` when not started.
    pub fn current_pose(&self) -> Option<&Waypoint> {
        self.cursor.and_then(|i| self.waypoints.get(i))
    }

    /// True when the path is started and the cursor is on the last waypoint.
    pub fn is_complete(&self) -> bool {
        match self.cursor {
            Some(i) => i + 1 == self.waypoints.len(),
            None => false,
        }
    }

    /// True when `index` is the last waypoint of a non-empty path.
    pub fn is_last_waypoint(&self, index: usize) -> bool {
        !self.waypoints.is_empty() && index + 1 == self.waypoints.len()
    }

    /// The waypoint at `index`, if any.
    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// The first waypoint, if any.
    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// The last waypoint, if any.
    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// All waypoints in order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// True when the path has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Clear all waypoints and the cursor.
    pub fn reset(&mut self) {
        self.waypoints.clear();
        self.cursor = None;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
