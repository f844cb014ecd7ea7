//! # Controller IO blackboard
//!
//! The blackboard is the keyed store through which the controllers of a
//! pipeline exchange data. Keys are a closed enum so that every signal of the
//! motion control chain is known at compile time and lookups are plain array
//! indexing. Values persist across control periods until overwritten.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::path::MotionDirection;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of keys in the registry.
pub const NUM_KEYS: usize = 15;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The signals exchanged over the blackboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Robot pose x-coordinate (mm), written by the localisation layer.
    CurrentPoseX,

    /// Robot pose y-coordinate (mm), written by the localisation layer.
    CurrentPoseY,

    /// Robot heading (deg), written by the localisation layer.
    CurrentPoseO,

    /// Measured linear speed (mm/period).
    LinearCurrentSpeed,

    /// Measured angular speed (deg/period).
    AngularCurrentSpeed,

    /// Allowed direction of travel for the current move.
    MotionDirection,

    /// If true the final heading of the move is not enforced.
    BypassFinalOrientation,

    /// Commanded linear speed (mm/period), signed.
    LinearSpeedOrder,

    /// Commanded angular speed (deg/period), signed.
    AngularSpeedOrder,

    /// Status of the move towards the target pose.
    PoseReached,

    /// Set when the whole path has been traversed.
    PathComplete,

    /// Set when the current goal is an intermediate stop.
    IsIntermediate,

    /// Heading error (deg) published for the angular pose loop.
    AngularPoseError,

    /// Set when the angular pose loop must regenerate its profile.
    RecomputeAngularProfile,

    /// Set while the robot is turning on the spot.
    RotatingInPlace,
}

impl Key {
    /// All keys, in slot order.
    pub const ALL: [Key; NUM_KEYS] = [
        Key::CurrentPoseX,
        Key::CurrentPoseY,
        Key::CurrentPoseO,
        Key::LinearCurrentSpeed,
        Key::AngularCurrentSpeed,
        Key::MotionDirection,
        Key::BypassFinalOrientation,
        Key::LinearSpeedOrder,
        Key::AngularSpeedOrder,
        Key::PoseReached,
        Key::PathComplete,
        Key::IsIntermediate,
        Key::AngularPoseError,
        Key::RecomputeAngularProfile,
        Key::RotatingInPlace,
    ];

    /// Slot index of this key.
    fn index(self) -> usize {
        self as usize
    }
}

/// A value stored against a [`Key`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Float(f64),
    Bool(bool),
    Status(PoseStatus),
    Direction(MotionDirection),
}

/// Status of the move towards the target pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseStatus {
    /// The robot is still on its way.
    Moving,

    /// The final pose of the move has been reached.
    Reached,

    /// An intermediate pose of the move has been reached.
    IntermediateReached,
}

impl Default for PoseStatus {
    fn default() -> Self {
        PoseStatus::Moving
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Keyed store shared by the controllers of a pipeline.
#[derive(Debug, Clone)]
pub struct Blackboard {
    slots: [Option<Value>; NUM_KEYS],
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Blackboard {
    /// Create a new blackboard with every slot unset.
    pub fn new() -> Self {
        Self {
            slots: [None; NUM_KEYS],
        }
    }

    /// Write a value, overwriting any previous value for the key.
    pub fn set(&mut self, key: Key, value: Value) {
        self.slots[key.index()] = Some(value);
    }

    /// Write a float value.
    pub fn set_float(&mut self, key: Key, value: f64) {
        self.set(key, Value::Float(value));
    }

    /// Write a boolean value.
    pub fn set_bool(&mut self, key: Key, value: bool) {
        self.set(key, Value::Bool(value));
    }

    /// Write a pose status value.
    pub fn set_status(&mut self, key: Key, value: PoseStatus) {
        self.set(key, Value::Status(value));
    }

    /// Write a motion direction value.
    pub fn set_direction(&mut self, key: Key, value: MotionDirection) {
        self.set(key, Value::Direction(value));
    }

    /// Read the raw value for a key, `None` if unset.
    pub fn get(&self, key: Key) -> Option<Value> {
        self.slots[key.index()]
    }

    /// Read a float, defaulting to `0.0` when unset or of another type.
    pub fn get_float(&self, key: Key) -> f64 {
        match self.get(key) {
            Some(Value::Float(v)) => v,
            _ => 0.0,
        }
    }

    /// Read a boolean, defaulting to `false` when unset or of another type.
    pub fn get_bool(&self, key: Key) -> bool {
        match self.get(key) {
            Some(Value::Bool(v)) => v,
            _ => false,
        }
    }

    /// Read a pose status, defaulting to `Moving` when unset or of another
    /// type.
    pub fn get_status(&self, key: Key) -> PoseStatus {
        match self.get(key) {
            Some(Value::Status(v)) => v,
            _ => PoseStatus::default(),
        }
    }

    /// Read a motion direction, defaulting to `Bidirectional` when unset or
    /// of another type.
    pub fn get_direction(&self, key: Key) -> MotionDirection {
        match self.get(key) {
            Some(Value::Direction(v)) => v,
            _ => MotionDirection::default(),
        }
    }

    /// Reset every slot to unset.
    pub fn clear(&mut self) {
        self.slots = [None; NUM_KEYS];
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
