//! # Motion control library
//!
//! The motion control core of the robot. Every control period a pipeline of
//! controllers reads the robot's pose and speeds from a shared blackboard,
//! computes linear and angular speed orders and writes them back along with
//! status flags for the outer software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Keyed IO store shared by the controllers of a pipeline
pub mod blackboard;

/// Controller contract, pipeline and wrapper controllers
pub mod controller;

/// Waypoint path container
pub mod path;

/// Trapezoidal velocity profile generator
pub mod profile;

/// Adaptive pure pursuit path tracking controller
pub mod pursuit;

/// Wrapper controllers - reset, throttling
pub mod wrappers;
