//! # Adaptive pure pursuit path tracking
//!
//! Tracks a waypoint path by steering towards a lookahead point on the path
//! whose distance adapts to the robot's speed. Runs as a stage of a motion
//! control pipeline, reading the robot pose and speeds from the blackboard
//! and writing speed orders and status flags back.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod geometry;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::{Params, ParamsError};
pub use state::{AdaptivePurePursuit, PursuitState};
