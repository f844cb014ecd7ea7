//! # Communications Interface
//!
//! This crate defines the payloads exchanged between the motion control
//! software and its external collaborators (planner, base station).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand payloads
pub mod tc;
