//! # Telecommands
//!
//! Payload definitions for commands sent to the motion control software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Motion telecommands
pub mod motion;
