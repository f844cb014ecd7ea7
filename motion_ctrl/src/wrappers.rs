//! # Wrapper controllers
//!
//! Controllers which modify how other controllers run or prepare the
//! blackboard for them: [`ResetController`] forces a set of keys to fixed
//! values, [`ThrottledController`] runs a wrapped controller every N control
//! periods.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;

// Internal
use crate::blackboard::{Blackboard, Key};
use crate::controller::{Controller, TickInputs};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum number of key/value pairs a [`ResetController`] can hold.
pub const MAX_RESET_KEYS: usize = 8;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Forces a fixed set of float keys to fixed values each period.
///
/// Typically placed at the head of a pipeline to give downstream stages a
/// known baseline.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResetController {
    values: [Option<(Key, f64)>; MAX_RESET_KEYS],
}

/// Runs a wrapped controller once every `period_divider` control periods.
///
/// The wrapped controller runs on the very first period after construction
/// or [`ThrottledController::reset_counter`].
pub struct ThrottledController {
    wrapped: Box<dyn Controller>,
    period_divider: u32,
    current_count: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ResetController {
    /// Create a controller with no keys registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key to force to the given value.
    ///
    /// Returns false when the controller is already full.
    pub fn add(&mut self, key: Key, value: f64) -> bool {
        for slot in self.values.iter_mut() {
            if slot.is_none() {
                *slot = Some((key, value));
                return true;
            }
        }

        warn!(
            "ResetController is full ({} keys), cannot add {:?}",
            MAX_RESET_KEYS, key
        );
        false
    }
}

impl Controller for ResetController {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn execute(&mut self, _inputs: &TickInputs, io: &mut Blackboard) {
        for slot in self.values.iter() {
            if let Some((key, value)) = slot {
                io.set_float(*key, *value);
            }
        }
    }
}

impl ThrottledController {
    /// Wrap a controller, running it every `period_divider` periods.
    ///
    /// A divider of zero is coerced to one.
    pub fn new(wrapped: Box<dyn Controller>, period_divider: u32) -> Self {
        let period_divider = if period_divider == 0 {
            warn!("ThrottledController period divider of 0 coerced to 1");
            1
        } else {
            period_divider
        };

        Self {
            wrapped,
            period_divider,
            // Saturated so the wrapped controller runs on the first period
            current_count: period_divider,
        }
    }

    /// Saturate the counter so the wrapped controller runs next period.
    pub fn reset_counter(&mut self) {
        self.current_count = self.period_divider;
    }
}

impl Controller for ThrottledController {
    fn name(&self) -> &'static str {
        "throttled"
    }

    fn execute(&mut self, inputs: &TickInputs, io: &mut Blackboard) {
        self.current_count += 1;

        if self.current_count >= self.period_divider {
            self.wrapped.execute(inputs, io);
            self.current_count = 0;
        }
    }

    fn reset(&mut self) {
        self.wrapped.reset();
        self.reset_counter();
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
