//! # Controller contract and pipeline
//!
//! Every stage of the motion control chain implements [`Controller`]. A
//! [`Pipeline`] runs its stages in order over the same blackboard once per
//! control period.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use crate::blackboard::Blackboard;
use crate::path::Path;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-period inputs shared by all controllers of a pipeline.
///
/// The path is owned by the planning layer and only borrowed here for the
/// duration of one control period.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInputs<'a> {
    /// The path to follow, if any.
    pub path: Option<&'a Path>,
}

/// An ordered sequence of controllers sharing one blackboard.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Controller>>,
}

/// A controller which does nothing, used as a placeholder stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpController;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A single stage of the motion control chain.
pub trait Controller {
    /// Name of the controller, used for logging.
    fn name(&self) -> &'static str;

    /// Run the controller for one control period.
    fn execute(&mut self, inputs: &TickInputs, io: &mut Blackboard);

    /// Return the controller to its initial state.
    fn reset(&mut self) {}
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'a> TickInputs<'a> {
    /// Inputs borrowing the given path.
    pub fn with_path(path: &'a Path) -> Self {
        Self { path: Some(path) }
    }

    /// Inputs with no path.
    pub fn no_path() -> TickInputs<'static> {
        TickInputs { path: None }
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the pipeline.
    pub fn add<C: Controller + 'static>(&mut self, stage: C) {
        self.stages.push(Box::new(stage));
    }

    /// Run every stage in order over the blackboard.
    pub fn execute(&mut self, inputs: &TickInputs, io: &mut Blackboard) {
        for stage in self.stages.iter_mut() {
            debug!("Executing stage {}", stage.name());
            stage.execute(inputs, io);
        }
    }

    /// Reset every stage.
    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }

    /// Number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Controller for NoOpController {
    fn name(&self) -> &'static str {
        "no_op"
    }

    fn execute(&mut self, _inputs: &TickInputs, _io: &mut Blackboard) {}
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
