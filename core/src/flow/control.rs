// feastly/src/flow/control.rs

//! Signals returned by step handlers and the outcome of a whole run.

/// Returned by a handler to either keep going or end the run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Stop immediately. No further handlers run, in this step or later ones.
  Halt,
}

/// How a workflow run ended when no handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step that was not skipped ran to completion.
  Completed,
  /// A handler returned [`StepControl::Halt`].
  Halted,
}

impl FlowOutcome {
  pub fn is_completed(self) -> bool {
    matches!(self, FlowOutcome::Completed)
  }
}
