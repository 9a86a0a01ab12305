// feastly/src/flow/step.rs

use super::Shared;
use std::sync::Arc;

/// Evaluated right before a step runs; returning `true` skips the step.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

/// A named step. Optional steps without handlers are skipped instead of failing.
#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> StepDef<TData> {
  pub(crate) fn should_skip(&self, data: &Shared<TData>) -> bool {
    match &self.skip_if {
      Some(cond) => cond(&data.read()),
      None => false,
    }
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
