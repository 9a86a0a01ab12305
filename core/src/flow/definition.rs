// feastly/src/flow/definition.rs

//! The [`Workflow`] type and its handler registration methods.

use super::control::StepControl;
use super::error::FlowError;
use super::shared::Shared;
use super::step::{SkipCondition, StepDef};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Boxed async step handler.
///
/// Handlers receive a clone of the workflow's [`Shared`] data. They must drop
/// any lock guard before awaiting.
pub type Handler<TData, Err> =
  Box<dyn Fn(Shared<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub(crate) const ORDER: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  pub(crate) fn label(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

/// An ordered set of named steps over data `TData`, whose handlers fail with `Err`.
///
/// `Err` must be constructible from [`FlowError`] so that structural problems
/// found while running (a required step without handlers) surface through the
/// caller's own error type.
pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<(Phase, String), Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a workflow from `(name, optional, skip_if)` step definitions.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional, skip_if)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn before<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(Shared<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_handler(Phase::Before, step_name, handler_fn);
  }

  pub fn on<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(Shared<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_handler(Phase::On, step_name, handler_fn);
  }

  pub fn after<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(Shared<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_handler(Phase::After, step_name, handler_fn);
  }

  fn push_handler<F, UserErr>(
    &mut self,
    phase: Phase,
    step_name: &str,
    handler_fn: impl Fn(Shared<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler: Handler<TData, Err> = Box::new(move |data| {
      let fut = handler_fn(data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self
      .handlers
      .entry((phase, step_name.to_string()))
      .or_default()
      .push(handler);
  }

  /// Registering a handler for an undeclared step is a wiring mistake, not a runtime condition.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "workflow setup error: step '{}' is not declared in workflow '{}'",
        step_name, self.name
      );
    }
  }

  pub(crate) fn handlers_for(&self, phase: Phase, step_name: &str) -> &[Handler<TData, Err>] {
    self
      .handlers
      .get(&(phase, step_name.to_string()))
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }
}
