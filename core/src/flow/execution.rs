// feastly/src/flow/execution.rs

//! [`Workflow::run`].

use super::control::{FlowOutcome, StepControl};
use super::definition::{Phase, Workflow};
use super::error::FlowError;
use super::shared::Shared;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `data`.
  ///
  /// Skipped steps (their `skip_if` returned `true`) and optional steps without
  /// handlers are passed over. A required step without handlers fails the run
  /// with [`FlowError::HandlerMissing`].
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(workflow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, data: Shared<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Workflow starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = tracing::info_span!("workflow_step", step = step_name, step_index = step_idx);

      if step_def.should_skip(&data) {
        event!(parent: &step_span, Level::INFO, "Step skipped by its skip condition.");
        continue;
      }

      let has_handlers = Phase::ORDER
        .iter()
        .any(|phase| !self.handlers_for(*phase, step_name).is_empty());
      if !has_handlers {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          workflow: self.name.clone(),
          step_name: step_def.name.clone(),
        }));
      }

      for phase in Phase::ORDER {
        for handler in self.handlers_for(phase, step_name) {
          match handler(data.clone()).instrument(step_span.clone()).await {
            Ok(StepControl::Continue) => {}
            Ok(StepControl::Halt) => {
              event!(parent: &step_span, Level::INFO, phase = phase.label(), "Workflow halted by handler.");
              return Ok(FlowOutcome::Halted);
            }
            Err(e) => {
              event!(parent: &step_span, Level::ERROR, phase = phase.label(), error = %e, "Step handler failed.");
              return Err(e);
            }
          }
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Workflow completed.");
    Ok(FlowOutcome::Completed)
  }
}
