// feastly/src/flow/mod.rs

//! A small asynchronous step workflow.
//!
//! A [`Workflow`] is an ordered list of named steps. Each step owns `before`,
//! `on` and `after` handlers that receive the shared workflow data and either
//! continue or halt the run. Checkout runs as one (see
//! [`crate::checkout::CheckoutOrchestrator`]).

pub mod control;
pub mod definition;
pub mod error;
pub mod execution;
pub mod shared;
pub mod step;

pub use control::{FlowOutcome, StepControl};
pub use definition::{Handler, Workflow};
pub use error::{FlowError, FlowResult};
pub use shared::Shared;
pub use step::{SkipCondition, StepDef};
