// feastly/src/checkout/mod.rs

pub mod form;
pub mod orchestrator;

pub use form::{CheckoutForm, Field, FieldErrors, MIN_ADDRESS_CHARS, MIN_PHONE_CHARS};
pub use orchestrator::{
  CheckoutCtxData, CheckoutDeps, CheckoutOrchestrator, CheckoutOutcome, CHECKOUT_STEPS, EMPTY_CART_MESSAGE,
  ORDER_PLACED_MESSAGE,
};
