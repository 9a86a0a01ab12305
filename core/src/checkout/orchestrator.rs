// feastly/src/checkout/orchestrator.rs

//! Checkout as a named-step workflow:
//!
//! 1. `validate_delivery_details`: field checks; halts (no network) when invalid.
//! 2. `build_checkout_payload`: regroups the current cart into sub-orders.
//! 3. `submit_checkout`: the only order-creating call.
//! 4. `persist_order_summary`: stores the confirmation data; failure is logged only.
//! 5. `clear_cart`: awaited before leaving; failure is logged only.
//! 6. `navigate_to_confirmation`.

use super::form::{CheckoutForm, FieldErrors};
use crate::api::StorefrontApi;
use crate::cache::{QueryCache, QueryKey};
use crate::cart::{CartMutations, CartStore};
use crate::error::{Result, StoreError};
use crate::flow::{FlowOutcome, Shared, StepControl, Workflow};
use crate::models::{CartSnapshot, CheckoutRequest, CheckoutResponse, OrderSummary};
use crate::navigation::{Navigator, Route};
use crate::notify::{Notifier, Toast};
use crate::storage::{set_json, KeyValueStore, LAST_ORDER_KEY};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const CHECKOUT_STEPS: [&str; 6] = [
  "validate_delivery_details",
  "build_checkout_payload",
  "submit_checkout",
  "persist_order_summary",
  "clear_cart",
  "navigate_to_confirmation",
];

pub const ORDER_PLACED_MESSAGE: &str = "Order placed";
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Collaborators every checkout step may need.
pub struct CheckoutDeps {
  pub api: Arc<dyn StorefrontApi>,
  pub cart: Arc<CartStore>,
  pub mutations: Arc<CartMutations>,
  pub cache: Arc<QueryCache>,
  pub storage: Arc<dyn KeyValueStore>,
  pub notifier: Arc<dyn Notifier>,
  pub navigator: Arc<dyn Navigator>,
}

/// Data threaded through one checkout run.
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub deps: Arc<CheckoutDeps>,
  pub form: CheckoutForm,
  pub snapshot: Option<Arc<CartSnapshot>>,
  pub request: Option<CheckoutRequest>,
  pub response: Option<CheckoutResponse>,
  pub summary: Option<OrderSummary>,
  pub summary_persisted: bool,
  pub cart_cleared: bool,
}

impl CheckoutCtxData {
  fn new(deps: Arc<CheckoutDeps>, form: CheckoutForm) -> Self {
    Self {
      deps,
      form,
      snapshot: None,
      request: None,
      response: None,
      summary: None,
      summary_persisted: false,
      cart_cleared: false,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
  Placed(OrderSummary),
  /// The form did not validate; nothing was sent.
  Invalid(FieldErrors),
  /// Another submission from this orchestrator has not finished yet.
  AlreadySubmitting,
}

pub struct CheckoutOrchestrator {
  deps: Arc<CheckoutDeps>,
  workflow: Workflow<CheckoutCtxData, StoreError>,
  submitting: AtomicBool,
}

impl CheckoutOrchestrator {
  pub fn new(deps: CheckoutDeps) -> Self {
    Self {
      deps: Arc::new(deps),
      workflow: build_checkout_workflow(),
      submitting: AtomicBool::new(false),
    }
  }

  pub fn is_submitting(&self) -> bool {
    self.submitting.load(Ordering::Acquire)
  }

  /// Submits `form` against the current cart.
  ///
  /// On success the form is reset. On an invalid form its field errors are set.
  /// On failure a toast is shown and the form keeps every value for a retry.
  #[instrument(name = "CheckoutOrchestrator::submit", skip_all, err)]
  pub async fn submit(&self, form: &mut CheckoutForm) -> Result<CheckoutOutcome> {
    if self
      .submitting
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      warn!("Checkout already in progress; ignoring submit.");
      return Ok(CheckoutOutcome::AlreadySubmitting);
    }
    let _submitting = SubmittingFlag(&self.submitting);

    let data = Shared::new(CheckoutCtxData::new(Arc::clone(&self.deps), form.clone()));
    match self.workflow.run(data.clone()).await {
      Ok(FlowOutcome::Completed) => {
        let summary = data
          .read()
          .summary
          .clone()
          .ok_or_else(|| StoreError::Internal("Checkout completed without an order summary".to_string()))?;
        form.reset();
        Ok(CheckoutOutcome::Placed(summary))
      }
      Ok(FlowOutcome::Halted) => {
        let errors = data.read().form.errors().clone();
        *form = data.read().form.clone();
        Ok(CheckoutOutcome::Invalid(errors))
      }
      Err(e) => {
        self.deps.notifier.notify(Toast::error(e.user_message()));
        Err(e)
      }
    }
  }
}

struct SubmittingFlag<'a>(&'a AtomicBool);

impl Drop for SubmittingFlag<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

fn build_checkout_workflow() -> Workflow<CheckoutCtxData, StoreError> {
  let mut w = Workflow::<CheckoutCtxData, StoreError>::new(
    "checkout",
    &[
      (CHECKOUT_STEPS[0], false, None),
      (CHECKOUT_STEPS[1], false, None),
      (CHECKOUT_STEPS[2], false, None),
      (CHECKOUT_STEPS[3], true, None),
      (CHECKOUT_STEPS[4], false, None),
      (CHECKOUT_STEPS[5], false, None),
    ],
  );

  w.on(CHECKOUT_STEPS[0], validate_delivery_details);
  w.on(CHECKOUT_STEPS[1], build_checkout_payload);
  w.on(CHECKOUT_STEPS[2], submit_checkout);
  w.on(CHECKOUT_STEPS[3], persist_order_summary);
  w.on(CHECKOUT_STEPS[4], clear_cart);
  w.on(CHECKOUT_STEPS[5], navigate_to_confirmation);
  w
}

async fn validate_delivery_details(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let mut guard = data.write();
  if guard.form.validate() {
    return Ok(StepControl::Continue);
  }
  info!(fields = ?guard.form.errors().keys().map(|f| f.label()).collect::<Vec<_>>(), "Checkout form invalid.");
  Ok(StepControl::Halt)
}

async fn build_checkout_payload(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let cart = { Arc::clone(&data.read().deps.cart) };

  let snapshot = match cart.refresh_if_stale().await? {
    Some(snapshot) => snapshot,
    None => return Err(StoreError::Unauthenticated),
  };
  if snapshot.is_empty() {
    return Err(StoreError::Validation(EMPTY_CART_MESSAGE.to_string()));
  }

  let mut guard = data.write();
  let request = guard.form.to_request(&snapshot);
  info!(
    restaurants = request.restaurants.len(),
    item_count = snapshot.item_count(),
    grand_total = snapshot.grand_total(),
    "Checkout payload built."
  );
  guard.request = Some(request);
  guard.snapshot = Some(snapshot);
  Ok(StepControl::Continue)
}

async fn submit_checkout(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let (api, cache, request) = {
    let guard = data.read();
    let request = guard
      .request
      .clone()
      .ok_or_else(|| StoreError::Internal("Checkout payload missing at submission".to_string()))?;
    (Arc::clone(&guard.deps.api), Arc::clone(&guard.deps.cache), request)
  };

  let response = api.checkout(&request).await?;
  cache.invalidate(&QueryKey::Orders);
  info!(orders = response.orders.len(), "Checkout accepted.");

  let mut guard = data.write();
  let snapshot = guard.snapshot.clone().unwrap_or_default();
  guard.summary = Some(OrderSummary {
    order_ids: response.orders.iter().map(|o| o.id).collect(),
    restaurant_count: request.restaurants.len(),
    item_count: snapshot.item_count(),
    grand_total: snapshot.grand_total(),
    delivery_address: request.delivery_address.clone(),
    payment_method: request.payment_method,
    placed_at: chrono::Utc::now(),
  });
  guard.response = Some(response);
  Ok(StepControl::Continue)
}

async fn persist_order_summary(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let mut guard = data.write();
  let Some(summary) = guard.summary.clone() else {
    return Ok(StepControl::Continue);
  };
  match set_json(guard.deps.storage.as_ref(), LAST_ORDER_KEY, &summary) {
    Ok(()) => guard.summary_persisted = true,
    Err(e) => warn!(error = %e, "Could not persist order summary; confirmation screen will be empty."),
  }
  Ok(StepControl::Continue)
}

async fn clear_cart(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let mutations = { Arc::clone(&data.read().deps.mutations) };
  // The order exists at this point; a stale cart is not a reason to fail it.
  match mutations.clear_cart().await {
    Ok(()) => data.write().cart_cleared = true,
    Err(e) => warn!(error = %e, "Order placed but clearing the cart failed."),
  }
  Ok(StepControl::Continue)
}

async fn navigate_to_confirmation(data: Shared<CheckoutCtxData>) -> Result<StepControl> {
  let guard = data.read();
  guard.deps.notifier.notify(Toast::success(ORDER_PLACED_MESSAGE));
  guard.deps.navigator.navigate(Route::OrderConfirmation);
  Ok(StepControl::Continue)
}
