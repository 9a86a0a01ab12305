// feastly/src/cart/state.rs

use crate::models::CartSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Identifies one fetch: the reset generation it started under and its start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
  pub generation: u64,
  pub seq: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
  /// Last snapshot received from the server. Kept through later fetch failures.
  pub snapshot: Option<Arc<CartSnapshot>>,
  pub fetches_in_flight: u32,
  pub mutations_in_flight: u32,
  /// User-facing message of the most recent failed fetch, cleared by the next success.
  pub error: Option<String>,
  pub synced_at: Option<DateTime<Utc>>,
  /// Bumped by `Reset`; fetch results started under an older generation are discarded.
  pub generation: u64,
  /// Sequence number handed to the most recently started fetch.
  pub fetch_seq: u64,
  /// Sequence number of the fetch whose result is published. Older results are dropped.
  pub applied_seq: u64,
}

impl CartState {
  pub fn is_loading(&self) -> bool {
    self.fetches_in_flight > 0
  }

  pub fn is_updating(&self) -> bool {
    self.mutations_in_flight > 0
  }

  /// Ticket of the most recently started fetch.
  pub fn current_ticket(&self) -> FetchTicket {
    FetchTicket {
      generation: self.generation,
      seq: self.fetch_seq,
    }
  }

  /// True when a result for `ticket` must not be published: the cart was
  /// reset since, or a later fetch already landed.
  pub fn is_superseded(&self, ticket: FetchTicket) -> bool {
    ticket.generation != self.generation || ticket.seq <= self.applied_seq
  }
}

#[derive(Debug, Clone)]
pub enum CartAction {
  FetchStarted,
  FetchSucceeded {
    snapshot: Arc<CartSnapshot>,
    at: DateTime<Utc>,
    ticket: FetchTicket,
  },
  FetchFailed {
    message: String,
    ticket: FetchTicket,
  },
  /// The fetch future was dropped before it settled.
  FetchAborted,
  MutationStarted,
  MutationSettled,
  /// Signed out: forget everything.
  Reset,
}

pub fn reduce_cart(state: &CartState, action: CartAction) -> CartState {
  let mut next = state.clone();
  match action {
    CartAction::FetchStarted => {
      next.fetches_in_flight += 1;
      next.fetch_seq += 1;
    }
    CartAction::FetchSucceeded { snapshot, at, ticket } => {
      next.fetches_in_flight = next.fetches_in_flight.saturating_sub(1);
      if state.is_superseded(ticket) {
        return next;
      }
      next.snapshot = Some(snapshot);
      next.error = None;
      next.synced_at = Some(at);
      next.applied_seq = ticket.seq;
    }
    CartAction::FetchFailed { message, ticket } => {
      next.fetches_in_flight = next.fetches_in_flight.saturating_sub(1);
      if !state.is_superseded(ticket) {
        next.error = Some(message);
      }
    }
    CartAction::FetchAborted => {
      next.fetches_in_flight = next.fetches_in_flight.saturating_sub(1);
    }
    CartAction::MutationStarted => {
      next.mutations_in_flight += 1;
    }
    CartAction::MutationSettled => {
      next.mutations_in_flight = next.mutations_in_flight.saturating_sub(1);
    }
    CartAction::Reset => {
      next = CartState {
        generation: state.generation + 1,
        fetch_seq: state.fetch_seq,
        applied_seq: state.applied_seq,
        ..CartState::default()
      };
    }
  }
  next
}
