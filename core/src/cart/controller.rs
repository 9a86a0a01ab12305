// feastly/src/cart/controller.rs

//! UI intents on cart lines.
//!
//! Incrementing always writes `quantity + 1`. Decrementing a line that would
//! drop below one unit does not write anything: it opens the delete
//! confirmation instead, and only a confirmed dialog removes the line.
//!
//! ```text
//! Closed --(decrement to zero | delete click)--> Open{item}
//! Open{item} --(confirm ok | cancel)--> Closed
//! Open{item} --(confirm fails)--> Open{item}
//! ```

use super::mutations::CartMutations;
use crate::error::Result;
use crate::models::{CartItem, CartItemId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteDialog {
  #[default]
  Closed,
  Open {
    item_id: CartItemId,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
  Updated { item_id: CartItemId, quantity: u32 },
  ConfirmationRequested { item_id: CartItemId },
  Removed { item_id: CartItemId },
  Cancelled,
  /// A request for this line was already in flight, or there was nothing to confirm.
  Ignored,
}

pub struct CartController {
  mutations: Arc<CartMutations>,
  dialog: Mutex<DeleteDialog>,
  in_flight: Arc<Mutex<HashSet<CartItemId>>>,
}

impl CartController {
  pub fn new(mutations: Arc<CartMutations>) -> Self {
    Self {
      mutations,
      dialog: Mutex::new(DeleteDialog::Closed),
      in_flight: Arc::new(Mutex::new(HashSet::new())),
    }
  }

  pub fn dialog(&self) -> DeleteDialog {
    *self.dialog.lock()
  }

  pub fn is_in_flight(&self, item_id: CartItemId) -> bool {
    self.in_flight.lock().contains(&item_id)
  }

  pub async fn increment(&self, item: &CartItem) -> Result<IntentOutcome> {
    let Some(_claim) = self.claim(item.id) else {
      return Ok(IntentOutcome::Ignored);
    };
    let quantity = item.quantity.saturating_add(1);
    self.mutations.update_quantity(item.id, quantity).await?;
    Ok(IntentOutcome::Updated {
      item_id: item.id,
      quantity,
    })
  }

  pub async fn decrement(&self, item: &CartItem) -> Result<IntentOutcome> {
    if item.quantity <= 1 {
      return Ok(self.request_delete(item.id));
    }
    let Some(_claim) = self.claim(item.id) else {
      return Ok(IntentOutcome::Ignored);
    };
    let quantity = item.quantity - 1;
    self.mutations.update_quantity(item.id, quantity).await?;
    Ok(IntentOutcome::Updated {
      item_id: item.id,
      quantity,
    })
  }

  /// Opens the confirmation dialog for `item_id`, replacing any other pending delete.
  pub fn request_delete(&self, item_id: CartItemId) -> IntentOutcome {
    *self.dialog.lock() = DeleteDialog::Open { item_id };
    debug!(item_id, "Delete confirmation opened.");
    IntentOutcome::ConfirmationRequested { item_id }
  }

  pub fn cancel_delete(&self) -> IntentOutcome {
    let mut dialog = self.dialog.lock();
    match *dialog {
      DeleteDialog::Open { item_id } => {
        debug!(item_id, "Delete confirmation cancelled.");
        *dialog = DeleteDialog::Closed;
        IntentOutcome::Cancelled
      }
      DeleteDialog::Closed => IntentOutcome::Ignored,
    }
  }

  /// Removes the pending line. The dialog closes only if the removal succeeds.
  pub async fn confirm_delete(&self) -> Result<IntentOutcome> {
    let DeleteDialog::Open { item_id } = self.dialog() else {
      return Ok(IntentOutcome::Ignored);
    };
    let Some(_claim) = self.claim(item_id) else {
      return Ok(IntentOutcome::Ignored);
    };

    self.mutations.remove_item(item_id).await?;

    let mut dialog = self.dialog.lock();
    if *dialog == (DeleteDialog::Open { item_id }) {
      *dialog = DeleteDialog::Closed;
    }
    info!(item_id, "Cart line removed after confirmation.");
    Ok(IntentOutcome::Removed { item_id })
  }

  fn claim(&self, item_id: CartItemId) -> Option<InFlightClaim> {
    let mut set = self.in_flight.lock();
    if !set.insert(item_id) {
      debug!(item_id, "Ignoring intent; a request for this line is already in flight.");
      return None;
    }
    Some(InFlightClaim {
      set: Arc::clone(&self.in_flight),
      item_id,
    })
  }
}

/// Releases the line on drop, including when the owning future is cancelled.
struct InFlightClaim {
  set: Arc<Mutex<HashSet<CartItemId>>>,
  item_id: CartItemId,
}

impl Drop for InFlightClaim {
  fn drop(&mut self) {
    self.set.lock().remove(&self.item_id);
  }
}
