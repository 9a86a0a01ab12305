// feastly/src/cart/mutations.rs

use super::store::CartStore;
use crate::api::StorefrontApi;
use crate::error::{Result, StoreError};
use crate::models::{CartItemId, MenuId, NewCartItem, RestaurantId};
use crate::notify::{Notifier, Toast};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const ADDED_TO_CART_MESSAGE: &str = "Added to cart";

/// Cart writes. Each one goes to the server, then invalidates and refetches the
/// cart on success. Failures are logged, shown as an error toast and returned;
/// the published snapshot is left as it was.
pub struct CartMutations {
  api: Arc<dyn StorefrontApi>,
  store: Arc<CartStore>,
  notifier: Arc<dyn Notifier>,
}

impl CartMutations {
  pub fn new(api: Arc<dyn StorefrontApi>, store: Arc<CartStore>, notifier: Arc<dyn Notifier>) -> Self {
    Self { api, store, notifier }
  }

  pub fn store(&self) -> &Arc<CartStore> {
    &self.store
  }

  /// Adds `quantity` units of a menu item. Only positive quantities are sent.
  #[instrument(name = "CartMutations::add_to_cart", skip(self), err)]
  pub async fn add_to_cart(&self, menu_id: MenuId, quantity: u32, restaurant_id: RestaurantId) -> Result<()> {
    if quantity == 0 {
      warn!("Refusing to add a zero quantity.");
      return Err(StoreError::Validation("Quantity must be at least 1.".to_string()));
    }
    let item = NewCartItem {
      menu_id,
      quantity,
      restaurant_id,
    };
    self
      .mutate("add_to_cart", Some(ADDED_TO_CART_MESSAGE), self.api.add_cart_item(&item))
      .await
  }

  /// Sets the absolute quantity of a line. Zero is rejected; remove the line instead.
  #[instrument(name = "CartMutations::update_quantity", skip(self), err)]
  pub async fn update_quantity(&self, item_id: CartItemId, quantity: u32) -> Result<()> {
    if quantity == 0 {
      warn!("Refusing to set a zero quantity; the line must be removed instead.");
      return Err(StoreError::Validation(
        "Quantity must be at least 1. Remove the item instead.".to_string(),
      ));
    }
    self
      .mutate("update_quantity", None, self.api.update_cart_item(item_id, quantity))
      .await
  }

  #[instrument(name = "CartMutations::remove_item", skip(self), err)]
  pub async fn remove_item(&self, item_id: CartItemId) -> Result<()> {
    self.mutate("remove_item", None, self.api.remove_cart_item(item_id)).await
  }

  /// Empties the cart. Callers such as checkout await it before moving on.
  #[instrument(name = "CartMutations::clear_cart", skip(self), err)]
  pub async fn clear_cart(&self) -> Result<()> {
    self.mutate("clear_cart", None, self.api.clear_cart()).await
  }

  async fn mutate(
    &self,
    operation: &'static str,
    success_message: Option<&str>,
    call: impl std::future::Future<Output = Result<()>>,
  ) -> Result<()> {
    if !self.store.is_enabled() {
      let err = StoreError::Unauthenticated;
      self.notifier.notify(Toast::error(err.user_message()));
      return Err(err);
    }

    let outcome = {
      let _in_flight = self.store.begin_mutation();
      call.await
    };

    if let Err(e) = outcome {
      error!(operation, error = %e, "Cart mutation failed.");
      self.notifier.notify(Toast::error(e.user_message()));
      if matches!(e, StoreError::Unauthenticated) {
        self.store.sign_out_rejected();
      }
      return Err(e);
    }

    info!(operation, "Cart mutation succeeded.");
    if let Some(message) = success_message {
      self.notifier.notify(Toast::success(message));
    }

    self.store.invalidate();
    // The write already landed; a failed refetch shows up as the store's fetch error.
    if let Err(e) = self.store.fetch().await {
      warn!(operation, error = %e, "Refetch after cart mutation failed.");
    }
    Ok(())
  }
}
