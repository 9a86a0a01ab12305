// feastly/src/orders.rs

//! Order history and tracking.

use crate::api::StorefrontApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{Result, StoreError};
use crate::models::{Order, OrderId, OrderSummary};
use crate::storage::{get_json, KeyValueStore, LAST_ORDER_KEY};
use std::sync::Arc;
use tracing::instrument;

pub struct Orders {
  api: Arc<dyn StorefrontApi>,
  cache: Arc<QueryCache>,
  storage: Arc<dyn KeyValueStore>,
}

impl Orders {
  pub fn new(api: Arc<dyn StorefrontApi>, cache: Arc<QueryCache>, storage: Arc<dyn KeyValueStore>) -> Self {
    Self { api, cache, storage }
  }

  /// Order history, newest first. Served from cache until a checkout invalidates it.
  #[instrument(name = "Orders::history", skip(self), err)]
  pub async fn history(&self) -> Result<Arc<Vec<Order>>> {
    if let Some(hit) = self.cache.get_fresh::<Vec<Order>>(&QueryKey::Orders) {
      return Ok(hit);
    }
    let mut orders = self.api.list_orders().await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(self.cache.set(QueryKey::Orders, orders))
  }

  /// Current state of one order. Always asks the server: status moves on its own.
  #[instrument(name = "Orders::track", skip(self), err)]
  pub async fn track(&self, order_id: OrderId) -> Result<Order> {
    let order = self.api.get_order(order_id).await?;
    if order.id != order_id {
      return Err(StoreError::Internal(format!(
        "Asked for order {} but the server returned order {}",
        order_id, order.id
      )));
    }
    let previous = self.cache.get::<Order>(&QueryKey::Order(order_id));
    if previous.as_ref().is_some_and(|p| p.status != order.status) {
      // The listing shows statuses too.
      self.cache.invalidate(&QueryKey::Orders);
    }
    self.cache.set(QueryKey::Order(order_id), order.clone());
    Ok(order)
  }

  /// Summary stored by the last successful checkout, for the confirmation screen.
  pub fn last_order(&self) -> Result<Option<OrderSummary>> {
    get_json(self.storage.as_ref(), LAST_ORDER_KEY)
  }
}
