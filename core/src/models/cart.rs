// feastly/src/models/cart.rs

//! Cart line items as the API returns them, and the grouped [`CartSnapshot`]
//! derived from them.

use super::{CartItemId, MenuId, MenuItem, Price, RestaurantId, RestaurantSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub id: CartItemId,
  pub menu: MenuItem,
  pub restaurant: RestaurantSummary,
  pub quantity: u32,
}

impl CartItem {
  pub fn line_total(&self) -> Price {
    self.menu.price.saturating_mul(Price::from(self.quantity))
  }
}

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
  pub menu_id: MenuId,
  pub quantity: u32,
  pub restaurant_id: RestaurantId,
}

/// Body of `PUT /cart/{itemId}`. The quantity is absolute, not a delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityUpdate {
  pub quantity: u32,
}

/// One restaurant's share of the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartGroup {
  restaurant: RestaurantSummary,
  items: Vec<CartItem>,
  subtotal: Price,
}

impl CartGroup {
  fn new(restaurant: RestaurantSummary) -> Self {
    Self {
      restaurant,
      items: Vec::new(),
      subtotal: 0,
    }
  }

  fn push(&mut self, item: CartItem) {
    self.subtotal = self.subtotal.saturating_add(item.line_total());
    self.items.push(item);
  }

  pub fn restaurant(&self) -> &RestaurantSummary {
    &self.restaurant
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn subtotal(&self) -> Price {
    self.subtotal
  }

  pub fn item_count(&self) -> u32 {
    self.items.iter().map(|i| i.quantity).sum()
  }
}

/// Point-in-time view of the cart: groups in first-seen restaurant order, plus totals.
///
/// Always rebuilt from the server's item list; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSnapshot {
  groups: Vec<CartGroup>,
  grand_total: Price,
  item_count: u32,
}

impl CartSnapshot {
  pub fn empty() -> Self {
    Self::default()
  }

  /// Groups `items` by restaurant. Lines with a zero quantity are dropped; a
  /// present line always has at least one unit.
  pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
    let mut groups: Vec<CartGroup> = Vec::new();

    for item in items {
      if item.quantity == 0 {
        tracing::warn!(item_id = item.id, "Dropping zero-quantity cart line from server response.");
        continue;
      }
      match groups.iter_mut().find(|g| g.restaurant.id == item.restaurant.id) {
        Some(group) => group.push(item),
        None => {
          let mut group = CartGroup::new(item.restaurant.clone());
          group.push(item);
          groups.push(group);
        }
      }
    }

    let grand_total = groups.iter().fold(0, |acc: Price, g| acc.saturating_add(g.subtotal));
    let item_count = groups.iter().map(CartGroup::item_count).sum();

    Self {
      groups,
      grand_total,
      item_count,
    }
  }

  pub fn groups(&self) -> &[CartGroup] {
    &self.groups
  }

  pub fn grand_total(&self) -> Price {
    self.grand_total
  }

  pub fn item_count(&self) -> u32 {
    self.item_count
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn find_item(&self, item_id: CartItemId) -> Option<&CartItem> {
    self.items().find(|i| i.id == item_id)
  }

  pub fn group_for(&self, restaurant_id: RestaurantId) -> Option<&CartGroup> {
    self.groups.iter().find(|g| g.restaurant.id == restaurant_id)
  }

  pub fn items(&self) -> impl Iterator<Item = &CartItem> {
    self.groups.iter().flat_map(|g| g.items.iter())
  }
}
