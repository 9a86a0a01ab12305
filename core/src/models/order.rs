// feastly/src/models/order.rs

use super::{CartSnapshot, MenuId, OrderId, Price, RestaurantId, RestaurantSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  #[default]
  Cash,
  BankTransfer,
  EWallet,
}

impl std::str::FromStr for PaymentMethod {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "cash" | "cod" => Ok(PaymentMethod::Cash),
      "bank_transfer" | "transfer" => Ok(PaymentMethod::BankTransfer),
      "e_wallet" | "ewallet" | "wallet" => Ok(PaymentMethod::EWallet),
      other => Err(format!("unknown payment method '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
  pub menu_id: MenuId,
  pub quantity: u32,
}

/// One restaurant's sub-order inside a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantOrder {
  pub restaurant_id: RestaurantId,
  pub items: Vec<OrderLine>,
}

/// Body of `POST /orders/checkout`: the cart's per-restaurant grouping plus delivery details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub delivery_address: String,
  pub phone: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  pub payment_method: PaymentMethod,
  pub restaurants: Vec<RestaurantOrder>,
}

impl CheckoutRequest {
  pub fn restaurant_orders(snapshot: &CartSnapshot) -> Vec<RestaurantOrder> {
    snapshot
      .groups()
      .iter()
      .map(|group| RestaurantOrder {
        restaurant_id: group.restaurant().id,
        items: group
          .items()
          .iter()
          .map(|item| OrderLine {
            menu_id: item.menu.id,
            quantity: item.quantity,
          })
          .collect(),
      })
      .collect()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Preparing,
  OnTheWay,
  Delivered,
  Cancelled,
  #[serde(other)]
  Unknown,
}

impl OrderStatus {
  /// Whether the order can still change state.
  pub fn is_active(self) -> bool {
    !matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub menu_id: MenuId,
  #[serde(default)]
  pub name: Option<String>,
  pub quantity: u32,
  pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: OrderId,
  pub status: OrderStatus,
  pub total: Price,
  #[serde(default)]
  pub restaurant: Option<RestaurantSummary>,
  #[serde(default)]
  pub items: Vec<OrderItem>,
  #[serde(default)]
  pub delivery_address: Option<String>,
  #[serde(default)]
  pub payment_method: Option<PaymentMethod>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
  #[serde(default)]
  pub orders: Vec<Order>,
}

/// What the confirmation screen shows after a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub order_ids: Vec<OrderId>,
  pub restaurant_count: usize,
  pub item_count: u32,
  pub grand_total: Price,
  pub delivery_address: String,
  pub payment_method: PaymentMethod,
  pub placed_at: DateTime<Utc>,
}
