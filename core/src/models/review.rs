// feastly/src/models/review.rs

use super::{OrderId, RestaurantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id: u64,
  pub rating: u8,
  #[serde(default)]
  pub comment: Option<String>,
  #[serde(default)]
  pub user_name: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
  pub restaurant_id: RestaurantId,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub order_id: Option<OrderId>,
  pub rating: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
}
