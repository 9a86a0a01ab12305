// feastly/src/models/restaurant.rs

use super::RestaurantId;
use serde::{Deserialize, Serialize};

/// The restaurant fields embedded in cart items and orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSummary {
  pub id: RestaurantId,
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
  pub id: RestaurantId,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub rating: Option<f32>,
  #[serde(default)]
  pub review_count: Option<u32>,
  /// Present when the listing was requested with coordinates.
  #[serde(default)]
  pub distance_km: Option<f64>,
  #[serde(default)]
  pub delivery_time_minutes: Option<u32>,
  #[serde(default = "default_open")]
  pub is_open: bool,
}

fn default_open() -> bool {
  true
}

impl Restaurant {
  pub fn summary(&self) -> RestaurantSummary {
    RestaurantSummary {
      id: self.id,
      name: self.name.clone(),
      image: self.image.clone(),
    }
  }
}
