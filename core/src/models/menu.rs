// feastly/src/models/menu.rs

use super::{MenuId, Price, RestaurantId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
  pub id: MenuId,
  pub name: String,
  pub price: Price,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub restaurant_id: Option<RestaurantId>,
  #[serde(default = "default_available")]
  pub is_available: bool,
}

fn default_available() -> bool {
  true
}
