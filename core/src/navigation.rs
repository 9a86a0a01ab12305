// feastly/src/navigation.rs

use crate::models::{OrderId, RestaurantId};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
  Home,
  Restaurant(RestaurantId),
  Cart,
  Checkout,
  OrderConfirmation,
  Orders,
  Order(OrderId),
  Login,
  Profile,
}

impl Route {
  pub fn path(&self) -> String {
    match self {
      Route::Home => "/".to_string(),
      Route::Restaurant(id) => format!("/restaurants/{}", id),
      Route::Cart => "/cart".to_string(),
      Route::Checkout => "/checkout".to_string(),
      Route::OrderConfirmation => "/orders/confirmation".to_string(),
      Route::Orders => "/orders".to_string(),
      Route::Order(id) => format!("/orders/{}", id),
      Route::Login => "/login".to_string(),
      Route::Profile => "/profile".to_string(),
    }
  }
}

/// Requests a route change from whatever owns routing.
pub trait Navigator: Send + Sync {
  fn navigate(&self, route: Route);
}

/// Remembers every requested route.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
  history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn history(&self) -> Vec<Route> {
    self.history.lock().clone()
  }

  pub fn current(&self) -> Option<Route> {
    self.history.lock().last().copied()
  }
}

impl Navigator for RecordingNavigator {
  fn navigate(&self, route: Route) {
    tracing::debug!(path = %route.path(), "Navigation requested.");
    self.history.lock().push(route);
  }
}
