// feastly/src/models/mod.rs

//! Typed shapes of the remote API's resources plus the derived cart view.

pub mod cart;
pub mod menu;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

pub use cart::{CartGroup, CartItem, CartSnapshot, NewCartItem, QuantityUpdate};
pub use menu::MenuItem;
pub use order::{
  CheckoutRequest, CheckoutResponse, Order, OrderItem, OrderLine, OrderStatus, OrderSummary, PaymentMethod,
  RestaurantOrder,
};
pub use restaurant::{Restaurant, RestaurantSummary};
pub use review::{NewReview, Review};
pub use user::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};

pub type CartItemId = u64;
pub type MenuId = u64;
pub type OrderId = u64;
pub type RestaurantId = u64;
pub type UserId = u64;

/// Amount in the smallest currency unit.
pub type Price = u64;
