// feastly/src/api/mod.rs

//! The remote storefront API as seen from the client.
//!
//! [`StorefrontApi`] is the seam every component talks through; [`HttpApi`] is
//! the reqwest implementation. Tests and alternative front ends supply their own.

pub mod http;

pub use http::HttpApi;

use crate::catalog::SearchFilters;
use crate::error::Result;
use crate::models::{
  AuthResponse, CartItem, CartItemId, CheckoutRequest, CheckoutResponse, LoginRequest, MenuItem, NewCartItem,
  NewReview, Order, OrderId, ProfileUpdate, RegisterRequest, Restaurant, RestaurantId, Review, User,
};
use async_trait::async_trait;

#[async_trait]
pub trait StorefrontApi: Send + Sync {
  async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;
  async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;
  async fn current_user(&self) -> Result<User>;
  async fn update_profile(&self, update: &ProfileUpdate) -> Result<User>;

  async fn list_restaurants(&self, filters: &SearchFilters) -> Result<Vec<Restaurant>>;
  async fn get_restaurant(&self, restaurant_id: RestaurantId) -> Result<Restaurant>;
  async fn get_menu(&self, restaurant_id: RestaurantId) -> Result<Vec<MenuItem>>;
  async fn list_reviews(&self, restaurant_id: RestaurantId) -> Result<Vec<Review>>;
  async fn create_review(&self, review: &NewReview) -> Result<Review>;

  /// The signed-in user's cart lines, in server order.
  async fn get_cart(&self) -> Result<Vec<CartItem>>;
  async fn add_cart_item(&self, item: &NewCartItem) -> Result<()>;
  /// Sets the absolute quantity of a line.
  async fn update_cart_item(&self, item_id: CartItemId, quantity: u32) -> Result<()>;
  async fn remove_cart_item(&self, item_id: CartItemId) -> Result<()>;
  async fn clear_cart(&self) -> Result<()>;

  async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse>;
  async fn list_orders(&self) -> Result<Vec<Order>>;
  async fn get_order(&self, order_id: OrderId) -> Result<Order>;
}
