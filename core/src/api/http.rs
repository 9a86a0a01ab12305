// feastly/src/api/http.rs

//! reqwest implementation of [`StorefrontApi`].
//!
//! Every request carries the bearer token found in client storage under
//! [`TOKEN_KEY`], if any. Successful responses are unwrapped from the
//! `{"data": ..., "message": ...}` envelope; failures keep the server's
//! `message` so it can be shown to the user verbatim.

use super::StorefrontApi;
use crate::catalog::SearchFilters;
use crate::config::ClientConfig;
use crate::error::{Result, StoreError};
use crate::models::{
  AuthResponse, CartItem, CartItemId, CheckoutRequest, CheckoutResponse, LoginRequest, MenuItem, NewCartItem,
  NewReview, Order, OrderId, ProfileUpdate, QuantityUpdate, RegisterRequest, Restaurant, RestaurantId, Review, User,
};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
  data: T,
  #[serde(default)]
  message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CartPayload {
  #[serde(default)]
  items: Vec<CartItem>,
}

pub struct HttpApi {
  client: reqwest::Client,
  base_url: String,
  storage: Arc<dyn KeyValueStore>,
}

impl HttpApi {
  pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.request_timeout)
      .default_headers({
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
          reqwest::header::ACCEPT,
          reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers
      })
      .build()
      .map_err(|e| StoreError::Config(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.api_base_url.clone(),
      storage,
    })
  }

  fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
    let url = format!("{}{}", self.base_url, path);
    let builder = self.client.request(method, url);
    match self.storage.get(TOKEN_KEY)? {
      Some(token) if !token.is_empty() => Ok(builder.bearer_auth(token)),
      _ => Ok(builder),
    }
  }

  async fn execute(&self, builder: RequestBuilder, endpoint: &str) -> Result<reqwest::Response> {
    let response = builder.send().await.map_err(|source| StoreError::Http {
      endpoint: endpoint.to_string(),
      source,
    })?;

    let status = response.status();
    if status.is_success() {
      debug!(endpoint, status = status.as_u16(), "API call succeeded.");
      return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    warn!(endpoint, status = status.as_u16(), message = %message, "API call failed.");

    if status == StatusCode::UNAUTHORIZED {
      return Err(StoreError::Unauthenticated);
    }
    Err(StoreError::Api {
      endpoint: endpoint.to_string(),
      status: status.as_u16(),
      message,
    })
  }

  async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder, endpoint: &str) -> Result<T> {
    let response = self.execute(builder, endpoint).await?;
    let envelope: Envelope<T> = response.json().await.map_err(|source| StoreError::Decode {
      endpoint: endpoint.to_string(),
      source,
    })?;
    if let Some(message) = envelope.message.as_deref() {
      debug!(endpoint, message, "Server message.");
    }
    Ok(envelope.data)
  }

  async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<()> {
    self.execute(builder, endpoint).await.map(|_| ())
  }
}

/// Prefers the JSON `message` (or `error`) field, then a short plain-text body, then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
  if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
    if let Some(m) = parsed.message.or(parsed.error).filter(|m| !m.trim().is_empty()) {
      return m;
    }
  }
  let trimmed = body.trim();
  if !trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('{') && !trimmed.starts_with('<') {
    return trimmed.to_string();
  }
  status.canonical_reason().unwrap_or("Request failed").to_string()
}

#[async_trait]
impl StorefrontApi for HttpApi {
  #[instrument(name = "api::login", skip_all, err)]
  async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
    let builder = self.request(Method::POST, "/auth/login")?.json(request);
    self.fetch(builder, "POST /auth/login").await
  }

  #[instrument(name = "api::register", skip_all, err)]
  async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
    let builder = self.request(Method::POST, "/auth/register")?.json(request);
    self.fetch(builder, "POST /auth/register").await
  }

  #[instrument(name = "api::current_user", skip_all, err)]
  async fn current_user(&self) -> Result<User> {
    let builder = self.request(Method::GET, "/auth/me")?;
    self.fetch(builder, "GET /auth/me").await
  }

  #[instrument(name = "api::update_profile", skip_all, err)]
  async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
    let builder = self.request(Method::PUT, "/users/profile")?.json(update);
    self.fetch(builder, "PUT /users/profile").await
  }

  #[instrument(name = "api::list_restaurants", skip_all, fields(query = %filters.to_query_string()), err)]
  async fn list_restaurants(&self, filters: &SearchFilters) -> Result<Vec<Restaurant>> {
    let builder = self.request(Method::GET, "/restaurants")?.query(&filters.to_query_pairs());
    self.fetch(builder, "GET /restaurants").await
  }

  #[instrument(name = "api::get_restaurant", skip(self), err)]
  async fn get_restaurant(&self, restaurant_id: RestaurantId) -> Result<Restaurant> {
    let builder = self.request(Method::GET, &format!("/restaurants/{}", restaurant_id))?;
    self.fetch(builder, "GET /restaurants/{id}").await
  }

  #[instrument(name = "api::get_menu", skip(self), err)]
  async fn get_menu(&self, restaurant_id: RestaurantId) -> Result<Vec<MenuItem>> {
    let builder = self.request(Method::GET, &format!("/restaurants/{}/menus", restaurant_id))?;
    self.fetch(builder, "GET /restaurants/{id}/menus").await
  }

  #[instrument(name = "api::list_reviews", skip(self), err)]
  async fn list_reviews(&self, restaurant_id: RestaurantId) -> Result<Vec<Review>> {
    let builder = self.request(Method::GET, &format!("/restaurants/{}/reviews", restaurant_id))?;
    self.fetch(builder, "GET /restaurants/{id}/reviews").await
  }

  #[instrument(name = "api::create_review", skip_all, fields(restaurant_id = review.restaurant_id), err)]
  async fn create_review(&self, review: &NewReview) -> Result<Review> {
    let builder = self.request(Method::POST, "/reviews")?.json(review);
    self.fetch(builder, "POST /reviews").await
  }

  #[instrument(name = "api::get_cart", skip_all, err)]
  async fn get_cart(&self) -> Result<Vec<CartItem>> {
    let builder = self.request(Method::GET, "/cart")?;
    let payload: CartPayload = self.fetch(builder, "GET /cart").await?;
    Ok(payload.items)
  }

  #[instrument(name = "api::add_cart_item", skip_all, fields(menu_id = item.menu_id, quantity = item.quantity), err)]
  async fn add_cart_item(&self, item: &NewCartItem) -> Result<()> {
    let builder = self.request(Method::POST, "/cart")?.json(item);
    self.send(builder, "POST /cart").await
  }

  #[instrument(name = "api::update_cart_item", skip(self), err)]
  async fn update_cart_item(&self, item_id: CartItemId, quantity: u32) -> Result<()> {
    let builder = self
      .request(Method::PUT, &format!("/cart/{}", item_id))?
      .json(&QuantityUpdate { quantity });
    self.send(builder, "PUT /cart/{itemId}").await
  }

  #[instrument(name = "api::remove_cart_item", skip(self), err)]
  async fn remove_cart_item(&self, item_id: CartItemId) -> Result<()> {
    let builder = self.request(Method::DELETE, &format!("/cart/{}", item_id))?;
    self.send(builder, "DELETE /cart/{itemId}").await
  }

  #[instrument(name = "api::clear_cart", skip_all, err)]
  async fn clear_cart(&self) -> Result<()> {
    let builder = self.request(Method::DELETE, "/cart")?;
    self.send(builder, "DELETE /cart").await
  }

  #[instrument(name = "api::checkout", skip_all, fields(restaurants = request.restaurants.len()), err)]
  async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse> {
    let builder = self.request(Method::POST, "/orders/checkout")?.json(request);
    self.fetch(builder, "POST /orders/checkout").await
  }

  #[instrument(name = "api::list_orders", skip_all, err)]
  async fn list_orders(&self) -> Result<Vec<Order>> {
    let builder = self.request(Method::GET, "/orders")?;
    self.fetch(builder, "GET /orders").await
  }

  #[instrument(name = "api::get_order", skip(self), err)]
  async fn get_order(&self, order_id: OrderId) -> Result<Order> {
    let builder = self.request(Method::GET, &format!("/orders/{}", order_id))?;
    self.fetch(builder, "GET /orders/{id}").await
  }
}

impl std::fmt::Debug for HttpApi {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("HttpApi").field("base_url", &self.base_url).finish()
  }
}
