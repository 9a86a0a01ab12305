// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper.

use async_trait::async_trait;
use feastly::api::StorefrontApi;
use feastly::catalog::SearchFilters;
use feastly::models::{
  AuthResponse, CartItem, CartItemId, CheckoutRequest, CheckoutResponse, LoginRequest, MenuId, MenuItem,
  NewCartItem, NewReview, Order, OrderId, OrderItem, OrderStatus, ProfileUpdate, RegisterRequest, Restaurant,
  RestaurantId, RestaurantSummary, Review, User,
};
use feastly::navigation::RecordingNavigator;
use feastly::notify::RecordingNotifier;
use feastly::storage::{KeyValueStore, MemoryStorage, TOKEN_KEY};
use feastly::{Storefront, StoreError};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Counters shared across tests (run those tests with #[serial]) ---
pub static CHECKOUT_CALLS: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  CHECKOUT_CALLS.store(0, Ordering::SeqCst);
}

// --- Fixture catalog ---
pub const WARUNG_A: RestaurantId = 1;
pub const KEDAI_B: RestaurantId = 2;

pub const NASI_GORENG: MenuId = 10; // Warung A, 50,000
pub const ES_TEH: MenuId = 11; // Warung A, 5,000
pub const SOTO: MenuId = 5; // Kedai B, 30,000
pub const KERUPUK: MenuId = 6; // Kedai B, 2,000

pub const TEST_TOKEN: &str = "token-abc";

pub fn restaurant_summary(id: RestaurantId) -> RestaurantSummary {
  let name = match id {
    WARUNG_A => "Warung A",
    KEDAI_B => "Kedai B",
    _ => "Unknown",
  };
  RestaurantSummary {
    id,
    name: name.to_string(),
    image: None,
  }
}

pub fn menu_item(id: MenuId, name: &str, price: u64, restaurant_id: RestaurantId) -> MenuItem {
  MenuItem {
    id,
    name: name.to_string(),
    price,
    image: None,
    description: None,
    category: None,
    restaurant_id: Some(restaurant_id),
    is_available: true,
  }
}

pub fn cart_item(id: CartItemId, menu: MenuItem, quantity: u32) -> CartItem {
  let restaurant = restaurant_summary(menu.restaurant_id.unwrap_or(0));
  CartItem {
    id,
    menu,
    restaurant,
    quantity,
  }
}

pub fn test_user() -> User {
  User {
    id: 7,
    name: "Sari".to_string(),
    email: "sari@example.com".to_string(),
    phone: None,
    address: None,
    avatar: None,
  }
}

fn restaurant(id: RestaurantId, category: &str, rating: f32) -> Restaurant {
  let summary = restaurant_summary(id);
  Restaurant {
    id,
    name: summary.name,
    description: None,
    address: None,
    image: None,
    category: Some(category.to_string()),
    rating: Some(rating),
    review_count: Some(0),
    distance_km: None,
    delivery_time_minutes: Some(25),
    is_open: true,
  }
}

#[derive(Default)]
struct FakeState {
  menus: HashMap<MenuId, MenuItem>,
  cart: Vec<CartItem>,
  next_cart_id: CartItemId,
  orders: Vec<Order>,
  next_order_id: OrderId,
  reviews: Vec<(RestaurantId, Review)>,
  user: Option<User>,
  checkout_requests: Vec<CheckoutRequest>,
  restaurant_queries: Vec<String>,
  calls: HashMap<&'static str, usize>,
  failing: HashMap<&'static str, (u16, String)>,
  delays: HashMap<&'static str, Duration>,
}

/// In-memory storefront backend. Each trait method records a call under its
/// own name, can be made to fail, and can be slowed down.
pub struct FakeApi {
  state: Mutex<FakeState>,
}

impl FakeApi {
  pub fn new() -> Self {
    let mut menus = HashMap::new();
    for m in [
      menu_item(NASI_GORENG, "Nasi Goreng", 50_000, WARUNG_A),
      menu_item(ES_TEH, "Es Teh", 5_000, WARUNG_A),
      menu_item(SOTO, "Soto Ayam", 30_000, KEDAI_B),
      menu_item(KERUPUK, "Kerupuk", 2_000, KEDAI_B),
    ] {
      menus.insert(m.id, m);
    }
    Self {
      state: Mutex::new(FakeState {
        menus,
        next_cart_id: 1,
        next_order_id: 100,
        user: Some(test_user()),
        ..FakeState::default()
      }),
    }
  }

  /// Replaces the server cart with `(menu_id, quantity)` lines.
  pub fn seed_cart(&self, lines: &[(MenuId, u32)]) -> Vec<CartItemId> {
    let mut state = self.state.lock();
    state.cart.clear();
    let mut ids = Vec::new();
    for (menu_id, quantity) in lines {
      let menu = state.menus[menu_id].clone();
      let id = state.next_cart_id;
      state.next_cart_id += 1;
      state.cart.push(cart_item(id, menu, *quantity));
      ids.push(id);
    }
    ids
  }

  pub fn server_cart(&self) -> Vec<CartItem> {
    self.state.lock().cart.clone()
  }

  pub fn calls(&self, op: &str) -> usize {
    self.state.lock().calls.get(op).copied().unwrap_or(0)
  }

  pub fn total_calls(&self) -> usize {
    self.state.lock().calls.values().sum()
  }

  pub fn reset_calls(&self) {
    self.state.lock().calls.clear();
  }

  /// Makes `op` answer with `status` and `message` until [`FakeApi::recover`].
  pub fn fail(&self, op: &'static str, status: u16, message: &str) {
    self.state.lock().failing.insert(op, (status, message.to_string()));
  }

  pub fn recover(&self, op: &'static str) {
    self.state.lock().failing.remove(op);
  }

  pub fn delay(&self, op: &'static str, by: Duration) {
    self.state.lock().delays.insert(op, by);
  }

  /// Calls already waiting keep the delay they started with.
  pub fn clear_delay(&self, op: &'static str) {
    self.state.lock().delays.remove(op);
  }

  pub fn checkout_requests(&self) -> Vec<CheckoutRequest> {
    self.state.lock().checkout_requests.clone()
  }

  pub fn restaurant_queries(&self) -> Vec<String> {
    self.state.lock().restaurant_queries.clone()
  }

  pub fn set_order_status(&self, order_id: OrderId, status: OrderStatus) {
    let mut state = self.state.lock();
    if let Some(order) = state.orders.iter_mut().find(|o| o.id == order_id) {
      order.status = status;
    }
  }

  async fn enter(&self, op: &'static str) -> Result<(), StoreError> {
    let (delay, failure) = {
      let mut state = self.state.lock();
      *state.calls.entry(op).or_insert(0) += 1;
      (state.delays.get(op).copied(), state.failing.get(op).cloned())
    };
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }
    match failure {
      Some((401, _)) => Err(StoreError::Unauthenticated),
      Some((status, message)) => Err(StoreError::Api {
        endpoint: op.to_string(),
        status,
        message,
      }),
      None => Ok(()),
    }
  }
}

fn not_found(op: &str, what: &str) -> StoreError {
  StoreError::Api {
    endpoint: op.to_string(),
    status: 404,
    message: format!("{} not found", what),
  }
}

#[async_trait]
impl StorefrontApi for FakeApi {
  async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, StoreError> {
    self.enter("login").await?;
    if request.password != "secret" {
      return Err(StoreError::Api {
        endpoint: "login".to_string(),
        status: 400,
        message: "Invalid email or password".to_string(),
      });
    }
    Ok(AuthResponse {
      token: TEST_TOKEN.to_string(),
      user: test_user(),
    })
  }

  async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, StoreError> {
    self.enter("register").await?;
    let user = User {
      name: request.name.clone(),
      email: request.email.clone(),
      phone: request.phone.clone(),
      ..test_user()
    };
    self.state.lock().user = Some(user.clone());
    Ok(AuthResponse {
      token: TEST_TOKEN.to_string(),
      user,
    })
  }

  async fn current_user(&self) -> Result<User, StoreError> {
    self.enter("current_user").await?;
    self.state.lock().user.clone().ok_or(StoreError::Unauthenticated)
  }

  async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, StoreError> {
    self.enter("update_profile").await?;
    let mut state = self.state.lock();
    let user = state.user.as_mut().ok_or(StoreError::Unauthenticated)?;
    if let Some(name) = &update.name {
      user.name = name.clone();
    }
    if let Some(phone) = &update.phone {
      user.phone = Some(phone.clone());
    }
    if let Some(address) = &update.address {
      user.address = Some(address.clone());
    }
    Ok(user.clone())
  }

  async fn list_restaurants(&self, filters: &SearchFilters) -> Result<Vec<Restaurant>, StoreError> {
    self.enter("list_restaurants").await?;
    self.state.lock().restaurant_queries.push(filters.to_query_string());
    let all = vec![restaurant(WARUNG_A, "indonesian", 4.5), restaurant(KEDAI_B, "soup", 4.2)];
    Ok(
      all
        .into_iter()
        .filter(|r| filters.category.is_none() || r.category == filters.category)
        .collect(),
    )
  }

  async fn get_restaurant(&self, restaurant_id: RestaurantId) -> Result<Restaurant, StoreError> {
    self.enter("get_restaurant").await?;
    match restaurant_id {
      WARUNG_A => Ok(restaurant(WARUNG_A, "indonesian", 4.5)),
      KEDAI_B => Ok(restaurant(KEDAI_B, "soup", 4.2)),
      _ => Err(not_found("get_restaurant", "Restaurant")),
    }
  }

  async fn get_menu(&self, restaurant_id: RestaurantId) -> Result<Vec<MenuItem>, StoreError> {
    self.enter("get_menu").await?;
    let state = self.state.lock();
    let mut items: Vec<MenuItem> = state
      .menus
      .values()
      .filter(|m| m.restaurant_id == Some(restaurant_id))
      .cloned()
      .collect();
    items.sort_by_key(|m| m.id);
    Ok(items)
  }

  async fn list_reviews(&self, restaurant_id: RestaurantId) -> Result<Vec<Review>, StoreError> {
    self.enter("list_reviews").await?;
    Ok(
      self
        .state
        .lock()
        .reviews
        .iter()
        .filter(|(rid, _)| *rid == restaurant_id)
        .map(|(_, r)| r.clone())
        .collect(),
    )
  }

  async fn create_review(&self, review: &NewReview) -> Result<Review, StoreError> {
    self.enter("create_review").await?;
    let mut state = self.state.lock();
    let created = Review {
      id: state.reviews.len() as u64 + 1,
      rating: review.rating,
      comment: review.comment.clone(),
      user_name: state.user.as_ref().map(|u| u.name.clone()),
      created_at: None,
    };
    state.reviews.push((review.restaurant_id, created.clone()));
    Ok(created)
  }

  /// Answers with the cart as it was when the request arrived, however long the reply takes.
  async fn get_cart(&self) -> Result<Vec<CartItem>, StoreError> {
    let cart = self.state.lock().cart.clone();
    self.enter("get_cart").await?;
    Ok(cart)
  }

  async fn add_cart_item(&self, item: &NewCartItem) -> Result<(), StoreError> {
    self.enter("add_cart_item").await?;
    let mut state = self.state.lock();
    let menu = state
      .menus
      .get(&item.menu_id)
      .cloned()
      .ok_or_else(|| not_found("add_cart_item", "Menu"))?;
    if let Some(line) = state.cart.iter_mut().find(|l| l.menu.id == item.menu_id) {
      line.quantity += item.quantity;
      return Ok(());
    }
    let id = state.next_cart_id;
    state.next_cart_id += 1;
    state.cart.push(cart_item(id, menu, item.quantity));
    Ok(())
  }

  async fn update_cart_item(&self, item_id: CartItemId, quantity: u32) -> Result<(), StoreError> {
    self.enter("update_cart_item").await?;
    let mut state = self.state.lock();
    let line = state
      .cart
      .iter_mut()
      .find(|l| l.id == item_id)
      .ok_or_else(|| not_found("update_cart_item", "Cart item"))?;
    line.quantity = quantity;
    Ok(())
  }

  async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), StoreError> {
    self.enter("remove_cart_item").await?;
    let mut state = self.state.lock();
    let before = state.cart.len();
    state.cart.retain(|l| l.id != item_id);
    if state.cart.len() == before {
      return Err(not_found("remove_cart_item", "Cart item"));
    }
    Ok(())
  }

  async fn clear_cart(&self) -> Result<(), StoreError> {
    self.enter("clear_cart").await?;
    self.state.lock().cart.clear();
    Ok(())
  }

  async fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutResponse, StoreError> {
    CHECKOUT_CALLS.fetch_add(1, Ordering::SeqCst);
    self.enter("checkout").await?;
    let mut state = self.state.lock();
    state.checkout_requests.push(request.clone());
    let mut orders = Vec::new();
    for sub in &request.restaurants {
      let id = state.next_order_id;
      state.next_order_id += 1;
      let mut total = 0;
      let mut items = Vec::new();
      for line in &sub.items {
        let menu = state
          .menus
          .get(&line.menu_id)
          .cloned()
          .ok_or_else(|| not_found("checkout", "Menu"))?;
        total += menu.price * u64::from(line.quantity);
        items.push(OrderItem {
          menu_id: menu.id,
          name: Some(menu.name),
          quantity: line.quantity,
          price: menu.price,
        });
      }
      orders.push(Order {
        id,
        status: OrderStatus::Pending,
        total,
        restaurant: Some(restaurant_summary(sub.restaurant_id)),
        items,
        delivery_address: Some(request.delivery_address.clone()),
        payment_method: Some(request.payment_method),
        created_at: Some(chrono::Utc::now()),
      });
    }
    state.orders.extend(orders.iter().cloned());
    Ok(CheckoutResponse { orders })
  }

  async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
    self.enter("list_orders").await?;
    Ok(self.state.lock().orders.clone())
  }

  async fn get_order(&self, order_id: OrderId) -> Result<Order, StoreError> {
    self.enter("get_order").await?;
    self
      .state
      .lock()
      .orders
      .iter()
      .find(|o| o.id == order_id)
      .cloned()
      .ok_or_else(|| not_found("get_order", "Order"))
  }
}

/// A fully wired storefront over [`FakeApi`] with recording collaborators.
pub struct Harness {
  pub api: Arc<FakeApi>,
  pub storage: Arc<MemoryStorage>,
  pub notifier: Arc<RecordingNotifier>,
  pub navigator: Arc<RecordingNavigator>,
  pub store: Storefront,
}

impl Harness {
  pub fn signed_in() -> Self {
    Self::build(true)
  }

  pub fn signed_out() -> Self {
    Self::build(false)
  }

  fn build(with_token: bool) -> Self {
    setup_tracing();
    let api = Arc::new(FakeApi::new());
    let storage = Arc::new(MemoryStorage::new());
    if with_token {
      storage.set(TOKEN_KEY, TEST_TOKEN).expect("memory storage never fails");
    }
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let store = Storefront::new(
      api.clone(),
      storage.clone(),
      notifier.clone(),
      navigator.clone(),
    )
    .expect("storefront wiring");
    Self {
      api,
      storage,
      notifier,
      navigator,
      store,
    }
  }

  pub fn toast_messages(&self) -> Vec<String> {
    self.notifier.toasts().into_iter().map(|t| t.message).collect()
  }
}
