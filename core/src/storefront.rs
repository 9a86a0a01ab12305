// feastly/src/storefront.rs

//! Wires every component around one API client, one storage backend and one cache.

use crate::api::{HttpApi, StorefrontApi};
use crate::cache::QueryCache;
use crate::cart::{CartController, CartMutations, CartStore};
use crate::catalog::Catalog;
use crate::checkout::{CheckoutDeps, CheckoutOrchestrator};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::orders::Orders;
use crate::session::Session;
use crate::storage::{FileStorage, KeyValueStore};
use std::sync::Arc;

pub struct Storefront {
  pub session: Arc<Session>,
  pub cart: Arc<CartStore>,
  pub mutations: Arc<CartMutations>,
  pub controller: CartController,
  pub checkout: CheckoutOrchestrator,
  pub catalog: Catalog,
  pub orders: Orders,
  cache: Arc<QueryCache>,
}

impl Storefront {
  /// HTTP API plus file-backed storage, as configured.
  pub fn from_config(
    config: &ClientConfig,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
  ) -> Result<Self> {
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(config.storage_path.clone()));
    let api: Arc<dyn StorefrontApi> = Arc::new(HttpApi::new(config, Arc::clone(&storage))?);
    Self::new(api, storage, notifier, navigator)
  }

  pub fn new(
    api: Arc<dyn StorefrontApi>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
  ) -> Result<Self> {
    let cache = Arc::new(QueryCache::new());
    let session = Arc::new(Session::new(
      Arc::clone(&api),
      Arc::clone(&storage),
      Arc::clone(&cache),
    )?);
    let cart = Arc::new(CartStore::new(Arc::clone(&api), Arc::clone(&cache), Arc::clone(&session)));
    let signed_out_cart = Arc::downgrade(&cart);
    session.on_sign_out(move || {
      if let Some(cart) = signed_out_cart.upgrade() {
        cart.reset();
      }
    });
    let mutations = Arc::new(CartMutations::new(
      Arc::clone(&api),
      Arc::clone(&cart),
      Arc::clone(&notifier),
    ));
    let controller = CartController::new(Arc::clone(&mutations));
    let checkout = CheckoutOrchestrator::new(CheckoutDeps {
      api: Arc::clone(&api),
      cart: Arc::clone(&cart),
      mutations: Arc::clone(&mutations),
      cache: Arc::clone(&cache),
      storage: Arc::clone(&storage),
      notifier,
      navigator,
    });
    let catalog = Catalog::new(Arc::clone(&api), Arc::clone(&cache));
    let orders = Orders::new(api, Arc::clone(&cache), storage);

    Ok(Self {
      session,
      cart,
      mutations,
      controller,
      checkout,
      catalog,
      orders,
      cache,
    })
  }

  pub fn cache(&self) -> &Arc<QueryCache> {
    &self.cache
  }

  /// Signs out. The cart is forgotten by the session's sign-out hook.
  pub fn logout(&self) -> Result<()> {
    self.session.logout()
  }
}
