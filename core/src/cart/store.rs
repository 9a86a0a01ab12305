// feastly/src/cart/store.rs

use super::state::{reduce_cart, CartAction, CartState, FetchTicket};
use crate::api::StorefrontApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{Result, StoreError};
use crate::models::CartSnapshot;
use crate::session::Session;
use crate::state::Store;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Client-side view of the signed-in user's cart.
///
/// The server is the only authority. The store fetches, derives a
/// [`CartSnapshot`], and publishes it; it is enabled only while the session
/// holds a token.
pub struct CartStore {
  api: Arc<dyn StorefrontApi>,
  cache: Arc<QueryCache>,
  session: Arc<Session>,
  state: Store<CartState, CartAction>,
}

impl CartStore {
  pub fn new(api: Arc<dyn StorefrontApi>, cache: Arc<QueryCache>, session: Arc<Session>) -> Self {
    Self {
      api,
      cache,
      session,
      state: Store::new(CartState::default(), reduce_cart),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.session.is_authenticated()
  }

  /// Initial load. Does nothing while signed out.
  pub async fn mount(&self) -> Result<Option<Arc<CartSnapshot>>> {
    if !self.is_enabled() {
      debug!("Cart store mounted while signed out; skipping fetch.");
      return Ok(None);
    }
    self.fetch().await.map(Some)
  }

  /// Loads the cart from the server and replaces the published snapshot.
  ///
  /// On failure the previous snapshot stays readable and [`CartStore::error`]
  /// carries the message. When fetches overlap, the one started last wins: an
  /// older response landing late is neither published nor cached.
  #[instrument(name = "CartStore::fetch", skip_all, err)]
  pub async fn fetch(&self) -> Result<Arc<CartSnapshot>> {
    if !self.is_enabled() {
      return Err(StoreError::Unauthenticated);
    }

    let pending = PendingFetch::start(&self.state);
    match self.api.get_cart().await {
      Ok(items) => {
        let derived = Arc::new(CartSnapshot::from_items(items));
        info!(
          groups = derived.groups().len(),
          item_count = derived.item_count(),
          grand_total = derived.grand_total(),
          "Cart fetched."
        );
        Ok(pending.succeed(derived, &self.cache))
      }
      Err(e) => {
        error!(error = %e, "Cart fetch failed.");
        pending.fail(e.user_message());
        if matches!(e, StoreError::Unauthenticated) {
          self.sign_out_rejected();
        }
        Err(e)
      }
    }
  }

  /// Manual retry after a failed fetch.
  pub async fn retry(&self) -> Result<Arc<CartSnapshot>> {
    self.fetch().await
  }

  /// Refetches only if the cart cache entry is missing or stale.
  pub async fn refresh_if_stale(&self) -> Result<Option<Arc<CartSnapshot>>> {
    if !self.is_enabled() {
      return Ok(None);
    }
    if self.cache.is_stale(&QueryKey::Cart) {
      return self.fetch().await.map(Some);
    }
    Ok(self.cache.get::<CartSnapshot>(&QueryKey::Cart).or_else(|| self.snapshot()))
  }

  /// Marks the cached cart stale. The published snapshot stays until the next fetch.
  pub fn invalidate(&self) {
    self.cache.invalidate(&QueryKey::Cart);
  }

  /// The server no longer accepts the token. Signing out also resets this store.
  pub(crate) fn sign_out_rejected(&self) {
    warn!("Cart request was rejected; signing out.");
    if let Err(e) = self.session.logout() {
      error!(error = %e, "Sign-out after a rejected token failed.");
    }
  }

  /// Forgets the cart, e.g. after sign-out. In-flight fetches are discarded when they land.
  pub fn reset(&self) {
    self.state.dispatch(CartAction::Reset);
    self.cache.remove(&QueryKey::Cart);
  }

  pub fn snapshot(&self) -> Option<Arc<CartSnapshot>> {
    self.state.select(|s| s.snapshot.clone())
  }

  pub fn is_loading(&self) -> bool {
    self.state.select(CartState::is_loading)
  }

  pub fn is_updating(&self) -> bool {
    self.state.select(CartState::is_updating)
  }

  pub fn error(&self) -> Option<String> {
    self.state.select(|s| s.error.clone())
  }

  pub fn state(&self) -> CartState {
    self.state.state()
  }

  /// Changes on every state transition; consumers re-read when it moves.
  pub fn version(&self) -> u64 {
    self.state.version()
  }

  /// Marks a mutation as in flight until the returned guard is dropped.
  pub(crate) fn begin_mutation(&self) -> MutationInFlight<'_> {
    self.state.dispatch(CartAction::MutationStarted);
    MutationInFlight { state: &self.state }
  }
}

struct PendingFetch<'a> {
  state: &'a Store<CartState, CartAction>,
  ticket: FetchTicket,
  settled: bool,
}

impl<'a> PendingFetch<'a> {
  fn start(state: &'a Store<CartState, CartAction>) -> Self {
    let ticket = state.dispatch_with(CartAction::FetchStarted, CartState::current_ticket);
    Self {
      state,
      ticket,
      settled: false,
    }
  }

  /// Publishes and caches `snapshot` unless a later fetch or a reset got there
  /// first; the cache write happens under the state lock so the two agree.
  /// Returns whatever snapshot ends up published.
  fn succeed(mut self, snapshot: Arc<CartSnapshot>, cache: &QueryCache) -> Arc<CartSnapshot> {
    self.settled = true;
    let ticket = self.ticket;
    let action = CartAction::FetchSucceeded {
      snapshot: Arc::clone(&snapshot),
      at: chrono::Utc::now(),
      ticket,
    };
    self.state.dispatch_with(action, |s| {
      if s.generation == ticket.generation && s.applied_seq == ticket.seq {
        cache.set_shared(QueryKey::Cart, Arc::clone(&snapshot));
        return snapshot;
      }
      debug!(seq = ticket.seq, applied = s.applied_seq, "Cart fetch superseded; result not published.");
      s.snapshot.clone().unwrap_or(snapshot)
    })
  }

  fn fail(mut self, message: String) {
    self.settled = true;
    self.state.dispatch(CartAction::FetchFailed {
      message,
      ticket: self.ticket,
    });
  }
}

impl Drop for PendingFetch<'_> {
  fn drop(&mut self) {
    if !self.settled {
      self.state.dispatch(CartAction::FetchAborted);
    }
  }
}

pub(crate) struct MutationInFlight<'a> {
  state: &'a Store<CartState, CartAction>,
}

impl Drop for MutationInFlight<'_> {
  fn drop(&mut self) {
    self.state.dispatch(CartAction::MutationSettled);
  }
}
