// feastly/src/cache.rs

//! Query cache keyed by resource identity.
//!
//! Values are type-erased so one cache serves every resource. Successful
//! writes invalidate the keys they affect; readers refetch anything stale.
//! Nothing here talks to the network.

use crate::models::{OrderId, RestaurantId};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
  Cart,
  /// Restaurant listing for one encoded filter query string.
  Restaurants(String),
  Restaurant(RestaurantId),
  Menu(RestaurantId),
  Reviews(RestaurantId),
  Orders,
  Order(OrderId),
  Profile,
}

struct CacheEntry {
  value: Arc<dyn Any + Send + Sync>,
  stored_at: Instant,
  stale: bool,
}

#[derive(Default)]
struct CacheInner {
  entries: HashMap<QueryKey, CacheEntry>,
  versions: HashMap<QueryKey, u64>,
}

impl CacheInner {
  fn bump(&mut self, key: &QueryKey) -> u64 {
    let v = self.versions.entry(key.clone()).or_insert(0);
    *v += 1;
    *v
  }
}

#[derive(Default)]
pub struct QueryCache {
  inner: Mutex<CacheInner>,
  stale_after: Option<Duration>,
}

impl QueryCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Entries older than `age` count as stale even if never invalidated.
  pub fn with_stale_after(age: Duration) -> Self {
    Self {
      inner: Mutex::new(CacheInner::default()),
      stale_after: Some(age),
    }
  }

  /// Returns the cached value, stale or not. A value stored under `key` with
  /// another type reads as absent.
  pub fn get<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Arc<T>> {
    let inner = self.inner.lock();
    let entry = inner.entries.get(key)?;
    match Arc::clone(&entry.value).downcast::<T>() {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(?key, expected = std::any::type_name::<T>(), "Cache entry holds a different type.");
        None
      }
    }
  }

  /// Like [`QueryCache::get`] but only when the entry is fresh.
  pub fn get_fresh<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Arc<T>> {
    if self.is_stale(key) {
      return None;
    }
    self.get(key)
  }

  pub fn set<T: Any + Send + Sync>(&self, key: QueryKey, value: T) -> Arc<T> {
    self.set_shared(key, Arc::new(value))
  }

  /// Stores a value the caller already shares, so the cache and the caller hold the same allocation.
  pub fn set_shared<T: Any + Send + Sync>(&self, key: QueryKey, value: Arc<T>) -> Arc<T> {
    let mut inner = self.inner.lock();
    inner.bump(&key);
    inner.entries.insert(
      key,
      CacheEntry {
        value: Arc::clone(&value) as Arc<dyn Any + Send + Sync>,
        stored_at: Instant::now(),
        stale: false,
      },
    );
    value
  }

  /// Missing entries are stale.
  pub fn is_stale(&self, key: &QueryKey) -> bool {
    let inner = self.inner.lock();
    match inner.entries.get(key) {
      Some(entry) => entry.stale || self.stale_after.is_some_and(|age| entry.stored_at.elapsed() >= age),
      None => true,
    }
  }

  /// Marks `key` stale but keeps its value readable. Returns whether an entry existed.
  pub fn invalidate(&self, key: &QueryKey) -> bool {
    let mut inner = self.inner.lock();
    let existed = match inner.entries.get_mut(key) {
      Some(entry) => {
        entry.stale = true;
        true
      }
      None => false,
    };
    inner.bump(key);
    tracing::debug!(?key, existed, "Cache key invalidated.");
    existed
  }

  /// Invalidates every key matching `pred` and returns how many were marked.
  pub fn invalidate_where(&self, pred: impl Fn(&QueryKey) -> bool) -> usize {
    let mut inner = self.inner.lock();
    let keys: Vec<QueryKey> = inner.entries.keys().filter(|k| pred(*k)).cloned().collect();
    for key in &keys {
      if let Some(entry) = inner.entries.get_mut(key) {
        entry.stale = true;
      }
      inner.bump(key);
    }
    keys.len()
  }

  pub fn remove(&self, key: &QueryKey) {
    let mut inner = self.inner.lock();
    if inner.entries.remove(key).is_some() {
      inner.bump(key);
    }
  }

  /// Drops every entry, e.g. on sign-out.
  pub fn clear(&self) {
    let mut inner = self.inner.lock();
    let keys: Vec<QueryKey> = inner.entries.keys().cloned().collect();
    inner.entries.clear();
    for key in &keys {
      inner.bump(key);
    }
  }

  /// Increases on every store, invalidation or removal of `key`.
  pub fn version(&self, key: &QueryKey) -> u64 {
    self.inner.lock().versions.get(key).copied().unwrap_or(0)
  }
}

impl std::fmt::Debug for QueryCache {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("QueryCache")
      .field("keys", &inner.entries.keys().collect::<Vec<_>>())
      .field("stale_after", &self.stale_after)
      .finish()
  }
}
