// tests/storage_config_tests.rs
mod common;

use common::*;
use feastly::cache::{QueryCache, QueryKey};
use feastly::config::{DEFAULT_STORAGE_PATH, DEFAULT_TIMEOUT_SECS};
use feastly::models::User;
use feastly::state::Store;
use feastly::storage::{get_json, set_json, FileStorage, KeyValueStore, TOKEN_KEY};
use feastly::{ClientConfig, StoreError};
use serial_test::serial;
use std::time::Duration;

#[test]
fn test_file_storage_survives_reopening() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("storage.json");

  let storage = FileStorage::new(&path);
  assert_eq!(storage.get(TOKEN_KEY).unwrap(), None, "missing file reads as empty");
  storage.set(TOKEN_KEY, "abc").unwrap();
  set_json(&storage, "profile", &test_user()).unwrap();

  let reopened = FileStorage::new(&path);
  assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
  let user: Option<User> = get_json(&reopened, "profile").unwrap();
  assert_eq!(user, Some(test_user()));

  reopened.remove(TOKEN_KEY).unwrap();
  assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
  assert_eq!(storage.path(), path.as_path());
}

#[test]
fn test_corrupt_storage_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("storage.json");
  std::fs::write(&path, "{not json").unwrap();

  let err = FileStorage::new(&path).get(TOKEN_KEY).unwrap_err();
  assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
#[serial]
fn test_config_from_env() {
  std::env::set_var("FEASTLY_API_BASE_URL", "https://api.feastly.test/v1/");
  std::env::remove_var("FEASTLY_REQUEST_TIMEOUT_SECS");
  std::env::remove_var("FEASTLY_STORAGE_PATH");

  let config = ClientConfig::from_env().expect("config");
  assert_eq!(config.api_base_url, "https://api.feastly.test/v1");
  assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
  assert_eq!(config.storage_path, std::path::PathBuf::from(DEFAULT_STORAGE_PATH));

  std::env::set_var("FEASTLY_REQUEST_TIMEOUT_SECS", "0");
  assert!(matches!(ClientConfig::from_env(), Err(StoreError::Config(_))));

  std::env::set_var("FEASTLY_REQUEST_TIMEOUT_SECS", "5");
  std::env::set_var("FEASTLY_API_BASE_URL", "not a url");
  assert!(matches!(ClientConfig::from_env(), Err(StoreError::Config(_))));

  std::env::remove_var("FEASTLY_API_BASE_URL");
  std::env::remove_var("FEASTLY_REQUEST_TIMEOUT_SECS");
}

#[test]
fn test_cache_invalidation_and_versions() {
  let cache = QueryCache::new();
  assert!(cache.is_stale(&QueryKey::Orders));

  cache.set(QueryKey::Orders, vec![1u64, 2, 3]);
  let v1 = cache.version(&QueryKey::Orders);
  assert!(!cache.is_stale(&QueryKey::Orders));
  assert_eq!(cache.get_fresh::<Vec<u64>>(&QueryKey::Orders).as_deref(), Some(&vec![1, 2, 3]));
  assert!(cache.get::<String>(&QueryKey::Orders).is_none(), "wrong type reads as absent");

  assert!(cache.invalidate(&QueryKey::Orders));
  assert!(cache.version(&QueryKey::Orders) > v1);
  assert!(cache.get_fresh::<Vec<u64>>(&QueryKey::Orders).is_none());
  assert!(cache.get::<Vec<u64>>(&QueryKey::Orders).is_some(), "stale value stays readable");

  assert!(!cache.invalidate(&QueryKey::Profile));

  cache.set(QueryKey::Restaurants("a".into()), 1u8);
  cache.set(QueryKey::Restaurants("b".into()), 2u8);
  cache.set(QueryKey::Restaurant(1), 3u8);
  assert_eq!(cache.invalidate_where(|k| matches!(k, QueryKey::Restaurants(_))), 2);
  assert!(!cache.is_stale(&QueryKey::Restaurant(1)));

  cache.clear();
  assert!(cache.get::<u8>(&QueryKey::Restaurant(1)).is_none());
}

#[test]
fn test_cache_entries_age_out() {
  let cache = QueryCache::with_stale_after(Duration::from_millis(0));
  cache.set(QueryKey::Cart, 1u32);
  assert!(cache.is_stale(&QueryKey::Cart));
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Counter {
  value: i64,
}

enum CounterAction {
  Add(i64),
  Reset,
}

fn reduce_counter(state: &Counter, action: CounterAction) -> Counter {
  match action {
    CounterAction::Add(n) => Counter { value: state.value + n },
    CounterAction::Reset => Counter::default(),
  }
}

#[test]
fn test_store_dispatch_is_versioned() {
  let store = Store::new(Counter::default(), reduce_counter);
  assert_eq!(store.version(), 0);

  assert_eq!(store.dispatch(CounterAction::Add(5)), 1);
  assert_eq!(store.dispatch(CounterAction::Add(-2)), 2);
  assert_eq!(store.select(|c| c.value), 3);

  store.dispatch(CounterAction::Reset);
  assert_eq!(store.state(), Counter::default());
  assert_eq!(store.version(), 3);
}
