// feastly/src/storage.rs

//! Client-side persisted key-value storage.
//!
//! The front end owns the backend (browser storage, a file, a keychain); the
//! library only needs string get/set/remove. Values that are not plain strings
//! go through [`get_json`] and [`set_json`].

use crate::error::{Result, StoreError};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Bearer token attached to every API request.
pub const TOKEN_KEY: &str = "token";
/// Summary of the most recent checkout, read by the confirmation screen.
pub const LAST_ORDER_KEY: &str = "lastOrder";

pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;
  fn set(&self, key: &str, value: &str) -> Result<()>;
  fn remove(&self, key: &str) -> Result<()>;
}

pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
  match store.get(key)? {
    Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
    None => Ok(None),
  }
}

pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
  let raw = serde_json::to_string(value)?;
  store.set(key, &raw)
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
  entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.lock().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.entries.lock().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self.entries.lock().remove(key);
    Ok(())
  }
}

/// Stores every key in one JSON object on disk.
///
/// The whole file is read and rewritten on each change; writes go to a sibling
/// temporary file first and are renamed into place.
#[derive(Debug)]
pub struct FileStorage {
  path: PathBuf,
  io_lock: Mutex<()>,
}

impl FileStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      io_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<BTreeMap<String, String>> {
    match std::fs::read_to_string(&self.path) {
      Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
      Ok(raw) => Ok(serde_json::from_str(&raw)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
      Err(e) => Err(StoreError::Storage(format!(
        "Failed to read {}: {}",
        self.path.display(),
        e
      ))),
    }
  }

  fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)
        .map_err(|e| StoreError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    let tmp_path = self.path.with_extension("json.tmp");
    let raw = serde_json::to_string_pretty(entries)?;
    std::fs::write(&tmp_path, raw)
      .map_err(|e| StoreError::Storage(format!("Failed to write {}: {}", tmp_path.display(), e)))?;
    std::fs::rename(&tmp_path, &self.path)
      .map_err(|e| StoreError::Storage(format!("Failed to replace {}: {}", self.path.display(), e)))
  }
}

impl KeyValueStore for FileStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let _guard = self.io_lock.lock();
    Ok(self.load()?.remove(key))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let _guard = self.io_lock.lock();
    let mut entries = self.load()?;
    entries.insert(key.to_string(), value.to_string());
    self.save(&entries)
  }

  fn remove(&self, key: &str) -> Result<()> {
    let _guard = self.io_lock.lock();
    let mut entries = self.load()?;
    if entries.remove(key).is_some() {
      self.save(&entries)?;
    }
    Ok(())
  }
}
