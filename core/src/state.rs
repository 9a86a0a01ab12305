// feastly/src/state.rs

//! Explicit state containers: a state value, an action type, and a pure reducer.
//!
//! Every change goes through [`Store::dispatch`], which replaces the state with
//! `reducer(&old, action)` and bumps a version number. Consumers compare
//! versions to know when to re-read.

use parking_lot::RwLock;
use std::marker::PhantomData;

pub type Reducer<S, A> = fn(&S, A) -> S;

struct Versioned<S> {
  state: S,
  version: u64,
}

pub struct Store<S, A>
where
  S: Send + Sync + 'static,
{
  inner: RwLock<Versioned<S>>,
  reducer: Reducer<S, A>,
  _action: PhantomData<fn(A)>,
}

impl<S, A> Store<S, A>
where
  S: Send + Sync + 'static,
{
  pub fn new(initial: S, reducer: Reducer<S, A>) -> Self {
    Self {
      inner: RwLock::new(Versioned {
        state: initial,
        version: 0,
      }),
      reducer,
      _action: PhantomData,
    }
  }

  /// Applies `action` and returns the new version.
  pub fn dispatch(&self, action: A) -> u64 {
    let mut guard = self.inner.write();
    let next = (self.reducer)(&guard.state, action);
    guard.state = next;
    guard.version += 1;
    guard.version
  }

  /// Applies `action` and reads the resulting state under the same lock, so no
  /// other dispatch can land in between.
  pub fn dispatch_with<R>(&self, action: A, f: impl FnOnce(&S) -> R) -> R {
    let mut guard = self.inner.write();
    let next = (self.reducer)(&guard.state, action);
    guard.state = next;
    guard.version += 1;
    f(&guard.state)
  }

  /// Reads a projection of the current state without cloning all of it.
  pub fn select<R>(&self, f: impl FnOnce(&S) -> R) -> R {
    f(&self.inner.read().state)
  }

  pub fn version(&self) -> u64 {
    self.inner.read().version
  }
}

impl<S, A> Store<S, A>
where
  S: Clone + Send + Sync + 'static,
{
  pub fn state(&self) -> S {
    self.inner.read().state.clone()
  }
}

impl<S, A> std::fmt::Debug for Store<S, A>
where
  S: std::fmt::Debug + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let guard = self.inner.read();
    f.debug_struct("Store")
      .field("state", &guard.state)
      .field("version", &guard.version)
      .finish()
  }
}
