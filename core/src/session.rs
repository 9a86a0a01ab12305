// feastly/src/session.rs

//! Authentication state.
//!
//! The bearer token lives in client storage so it survives restarts; the
//! in-memory [`AuthState`] mirrors it and is only changed through
//! [`reduce_auth`].

use crate::api::StorefrontApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{Result, StoreError};
use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest, User};
use crate::state::Store;
use crate::storage::{KeyValueStore, TOKEN_KEY};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
  pub token: Option<String>,
  pub user: Option<User>,
}

#[derive(Debug, Clone)]
pub enum AuthAction {
  /// Token found in storage at startup; the user is loaded later.
  Restored { token: String },
  SignedIn { token: String, user: User },
  UserLoaded(User),
  SignedOut,
}

pub fn reduce_auth(state: &AuthState, action: AuthAction) -> AuthState {
  match action {
    AuthAction::Restored { token } => AuthState {
      token: Some(token),
      user: state.user.clone(),
    },
    AuthAction::SignedIn { token, user } => AuthState {
      token: Some(token),
      user: Some(user),
    },
    AuthAction::UserLoaded(user) => AuthState {
      token: state.token.clone(),
      user: Some(user),
    },
    AuthAction::SignedOut => AuthState::default(),
  }
}

type SignOutHook = Box<dyn Fn() + Send + Sync>;

pub struct Session {
  api: Arc<dyn StorefrontApi>,
  storage: Arc<dyn KeyValueStore>,
  cache: Arc<QueryCache>,
  state: Store<AuthState, AuthAction>,
  sign_out_hooks: RwLock<Vec<SignOutHook>>,
}

impl Session {
  /// Picks up a token left in storage by a previous run.
  pub fn new(api: Arc<dyn StorefrontApi>, storage: Arc<dyn KeyValueStore>, cache: Arc<QueryCache>) -> Result<Self> {
    let state = Store::new(AuthState::default(), reduce_auth);
    if let Some(token) = storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
      state.dispatch(AuthAction::Restored { token });
    }
    Ok(Self {
      api,
      storage,
      cache,
      state,
      sign_out_hooks: RwLock::new(Vec::new()),
    })
  }

  /// Runs `hook` after every sign-out, whether asked for or forced by a rejected token.
  pub fn on_sign_out(&self, hook: impl Fn() + Send + Sync + 'static) {
    self.sign_out_hooks.write().push(Box::new(hook));
  }

  pub fn is_authenticated(&self) -> bool {
    self.state.select(|s| s.token.is_some())
  }

  pub fn user(&self) -> Option<User> {
    self.state.select(|s| s.user.clone())
  }

  pub fn state(&self) -> AuthState {
    self.state.state()
  }

  #[instrument(name = "Session::login", skip(self, password), err)]
  pub async fn login(&self, email: &str, password: &str) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
      return Err(StoreError::Validation("Email and password are required.".to_string()));
    }
    let response = self
      .api
      .login(&LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
      })
      .await?;
    self.establish(response.token, response.user)
  }

  #[instrument(name = "Session::register", skip(self, request), fields(email = %request.email), err)]
  pub async fn register(&self, request: RegisterRequest) -> Result<User> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
      return Err(StoreError::Validation("Name and email are required.".to_string()));
    }
    if request.password.chars().count() < 6 {
      return Err(StoreError::Validation(
        "Password must be at least 6 characters.".to_string(),
      ));
    }
    let response = self.api.register(&request).await?;
    self.establish(response.token, response.user)
  }

  fn establish(&self, token: String, user: User) -> Result<User> {
    self.storage.set(TOKEN_KEY, &token)?;
    self.cache.set(QueryKey::Profile, user.clone());
    self.state.dispatch(AuthAction::SignedIn {
      token,
      user: user.clone(),
    });
    info!(user_id = user.id, "Signed in.");
    Ok(user)
  }

  /// Fetches the signed-in user. A rejected token signs the session out locally.
  #[instrument(name = "Session::load_user", skip(self), err)]
  pub async fn load_user(&self) -> Result<User> {
    if !self.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    if let Some(user) = self.cache.get_fresh::<User>(&QueryKey::Profile) {
      return Ok((*user).clone());
    }
    match self.api.current_user().await {
      Ok(user) => {
        self.cache.set(QueryKey::Profile, user.clone());
        self.state.dispatch(AuthAction::UserLoaded(user.clone()));
        Ok(user)
      }
      Err(StoreError::Unauthenticated) => {
        warn!("Stored token was rejected; signing out.");
        self.logout()?;
        Err(StoreError::Unauthenticated)
      }
      Err(e) => Err(e),
    }
  }

  #[instrument(name = "Session::update_profile", skip(self, update), err)]
  pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
    if !self.is_authenticated() {
      return Err(StoreError::Unauthenticated);
    }
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      return Err(StoreError::Validation("Name cannot be empty.".to_string()));
    }
    let user = self.api.update_profile(&update).await?;
    self.cache.set(QueryKey::Profile, user.clone());
    self.state.dispatch(AuthAction::UserLoaded(user.clone()));
    Ok(user)
  }

  /// Drops the token and every cached resource, then runs the sign-out hooks.
  pub fn logout(&self) -> Result<()> {
    self.storage.remove(TOKEN_KEY)?;
    self.cache.clear();
    self.state.dispatch(AuthAction::SignedOut);
    for hook in self.sign_out_hooks.read().iter() {
      hook();
    }
    info!("Signed out.");
    Ok(())
  }
}
