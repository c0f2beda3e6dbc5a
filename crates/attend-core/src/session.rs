//! Session store: the bearer token and the signed-in user.
//!
//! The token is opaque: it is stored, persisted and handed to the gateway,
//! never inspected. Persistence goes through a [`TokenStorage`] backend so the
//! token survives process restarts.

use std::{
  io,
  sync::{Mutex, PoisonError, RwLock},
};

use crate::user::User;

// ─── Storage ─────────────────────────────────────────────────────────────────

/// Where a token lives between processes.
pub trait TokenStorage: Send + Sync {
  /// Read the persisted token, if any.
  fn load(&self) -> io::Result<Option<String>>;

  /// Persist `token`, or remove the persisted copy when `None`.
  fn store(&self, token: Option<&str>) -> io::Result<()>;
}

/// Process-local storage; nothing outlives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
  token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
  pub fn new() -> Self { Self::default() }

  /// Storage that already holds `token`, as if persisted by an earlier run.
  pub fn with_token(token: impl Into<String>) -> Self {
    Self { token: Mutex::new(Some(token.into())) }
  }
}

impl TokenStorage for MemoryTokenStorage {
  fn load(&self) -> io::Result<Option<String>> {
    Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
  }

  fn store(&self, token: Option<&str>) -> io::Result<()> {
    *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token.map(str::to_string);
    Ok(())
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Holds the current credential and user identity.
///
/// Shared behind an `Arc` by the gateway (which reads the token) and the
/// authenticator (which writes it).
pub struct SessionStore {
  storage: Box<dyn TokenStorage>,
  token:   RwLock<Option<String>>,
  user:    RwLock<Option<User>>,
}

impl SessionStore {
  pub fn new(storage: impl TokenStorage + 'static) -> Self {
    Self {
      storage: Box::new(storage),
      token:   RwLock::new(None),
      user:    RwLock::new(None),
    }
  }

  /// A session with no persistence at all.
  pub fn in_memory() -> Self { Self::new(MemoryTokenStorage::new()) }

  /// Set or clear the credential and persist the change.
  ///
  /// Clearing takes effect immediately: the next gateway call goes out
  /// without an `Authorization` header. Persistence failures are logged.
  pub fn set_token(&self, token: Option<String>) {
    if let Err(e) = self.storage.store(token.as_deref()) {
      tracing::warn!(error = %e, "failed to persist session token");
    }
    *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
  }

  /// The current credential, falling back to persisted storage when the
  /// in-memory copy is unset.
  pub fn token(&self) -> Option<String> {
    if let Some(token) = self.token.read().unwrap_or_else(PoisonError::into_inner).clone() {
      return Some(token);
    }
    let loaded = match self.storage.load() {
      Ok(token) => token,
      Err(e) => {
        tracing::warn!(error = %e, "failed to read persisted session token");
        None
      }
    };
    if let Some(token) = &loaded {
      *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
    }
    loaded
  }

  pub fn user(&self) -> Option<User> {
    self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn set_user(&self, user: Option<User>) {
    *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
  }

  /// Forget both the user and the token.
  pub fn clear(&self) {
    self.set_user(None);
    self.set_token(None);
  }
}

impl std::fmt::Debug for SessionStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SessionStore")
      .field("has_token", &self.token.read().unwrap_or_else(PoisonError::into_inner).is_some())
      .field("user", &self.user())
      .finish()
  }
}
