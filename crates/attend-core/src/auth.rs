//! Sign-in, sign-up, sign-out and startup session restore.

use std::sync::Arc;

use crate::{
  Result,
  gateway::Gateway,
  session::SessionStore,
  user::{AuthGrant, Credentials, Registration, User},
};

/// Drives the auth endpoints and keeps the [`SessionStore`] in step.
pub struct Authenticator<G> {
  gateway: Arc<G>,
  session: Arc<SessionStore>,
}

impl<G: Gateway> Authenticator<G> {
  pub fn new(gateway: Arc<G>, session: Arc<SessionStore>) -> Self {
    Self { gateway, session }
  }

  pub fn session(&self) -> &SessionStore { &self.session }

  /// The signed-in user, if any.
  pub fn user(&self) -> Option<User> { self.session.user() }

  /// Log in and remember the issued token.
  pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
    let grant = self
      .gateway
      .login(Credentials {
        email:    email.to_string(),
        password: password.to_string(),
      })
      .await?;
    Ok(self.accept(grant))
  }

  /// Create an account and sign straight into it.
  pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User> {
    let grant = self
      .gateway
      .register(Registration {
        name:     name.to_string(),
        email:    email.to_string(),
        password: password.to_string(),
      })
      .await?;
    Ok(self.accept(grant))
  }

  pub fn sign_out(&self) { self.session.clear(); }

  /// Re-establish the user from a persisted token.
  ///
  /// Returns `None` when there is no token. A token the backend no longer
  /// accepts (or cannot be checked) is discarded.
  pub async fn restore(&self) -> Option<User> {
    self.session.token()?;
    match self.gateway.current_user().await {
      Ok(user) => {
        self.session.set_user(Some(user.clone()));
        Some(user)
      }
      Err(e) => {
        tracing::warn!(error = %e, "stored session rejected; signing out");
        self.session.clear();
        None
      }
    }
  }

  fn accept(&self, grant: AuthGrant) -> User {
    self.session.set_token(Some(grant.access_token));
    self.session.set_user(Some(grant.user.clone()));
    tracing::debug!(user = %grant.user.email, "signed in");
    grant.user
  }
}
