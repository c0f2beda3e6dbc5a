//! User identity and the authentication payloads exchanged with the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:         String,
  pub email:      String,
  pub name:       String,
  #[serde(deserialize_with = "crate::timestamp::deserialize")]
  pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

/// Successful login or registration: a bearer token and who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGrant {
  pub access_token: String,
  #[serde(default = "bearer")]
  pub token_type:   String,
  pub user:         User,
}

fn bearer() -> String { "bearer".to_string() }
