//! Error types for `attend-core`.

use thiserror::Error;

/// Message used for every failure to reach (or understand) the backend.
pub const CONNECT_FAILED: &str = "Failed to connect to backend";

/// Message used when the backend rejects a request without saying why.
pub const REQUEST_FAILED: &str = "Request failed";

/// A failed gateway exchange, reduced to a human-readable message.
///
/// Transport failures and application errors deliberately share this one
/// shape; callers never need to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct GatewayError(pub String);

impl GatewayError {
  pub fn new(message: impl Into<String>) -> Self { Self(message.into()) }

  /// The backend could not be reached or sent something unreadable.
  pub fn connect() -> Self { Self(CONNECT_FAILED.to_string()) }

  pub fn message(&self) -> &str { &self.0 }
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Not authenticated")]
  NotAuthenticated,

  #[error("Subject name cannot be empty")]
  EmptySubjectName,

  #[error(transparent)]
  Gateway(#[from] GatewayError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
