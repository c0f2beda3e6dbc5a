//! Subject: a course or category the user tracks attendance for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A subject as returned by the backend. Identity is `id`, an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:         String,
  pub user_id:    String,
  pub name:       String,
  /// Display colour (e.g. `#8B5CF6`); never interpreted by the client.
  pub color:      String,
  #[serde(deserialize_with = "crate::timestamp::deserialize")]
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::gateway::Gateway::create_subject`].
///
/// When `color` is `None` the backend picks one from its palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
  pub name:  String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
}

impl NewSubject {
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), color: None }
  }

  pub fn with_color(mut self, color: impl Into<String>) -> Self {
    self.color = Some(color.into());
    self
  }
}
