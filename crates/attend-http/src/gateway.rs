//! [`HttpGateway`]: the attend backend over JSON/HTTP.
//!
//! Every exchange funnels through [`HttpGateway::request`], which attaches
//! the session's bearer token and reduces any failure to a
//! [`GatewayError`] message:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | server unreachable, or unreadable success body | `Err("Failed to connect to backend")` |
//! | non-2xx status | `Err(<detail / error / message>)`, else `Err("Request failed")` |
//! | 2xx | `Ok(<decoded body>)`; an empty body decodes as JSON `null` |

use std::{sync::Arc, time::Duration};

use attend_core::{
  attendance::{AttendanceEntry, MarkAttendance, ServerStats},
  error::{GatewayError, GatewayResult, REQUEST_FAILED},
  gateway::Gateway,
  session::SessionStore,
  subject::{NewSubject, Subject},
  user::{AuthGrant, Credentials, Registration, User},
};
use reqwest::{Client, Method, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub base_url: String,
  /// Per-request timeout. `None` leaves requests unbounded.
  pub timeout:  Option<Duration>,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_string(), timeout: None }
  }
}

/// Async HTTP client for the attendance REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] and session are `Arc`-based.
#[derive(Clone)]
pub struct HttpGateway {
  client:   Client,
  base_url: String,
  session:  Arc<SessionStore>,
}

impl HttpGateway {
  pub fn new(config: GatewayConfig, session: Arc<SessionStore>) -> reqwest::Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    Ok(Self {
      client: builder.build()?,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      session,
    })
  }

  pub fn session(&self) -> &Arc<SessionStore> { &self.session }

  fn url(&self, endpoint: &str) -> String { format!("{}{}", self.base_url, endpoint) }

  /// Send one request and decode its JSON answer.
  pub async fn request<T: DeserializeOwned>(
    &self,
    method: Method,
    endpoint: &str,
    body: Option<Value>,
  ) -> GatewayResult<T> {
    let mut req = self
      .client
      .request(method.clone(), self.url(endpoint))
      .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = self.session.token() {
      req = req.bearer_auth(token);
    }
    if let Some(body) = &body {
      req = req.json(body);
    }

    tracing::debug!(%method, endpoint, "sending request");
    let resp = req.send().await.map_err(|e| {
      tracing::warn!(%method, endpoint, error = %e, "request failed to send");
      GatewayError::connect()
    })?;

    let status = resp.status();
    let bytes = resp.bytes().await.map_err(|e| {
      tracing::warn!(%method, endpoint, error = %e, "failed to read response body");
      GatewayError::connect()
    })?;

    if !status.is_success() {
      let message = error_message(&bytes);
      tracing::debug!(%method, endpoint, %status, %message, "request rejected");
      return Err(GatewayError::new(message));
    }

    let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
      serde_json::from_value(Value::Null)
    } else {
      serde_json::from_slice(&bytes)
    };
    decoded.map_err(|e| {
      tracing::warn!(%method, endpoint, error = %e, "undecodable response body");
      GatewayError::connect()
    })
  }

  async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> GatewayResult<T> {
    self.request(Method::GET, endpoint, None).await
  }

  async fn post<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    body: &impl Serialize,
  ) -> GatewayResult<T> {
    let body = serde_json::to_value(body)
      .map_err(|e| GatewayError::new(format!("invalid request body: {e}")))?;
    self.request(Method::POST, endpoint, Some(body)).await
  }
}

/// Pull a human-readable message out of an error payload.
///
/// FastAPI-style backends put it in `detail`, either as a string or as a list
/// of validation errors with a `msg` each.
fn error_message(body: &[u8]) -> String {
  serde_json::from_slice::<Value>(body)
    .ok()
    .and_then(|payload| {
      ["detail", "error", "message"]
        .iter()
        .find_map(|key| payload.get(key).and_then(message_from))
    })
    .unwrap_or_else(|| REQUEST_FAILED.to_string())
}

fn message_from(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
    Value::Array(items) => {
      let messages: Vec<&str> = items
        .iter()
        .filter_map(|item| item.get("msg").and_then(Value::as_str).or(item.as_str()))
        .collect();
      (!messages.is_empty()).then(|| messages.join("; "))
    }
    _ => None,
  }
}

impl Gateway for HttpGateway {
  // ── Auth ──────────────────────────────────────────────────────────────────

  async fn register(&self, registration: Registration) -> GatewayResult<AuthGrant> {
    self.post("/api/auth/register", &registration).await
  }

  async fn login(&self, credentials: Credentials) -> GatewayResult<AuthGrant> {
    self.post("/api/auth/login", &credentials).await
  }

  async fn current_user(&self) -> GatewayResult<User> { self.get("/api/auth/me").await }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn list_subjects(&self) -> GatewayResult<Vec<Subject>> {
    self.get("/api/subjects").await
  }

  async fn create_subject(&self, subject: NewSubject) -> GatewayResult<Subject> {
    self.post("/api/subjects", &subject).await
  }

  async fn delete_subject(&self, id: String) -> GatewayResult<()> {
    self
      .request::<Value>(Method::DELETE, &format!("/api/subjects/{id}"), None)
      .await
      .map(drop)
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn list_attendance(&self, subject_id: String) -> GatewayResult<Vec<AttendanceEntry>> {
    self.get(&format!("/api/attendance/{subject_id}")).await
  }

  async fn mark_attendance(&self, mark: MarkAttendance) -> GatewayResult<AttendanceEntry> {
    self.post("/api/attendance", &mark).await
  }

  async fn attendance_stats(&self, subject_id: String) -> GatewayResult<ServerStats> {
    self.get(&format!("/api/attendance/{subject_id}/stats")).await
  }
}
