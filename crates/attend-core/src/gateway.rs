//! The `Gateway` trait: every network exchange the client makes.
//!
//! Implemented over HTTP by `attend-http`. Higher layers (`registry`,
//! `ledger`, `auth`) depend on this abstraction, never on a transport.
//!
//! Every method resolves to a [`GatewayResult`]: failures to reach the
//! backend and errors reported by it arrive in the same shape, a
//! [`GatewayError`](crate::GatewayError) carrying a human-readable message.

use std::future::Future;

use crate::{
  attendance::{AttendanceEntry, MarkAttendance, ServerStats},
  error::GatewayResult,
  subject::{NewSubject, Subject},
  user::{AuthGrant, Credentials, Registration, User},
};

/// Abstraction over the attendance backend.
///
/// All methods return `Send` futures so implementations can be shared across
/// tasks in a multi-threaded tokio runtime.
pub trait Gateway: Send + Sync {
  // ── Auth ──────────────────────────────────────────────────────────────

  /// `POST /api/auth/register`
  fn register(
    &self,
    registration: Registration,
  ) -> impl Future<Output = GatewayResult<AuthGrant>> + Send + '_;

  /// `POST /api/auth/login`
  fn login(
    &self,
    credentials: Credentials,
  ) -> impl Future<Output = GatewayResult<AuthGrant>> + Send + '_;

  /// `GET /api/auth/me`: the user the current token belongs to.
  fn current_user(&self) -> impl Future<Output = GatewayResult<User>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// `GET /api/subjects`
  fn list_subjects(
    &self,
  ) -> impl Future<Output = GatewayResult<Vec<Subject>>> + Send + '_;

  /// `POST /api/subjects`
  fn create_subject(
    &self,
    subject: NewSubject,
  ) -> impl Future<Output = GatewayResult<Subject>> + Send + '_;

  /// `DELETE /api/subjects/{id}`: the backend also drops the subject's
  /// attendance records.
  fn delete_subject(
    &self,
    id: String,
  ) -> impl Future<Output = GatewayResult<()>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// `GET /api/attendance/{subject_id}`
  fn list_attendance(
    &self,
    subject_id: String,
  ) -> impl Future<Output = GatewayResult<Vec<AttendanceEntry>>> + Send + '_;

  /// `POST /api/attendance`: the backend upserts by `(subject_id, date)`.
  fn mark_attendance(
    &self,
    mark: MarkAttendance,
  ) -> impl Future<Output = GatewayResult<AttendanceEntry>> + Send + '_;

  /// `GET /api/attendance/{subject_id}/stats`
  fn attendance_stats(
    &self,
    subject_id: String,
  ) -> impl Future<Output = GatewayResult<ServerStats>> + Send + '_;
}
