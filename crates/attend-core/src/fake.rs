//! In-memory [`Gateway`] used by the unit tests.
//!
//! Behaves like the real backend (owner-scoped subjects, upsert on mark,
//! cascade on delete) and records every call it receives.

use std::{
  collections::{HashSet, VecDeque},
  sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::{
  attendance::{AttendanceEntry, MarkAttendance, ServerStats},
  error::{GatewayError, GatewayResult},
  gateway::Gateway,
  stats::AttendanceTally,
  subject::{NewSubject, Subject},
  user::{AuthGrant, Credentials, Registration, User},
};

pub(crate) const USER_ID: &str = "user-1";

const PALETTE: [&str; 4] = ["#8B5CF6", "#EC4899", "#F59E0B", "#10B981"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
  Register,
  Login,
  CurrentUser,
  ListSubjects,
  CreateSubject(String),
  DeleteSubject(String),
  ListAttendance(String),
  MarkAttendance(MarkAttendance),
  AttendanceStats(String),
}

#[derive(Default)]
struct Inner {
  subjects:         Vec<Subject>,
  attendance:       Vec<AttendanceEntry>,
  calls:            Vec<Call>,
  failures:         VecDeque<GatewayError>,
  failing_subjects: HashSet<String>,
  gate:             Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub(crate) struct FakeGateway {
  inner: Mutex<Inner>,
}

pub(crate) fn user() -> User {
  User {
    id:         USER_ID.to_string(),
    email:      "ada@example.com".to_string(),
    name:       "Ada".to_string(),
    created_at: Utc::now(),
  }
}

impl FakeGateway {
  pub(crate) fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> { self.inner.lock().unwrap() }

  /// Insert a subject directly into the backend, bypassing the client.
  pub(crate) fn seed_subject(&self, id: &str, name: &str) -> Subject {
    let subject = Subject {
      id:         id.to_string(),
      user_id:    USER_ID.to_string(),
      name:       name.to_string(),
      color:      PALETTE[0].to_string(),
      created_at: Utc::now(),
    };
    self.lock().subjects.push(subject.clone());
    subject
  }

  /// The next call of any kind fails with `error`.
  pub(crate) fn fail_next(&self, error: GatewayError) {
    self.lock().failures.push_back(error);
  }

  /// Listing attendance for `subject_id` always fails.
  pub(crate) fn fail_subject(&self, subject_id: &str) {
    self.lock().failing_subjects.insert(subject_id.to_string());
  }

  /// The next call computes its answer immediately but does not return it
  /// until the returned sender fires (or is dropped).
  pub(crate) fn hold_next(&self) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.lock().gate = Some(rx);
    tx
  }

  pub(crate) fn calls(&self) -> Vec<Call> { self.lock().calls.clone() }

  pub(crate) fn attendance_rows(&self) -> Vec<AttendanceEntry> {
    self.lock().attendance.clone()
  }

  /// Record `call`, then either fail or compute the answer with `f`.
  async fn handle<T>(
    &self,
    call: Call,
    f: impl FnOnce(&mut Inner) -> GatewayResult<T>,
  ) -> GatewayResult<T> {
    let (result, gate) = {
      let mut inner = self.lock();
      inner.calls.push(call);
      let result = match inner.failures.pop_front() {
        Some(err) => Err(err),
        None => f(&mut inner),
      };
      (result, inner.gate.take())
    };
    if let Some(gate) = gate {
      let _ = gate.await;
    }
    result
  }

  fn grant(email: &str, name: &str) -> AuthGrant {
    AuthGrant {
      access_token: format!("token-{}", Uuid::new_v4()),
      token_type:   "bearer".to_string(),
      user:         User {
        email: email.to_string(),
        name: name.to_string(),
        ..user()
      },
    }
  }
}

impl Gateway for FakeGateway {
  async fn register(&self, registration: Registration) -> GatewayResult<AuthGrant> {
    self
      .handle(Call::Register, |_| {
        Ok(Self::grant(&registration.email, &registration.name))
      })
      .await
  }

  async fn login(&self, credentials: Credentials) -> GatewayResult<AuthGrant> {
    self
      .handle(Call::Login, |_| Ok(Self::grant(&credentials.email, "Ada")))
      .await
  }

  async fn current_user(&self) -> GatewayResult<User> {
    self.handle(Call::CurrentUser, |_| Ok(user())).await
  }

  async fn list_subjects(&self) -> GatewayResult<Vec<Subject>> {
    self
      .handle(Call::ListSubjects, |inner| Ok(inner.subjects.clone()))
      .await
  }

  async fn create_subject(&self, new: NewSubject) -> GatewayResult<Subject> {
    self
      .handle(Call::CreateSubject(new.name.clone()), |inner| {
        if inner.subjects.iter().any(|s| s.name == new.name) {
          return Err(GatewayError::new("Subject with this name already exists"));
        }
        let color = new
          .color
          .unwrap_or_else(|| PALETTE[inner.subjects.len() % PALETTE.len()].to_string());
        let subject = Subject {
          id: Uuid::new_v4().to_string(),
          user_id: USER_ID.to_string(),
          name: new.name,
          color,
          created_at: Utc::now(),
        };
        inner.subjects.push(subject.clone());
        Ok(subject)
      })
      .await
  }

  async fn delete_subject(&self, id: String) -> GatewayResult<()> {
    self
      .handle(Call::DeleteSubject(id.clone()), |inner| {
        let before = inner.subjects.len();
        inner.subjects.retain(|s| s.id != id);
        if inner.subjects.len() == before {
          return Err(GatewayError::new("Subject not found"));
        }
        inner.attendance.retain(|r| r.subject_id != id);
        Ok(())
      })
      .await
  }

  async fn list_attendance(&self, subject_id: String) -> GatewayResult<Vec<AttendanceEntry>> {
    self
      .handle(Call::ListAttendance(subject_id.clone()), |inner| {
        if inner.failing_subjects.contains(&subject_id)
          || !inner.subjects.iter().any(|s| s.id == subject_id)
        {
          return Err(GatewayError::new("Subject not found"));
        }
        Ok(
          inner
            .attendance
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .cloned()
            .collect(),
        )
      })
      .await
  }

  async fn mark_attendance(&self, mark: MarkAttendance) -> GatewayResult<AttendanceEntry> {
    self
      .handle(Call::MarkAttendance(mark.clone()), |inner| {
        if !inner.subjects.iter().any(|s| s.id == mark.subject_id) {
          return Err(GatewayError::new("Subject not found"));
        }
        if let Some(row) = inner
          .attendance
          .iter_mut()
          .find(|r| r.subject_id == mark.subject_id && r.date == mark.date)
        {
          row.status = mark.status;
          return Ok(row.clone());
        }
        let row = AttendanceEntry {
          id:         Uuid::new_v4().to_string(),
          subject_id: mark.subject_id,
          date:       mark.date,
          status:     mark.status,
          created_at: Some(Utc::now()),
        };
        inner.attendance.push(row.clone());
        Ok(row)
      })
      .await
  }

  async fn attendance_stats(&self, subject_id: String) -> GatewayResult<ServerStats> {
    self
      .handle(Call::AttendanceStats(subject_id.clone()), |inner| {
        let tally = AttendanceTally::from_statuses(
          inner
            .attendance
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .map(|r| r.status),
        );
        Ok(ServerStats {
          total:      tally.total,
          present:    tally.present,
          absent:     tally.absent,
          leave:      tally.leave,
          percentage: f64::from(tally.percentage),
        })
      })
      .await
  }
}
