//! Attendance ledger: the client's mirror of attendance records across all
//! of the user's subjects, and the statistics derived from it.
//!
//! Records are kept in one flat list. Marking upserts by
//! `(subject_id, date)`, so a slot holds at most one record. Statistics are
//! recomputed from the list on every call.

use std::sync::{
  Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
  atomic::{AtomicU64, Ordering},
};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  attendance::{AttendanceRecord, AttendanceStatus, MarkAttendance},
  gateway::Gateway,
  stats::{AttendanceTally, DashboardStats, SubjectStats},
  subject::Subject,
  user::User,
};

#[derive(Default)]
struct State {
  records:    Vec<AttendanceRecord>,
  loading:    bool,
  generation: u64,
}

pub struct AttendanceLedger<G> {
  gateway:     Arc<G>,
  state:       RwLock<State>,
  generations: AtomicU64,
}

impl<G: Gateway> AttendanceLedger<G> {
  pub fn new(gateway: Arc<G>) -> Self {
    Self {
      gateway,
      state: RwLock::new(State::default()),
      generations: AtomicU64::new(0),
    }
  }

  fn read(&self) -> RwLockReadGuard<'_, State> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, State> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }

  fn begin_load(&self) -> u64 {
    let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
    let mut state = self.write();
    state.generation = generation;
    state.loading = true;
    generation
  }

  fn finish_load(&self, generation: u64, records: Vec<AttendanceRecord>) -> bool {
    let mut state = self.write();
    if state.generation != generation {
      return false;
    }
    state.records = records;
    state.loading = false;
    true
  }

  // ── Sync ──────────────────────────────────────────────────────────────

  /// Rebuild the ledger from the backend, one subject at a time.
  ///
  /// With no user or no subjects the ledger is cleared without any network
  /// call. A subject whose history cannot be fetched is logged and skipped;
  /// the others still load.
  pub async fn load(&self, user: Option<&User>, subjects: &[Subject]) {
    let generation = self.begin_load();

    let Some(user) = user.filter(|_| !subjects.is_empty()) else {
      self.finish_load(generation, Vec::new());
      return;
    };

    let mut records = Vec::new();
    for subject in subjects {
      match self.gateway.list_attendance(subject.id.clone()).await {
        Ok(entries) => {
          records.extend(entries.into_iter().map(|e| e.into_record(&user.id)));
        }
        Err(e) => {
          tracing::warn!(
            subject = %subject.id,
            error = %e,
            "failed to load attendance; skipping subject"
          );
        }
      }
    }

    if !self.finish_load(generation, records) {
      tracing::debug!(generation, "discarding stale attendance load");
    }
  }

  pub async fn refetch(&self, user: Option<&User>, subjects: &[Subject]) {
    self.load(user, subjects).await
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Record `status` for `subject_id` on `date`.
  ///
  /// Once the backend accepts the mark, an existing record for the slot is
  /// replaced in place, otherwise a new one is appended. The stored status
  /// is always the one requested here.
  pub async fn mark(
    &self,
    user: Option<&User>,
    subject_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
  ) -> Result<()> {
    let user = user.ok_or(Error::NotAuthenticated)?;

    let entry = self
      .gateway
      .mark_attendance(MarkAttendance {
        subject_id: subject_id.to_string(),
        date,
        status,
      })
      .await?;

    let record = AttendanceRecord {
      status,
      ..entry.into_record(&user.id)
    };

    let mut state = self.write();
    match state.records.iter_mut().find(|r| r.is_slot(subject_id, date)) {
      Some(existing) => *existing = record,
      None => state.records.push(record),
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub fn records(&self) -> Vec<AttendanceRecord> { self.read().records.clone() }

  pub fn is_loading(&self) -> bool { self.read().loading }

  /// Status of the `(subject_id, date)` slot, or `None` if unmarked.
  pub fn attendance_for_date(
    &self,
    subject_id: &str,
    date: NaiveDate,
  ) -> Option<AttendanceStatus> {
    self
      .read()
      .records
      .iter()
      .find(|r| r.is_slot(subject_id, date))
      .map(|r| r.status)
  }

  /// Records for one subject, in ledger order.
  pub fn attendance_for_subject(&self, subject_id: &str) -> Vec<AttendanceRecord> {
    self
      .read()
      .records
      .iter()
      .filter(|r| r.subject_id == subject_id)
      .cloned()
      .collect()
  }

  pub fn subject_stats(&self, subject_id: &str) -> AttendanceTally {
    AttendanceTally::from_statuses(
      self
        .read()
        .records
        .iter()
        .filter(|r| r.subject_id == subject_id)
        .map(|r| r.status),
    )
  }

  /// Per-subject stats for every subject in `subjects`, plus overall
  /// totals.
  pub fn dashboard_stats(&self, subjects: &[Subject]) -> DashboardStats {
    let subject_stats = subjects
      .iter()
      .map(|subject| SubjectStats {
        subject: subject.clone(),
        tally:   self.subject_stats(&subject.id),
      })
      .collect();
    DashboardStats::from_subject_stats(subject_stats)
  }
}
