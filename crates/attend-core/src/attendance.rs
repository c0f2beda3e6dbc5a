//! Attendance records and the payloads of the attendance endpoints.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The state of a marked `(subject, date)` slot. An unmarked slot has no
/// status at all and is represented by `None` at the call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
  Present,
  Absent,
  Leave,
}

impl AttendanceStatus {
  pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Leave];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Present => "present",
      Self::Absent => "absent",
      Self::Leave => "leave",
    }
  }
}

impl fmt::Display for AttendanceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance status: {0:?} (expected present, absent or leave)")]
pub struct ParseStatusError(String);

impl FromStr for AttendanceStatus {
  type Err = ParseStatusError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "present" | "p" => Ok(Self::Present),
      "absent" | "a" => Ok(Self::Absent),
      "leave" | "l" => Ok(Self::Leave),
      _ => Err(ParseStatusError(s.to_string())),
    }
  }
}

// ─── Local record ────────────────────────────────────────────────────────────

/// One status entry for a subject on a calendar day, as held by the ledger.
/// At most one record exists per `(subject_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:         String,
  pub subject_id: String,
  pub user_id:    String,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
  pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
  /// Whether this record occupies the `(subject_id, date)` slot.
  pub fn is_slot(&self, subject_id: &str, date: NaiveDate) -> bool {
    self.subject_id == subject_id && self.date == date
  }
}

// ─── Wire payloads ───────────────────────────────────────────────────────────

/// An attendance entry as returned by the list and mark endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
  pub id:         String,
  pub subject_id: String,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
  #[serde(default, deserialize_with = "crate::timestamp::deserialize_opt")]
  pub created_at: Option<DateTime<Utc>>,
}

impl AttendanceEntry {
  /// Convert into a ledger record owned by `user_id`. Entries without a
  /// server timestamp are stamped with the current time.
  pub fn into_record(self, user_id: &str) -> AttendanceRecord {
    AttendanceRecord {
      id:         self.id,
      subject_id: self.subject_id,
      user_id:    user_id.to_string(),
      date:       self.date,
      status:     self.status,
      created_at: self.created_at.unwrap_or_else(Utc::now),
    }
  }
}

/// Body of `POST /api/attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAttendance {
  pub subject_id: String,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
}

/// Statistics computed by the backend (`GET /api/attendance/{id}/stats`).
///
/// The backend rounds the percentage to one decimal place; the client's own
/// [`crate::stats::AttendanceTally`] rounds to a whole number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
  pub total:      u32,
  pub present:    u32,
  pub absent:     u32,
  pub leave:      u32,
  pub percentage: f64,
}
