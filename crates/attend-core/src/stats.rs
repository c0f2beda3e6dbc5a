//! Derived attendance statistics.
//!
//! Nothing here is stored. Every value is a projection of the ledger's
//! current records, recomputed on each read.

use serde::{Deserialize, Serialize};

use crate::{attendance::AttendanceStatus, subject::Subject};

/// `round(present / total * 100)`, or `0` when there were no classes.
pub fn percentage(present: u32, total: u32) -> u32 {
  if total == 0 {
    return 0;
  }
  (f64::from(present) / f64::from(total) * 100.0).round() as u32
}

// ─── Per-subject ─────────────────────────────────────────────────────────────

/// Status counts for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceTally {
  pub total:      u32,
  pub present:    u32,
  pub absent:     u32,
  pub leave:      u32,
  pub percentage: u32,
}

impl AttendanceTally {
  pub fn from_statuses<I>(statuses: I) -> Self
  where
    I: IntoIterator<Item = AttendanceStatus>,
  {
    let mut tally = Self::default();
    for status in statuses {
      match status {
        AttendanceStatus::Present => tally.present += 1,
        AttendanceStatus::Absent => tally.absent += 1,
        AttendanceStatus::Leave => tally.leave += 1,
      }
    }
    tally.total = tally.present + tally.absent + tally.leave;
    tally.percentage = percentage(tally.present, tally.total);
    tally
  }

  pub fn standing(&self) -> Standing { Standing::of(self.percentage) }
}

/// A subject together with its tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
  pub subject: Subject,
  #[serde(flatten)]
  pub tally:   AttendanceTally,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

/// Totals across every subject the user owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total_subjects:     usize,
  pub overall_percentage: u32,
  pub total_present:      u32,
  pub total_absent:       u32,
  pub total_leave:        u32,
  pub subject_stats:      Vec<SubjectStats>,
}

impl DashboardStats {
  /// Reduce per-subject stats to overall totals. An empty input yields the
  /// all-zero baseline.
  pub fn from_subject_stats(subject_stats: Vec<SubjectStats>) -> Self {
    let total_present: u32 = subject_stats.iter().map(|s| s.tally.present).sum();
    let total_absent: u32 = subject_stats.iter().map(|s| s.tally.absent).sum();
    let total_leave: u32 = subject_stats.iter().map(|s| s.tally.leave).sum();
    let total_classes = total_present + total_absent + total_leave;

    Self {
      total_subjects: subject_stats.len(),
      overall_percentage: percentage(total_present, total_classes),
      total_present,
      total_absent,
      total_leave,
      subject_stats,
    }
  }

  pub fn total_classes(&self) -> u32 {
    self.total_present + self.total_absent + self.total_leave
  }
}

// ─── Standing ────────────────────────────────────────────────────────────────

/// Coarse band for an attendance percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
  /// 75% and above.
  Good,
  /// 50% up to 75%.
  Warning,
  /// Below 50%.
  Critical,
}

impl Standing {
  pub fn of(percentage: u32) -> Self {
    match percentage {
      75.. => Self::Good,
      50..75 => Self::Warning,
      _ => Self::Critical,
    }
  }
}
