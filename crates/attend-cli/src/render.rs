//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use attend_core::{
  attendance::{AttendanceRecord, AttendanceStatus, ServerStats},
  stats::{AttendanceTally, DashboardStats, Standing},
  subject::Subject,
  user::User,
};
use chrono::{Datelike, NaiveDate};

fn standing_label(standing: Standing) -> &'static str {
  match standing {
    Standing::Good => "good",
    Standing::Warning => "at risk",
    Standing::Critical => "critical",
  }
}

fn status_marker(status: Option<AttendanceStatus>) -> char {
  match status {
    Some(AttendanceStatus::Present) => 'P',
    Some(AttendanceStatus::Absent) => 'A',
    Some(AttendanceStatus::Leave) => 'L',
    None => '.',
  }
}

pub fn user(user: &User) -> String {
  format!("{} <{}> (id {})", user.name, user.email, user.id)
}

pub fn subjects(subjects: &[Subject]) -> String {
  if subjects.is_empty() {
    return "No subjects yet. Add one with `attend add <name>`.".to_string();
  }
  let width = subjects.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);
  let mut out = String::new();
  for s in subjects {
    let _ = writeln!(out, "{:<width$}  {}  {}", s.name, s.color, s.id);
  }
  out
}

pub fn tally(name: &str, tally: &AttendanceTally) -> String {
  format!(
    "{name}: {pct}% ({standing}) - {p} present, {a} absent, {l} leave, {t} total",
    pct = tally.percentage,
    standing = standing_label(tally.standing()),
    p = tally.present,
    a = tally.absent,
    l = tally.leave,
    t = tally.total,
  )
}

pub fn server_stats(name: &str, stats: &ServerStats) -> String {
  format!(
    "{name} (server): {:.1}% - {} present, {} absent, {} leave, {} total",
    stats.percentage, stats.present, stats.absent, stats.leave, stats.total,
  )
}

pub fn dashboard(stats: &DashboardStats) -> String {
  let mut out = String::new();
  let width = stats
    .subject_stats
    .iter()
    .map(|s| s.subject.name.chars().count())
    .max()
    .unwrap_or(0)
    .max("Subject".len());

  let _ = writeln!(
    out,
    "{:<width$}  {:>4}  {:>4}  {:>4}  {:>5}  Standing",
    "Subject", "P", "A", "L", "%"
  );
  for s in &stats.subject_stats {
    let _ = writeln!(
      out,
      "{:<width$}  {:>4}  {:>4}  {:>4}  {:>4}%  {}",
      s.subject.name,
      s.tally.present,
      s.tally.absent,
      s.tally.leave,
      s.tally.percentage,
      standing_label(s.tally.standing()),
    );
  }
  let _ = writeln!(
    out,
    "\n{} subjects, {} classes, overall {}% ({})",
    stats.total_subjects,
    stats.total_classes(),
    stats.overall_percentage,
    standing_label(Standing::of(stats.overall_percentage)),
  );
  out
}

/// One line per record, oldest first.
pub fn history(records: &[AttendanceRecord]) -> String {
  if records.is_empty() {
    return "No attendance recorded.".to_string();
  }
  let mut sorted: Vec<_> = records.iter().collect();
  sorted.sort_by_key(|r| r.date);
  let mut out = String::new();
  for r in sorted {
    let _ = writeln!(out, "{}  {}", r.date.format("%a %Y-%m-%d"), r.status);
  }
  out
}

/// The records dated within `month`'s calendar month, oldest first.
pub fn in_month(records: &[AttendanceRecord], month: NaiveDate) -> Vec<&AttendanceRecord> {
  let mut within: Vec<_> = records
    .iter()
    .filter(|r| r.date.year() == month.year() && r.date.month() == month.month())
    .collect();
  within.sort_by_key(|r| r.date);
  within
}

/// A month grid, weeks starting on Sunday. Each day shows its status
/// (`P`, `A`, `L`), `.` when unmarked, or nothing when in the future.
pub fn calendar(
  month: NaiveDate,
  today: NaiveDate,
  status_on: impl Fn(NaiveDate) -> Option<AttendanceStatus>,
) -> String {
  let first = month.with_day(1).unwrap_or(month);
  let mut out = String::new();
  let _ = writeln!(out, "{}", first.format("%B %Y"));
  let _ = writeln!(out, " Su  Mo  Tu  We  Th  Fr  Sa");

  let padding = first.weekday().num_days_from_sunday() as usize;
  let mut column = padding;
  out.push_str(&"    ".repeat(padding));

  for day in first.iter_days().take_while(|d| d.month() == first.month()) {
    let marker = if day > today { ' ' } else { status_marker(status_on(day)) };
    let _ = write!(out, " {:>2}{}", day.day(), marker);
    column += 1;
    if column == 7 {
      out.push('\n');
      column = 0;
    }
  }
  if column != 0 {
    out.push('\n');
  }
  out.push_str("P present  A absent  L leave  . unmarked\n");
  out
}
