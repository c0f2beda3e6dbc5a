//! Resolve a subject from a command-line argument.

use attend_core::subject::Subject;
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

/// Find the subject `query` names exactly: its id, or its name ignoring
/// case. Used where a wrong match would destroy data.
pub fn resolve_exact<'a>(subjects: &'a [Subject], query: &str) -> Option<&'a Subject> {
  let query = query.trim();
  subjects
    .iter()
    .find(|s| s.id == query)
    .or_else(|| subjects.iter().find(|s| s.name.eq_ignore_ascii_case(query)))
}

/// Find the subject `query` refers to: an exact id, then a case-insensitive
/// name, then the best fuzzy match on the name.
pub fn resolve<'a>(subjects: &'a [Subject], query: &str) -> Option<&'a Subject> {
  if let Some(subject) = resolve_exact(subjects, query) {
    return Some(subject);
  }
  let query = query.trim();
  let matcher = SkimMatcherV2::default();
  subjects
    .iter()
    .filter_map(|s| matcher.fuzzy_match(&s.name, query).map(|score| (score, s)))
    .max_by_key(|(score, _)| *score)
    .map(|(_, s)| s)
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn subject(id: &str, name: &str) -> Subject {
    Subject {
      id:         id.into(),
      user_id:    "u1".into(),
      name:       name.into(),
      color:      "#8B5CF6".into(),
      created_at: Utc::now(),
    }
  }

  fn subjects() -> Vec<Subject> {
    vec![
      subject("65a1", "Mathematics"),
      subject("65a2", "Physics"),
      subject("65a3", "Physical Education"),
    ]
  }

  #[test]
  fn exact_id_wins() {
    let all = subjects();
    assert_eq!(resolve(&all, "65a2").unwrap().name, "Physics");
  }

  #[test]
  fn name_is_case_insensitive() {
    let all = subjects();
    assert_eq!(resolve(&all, "physics").unwrap().id, "65a2");
  }

  #[test]
  fn falls_back_to_fuzzy() {
    let all = subjects();
    assert_eq!(resolve(&all, "math").unwrap().id, "65a1");
    assert_eq!(resolve(&all, "phys edu").unwrap().id, "65a3");
  }

  #[test]
  fn exact_lookup_refuses_partial_names() {
    let all = subjects();
    assert!(resolve_exact(&all, "phys").is_none());
    assert!(resolve_exact(&all, "math").is_none());
    assert_eq!(resolve_exact(&all, "physics").unwrap().id, "65a2");
    assert_eq!(resolve_exact(&all, " 65a3 ").unwrap().name, "Physical Education");
  }

  #[test]
  fn no_match_is_none() {
    let all = subjects();
    assert!(resolve(&all, "zzz").is_none());
    assert!(resolve(&[], "math").is_none());
  }
}
