//! End-to-end scenarios across the registry, ledger and authenticator,
//! driven against the in-memory gateway.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
  Error,
  attendance::AttendanceStatus::*,
  auth::Authenticator,
  fake::{Call, FakeGateway},
  ledger::AttendanceLedger,
  registry::SubjectRegistry,
  session::SessionStore,
  stats::AttendanceTally,
};

struct Client {
  gateway:  Arc<FakeGateway>,
  auth:     Authenticator<FakeGateway>,
  subjects: SubjectRegistry<FakeGateway>,
  ledger:   AttendanceLedger<FakeGateway>,
}

fn client() -> Client {
  let gateway = Arc::new(FakeGateway::new());
  Client {
    auth:     Authenticator::new(gateway.clone(), Arc::new(SessionStore::in_memory())),
    subjects: SubjectRegistry::new(gateway.clone()),
    ledger:   AttendanceLedger::new(gateway.clone()),
    gateway,
  }
}

fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

#[tokio::test]
async fn three_statuses_give_a_third() {
  let c = client();
  let user = c.auth.sign_in("ada@example.com", "hunter22").await.unwrap();
  c.gateway.seed_subject("m", "Math");
  c.subjects.load(Some(&user)).await;
  c.ledger.load(Some(&user), &c.subjects.subjects()).await;

  c.ledger.mark(Some(&user), "m", date("2024-01-10"), Present).await.unwrap();
  c.ledger.mark(Some(&user), "m", date("2024-01-11"), Absent).await.unwrap();
  c.ledger.mark(Some(&user), "m", date("2024-01-12"), Leave).await.unwrap();

  assert_eq!(
    c.ledger.subject_stats("m"),
    AttendanceTally { total: 3, present: 1, absent: 1, leave: 1, percentage: 33 }
  );
}

#[tokio::test]
async fn deleted_subject_has_no_records_after_reload() {
  let c = client();
  let user = c.auth.sign_in("ada@example.com", "hunter22").await.unwrap();
  let math = c.subjects.add(Some(&user), "Math").await.unwrap();
  c.subjects.add(Some(&user), "Physics").await.unwrap();
  c.ledger.mark(Some(&user), &math.id, date("2024-01-10"), Present).await.unwrap();

  c.subjects.delete(Some(&user), &math.id).await.unwrap();
  assert!(c.subjects.get(&math.id).is_none());

  c.ledger.refetch(Some(&user), &c.subjects.subjects()).await;
  assert!(c.ledger.attendance_for_subject(&math.id).is_empty());
}

#[tokio::test]
async fn signed_out_client_cannot_mutate() {
  let c = client();
  c.auth.sign_in("ada@example.com", "hunter22").await.unwrap();
  c.auth.sign_out();
  let who = c.auth.user();
  assert!(who.is_none());

  assert_eq!(c.subjects.add(who.as_ref(), "Math").await, Err(Error::NotAuthenticated));
  assert_eq!(c.subjects.delete(who.as_ref(), "m").await, Err(Error::NotAuthenticated));
  assert_eq!(
    c.ledger.mark(who.as_ref(), "m", date("2024-01-10"), Present).await,
    Err(Error::NotAuthenticated)
  );
  assert_eq!(c.gateway.calls(), vec![Call::Login]);
}

#[tokio::test]
async fn user_change_rebuilds_state_from_scratch() {
  let c = client();
  let user = c.auth.sign_in("ada@example.com", "hunter22").await.unwrap();
  c.gateway.seed_subject("m", "Math");
  c.subjects.load(Some(&user)).await;
  c.ledger.mark(Some(&user), "m", date("2024-01-10"), Present).await.unwrap();

  c.auth.sign_out();
  c.subjects.load(c.auth.user().as_ref()).await;
  c.ledger.load(c.auth.user().as_ref(), &c.subjects.subjects()).await;

  assert!(c.subjects.is_empty());
  assert!(c.ledger.records().is_empty());
  assert_eq!(c.ledger.dashboard_stats(&c.subjects.subjects()).total_subjects, 0);
}
