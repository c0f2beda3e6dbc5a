//! Command execution on top of the attend client core.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use attend_core::{
  attendance::AttendanceStatus,
  auth::Authenticator,
  gateway::Gateway,
  ledger::AttendanceLedger,
  registry::SubjectRegistry,
  session::SessionStore,
  subject::{NewSubject, Subject},
  user::User,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::{Command, lookup, render};

/// Client state shared by every command.
pub struct App<G> {
  gateway:  Arc<G>,
  auth:     Authenticator<G>,
  subjects: SubjectRegistry<G>,
  ledger:   AttendanceLedger<G>,
  /// Emit JSON instead of text.
  json:     bool,
}

impl<G: Gateway> App<G> {
  pub fn new(gateway: Arc<G>, session: Arc<SessionStore>, json: bool) -> Self {
    Self {
      auth: Authenticator::new(gateway.clone(), session),
      subjects: SubjectRegistry::new(gateway.clone()),
      ledger: AttendanceLedger::new(gateway.clone()),
      gateway,
      json,
    }
  }

  fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if self.json {
      println!("{}", serde_json::to_string_pretty(value).context("encoding JSON output")?);
    } else {
      let text = text();
      println!("{}", text.trim_end());
    }
    Ok(())
  }

  /// Restore the stored session, or fail with a hint to log in.
  async fn signed_in(&self) -> Result<User> {
    self
      .auth
      .restore()
      .await
      .ok_or_else(|| anyhow!("not signed in; run `attend login` first"))
  }

  /// Load the subject list and pick the one `query` names.
  async fn subject(&self, user: &User, query: &str) -> Result<Subject> {
    self.subjects.load(Some(user)).await;
    lookup::resolve(&self.subjects.subjects(), query)
      .cloned()
      .with_context(|| format!("no subject matching {query:?}"))
  }

  /// Like [`Self::subject`], but only an exact id or name is accepted.
  async fn exact_subject(&self, user: &User, query: &str) -> Result<Subject> {
    self.subjects.load(Some(user)).await;
    lookup::resolve_exact(&self.subjects.subjects(), query)
      .cloned()
      .with_context(|| {
        format!("no subject named {query:?}; delete needs the exact id or name")
      })
  }

  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Register { name, email, password } => {
        let user = self.auth.sign_up(&name, &email, &password).await?;
        self.emit(&user, || format!("Registered and signed in as {}", render::user(&user)))
      }

      Command::Login { email, password } => {
        let user = self.auth.sign_in(&email, &password).await?;
        self.emit(&user, || format!("Signed in as {}", render::user(&user)))
      }

      Command::Logout => {
        self.auth.sign_out();
        self.emit(&serde_json::json!({ "signed_out": true }), || "Signed out.".to_string())
      }

      Command::Whoami => {
        let user = self.signed_in().await?;
        self.emit(&user, || render::user(&user))
      }

      Command::Subjects => {
        let user = self.signed_in().await?;
        self.subjects.load(Some(&user)).await;
        let subjects = self.subjects.subjects();
        self.emit(&subjects, || render::subjects(&subjects))
      }

      Command::Add { name, color } => {
        let user = self.signed_in().await?;
        let new = match color {
          Some(color) => NewSubject::named(name).with_color(color),
          None => NewSubject::named(name),
        };
        let subject = self.subjects.add_with(Some(&user), new).await?;
        self.emit(&subject, || format!("Added {} ({})", subject.name, subject.id))
      }

      Command::Delete { subject } => {
        let user = self.signed_in().await?;
        let subject = self.exact_subject(&user, &subject).await?;
        self.subjects.delete(Some(&user), &subject.id).await?;
        self.emit(&subject, || {
          format!("Deleted {} and its attendance history", subject.name)
        })
      }

      Command::Mark { subject, status, date } => {
        let user = self.signed_in().await?;
        let subject = self.subject(&user, &subject).await?;
        let today = Local::now().date_naive();
        let date = date.unwrap_or(today);
        if date > today {
          bail!("cannot mark attendance for a future date ({date})");
        }
        self.mark(&user, &subject, date, status).await
      }

      Command::History { subject } => {
        let user = self.signed_in().await?;
        let subject = self.subject(&user, &subject).await?;
        self.ledger.load(Some(&user), std::slice::from_ref(&subject)).await;
        let records = self.ledger.attendance_for_subject(&subject.id);
        self.emit(&records, || render::history(&records))
      }

      Command::Stats { subject: None } => {
        let user = self.signed_in().await?;
        self.subjects.load(Some(&user)).await;
        let subjects = self.subjects.subjects();
        self.ledger.load(Some(&user), &subjects).await;
        let stats = self.ledger.dashboard_stats(&subjects);
        self.emit(&stats, || render::dashboard(&stats))
      }

      Command::Stats { subject: Some(query) } => {
        let user = self.signed_in().await?;
        let subject = self.subject(&user, &query).await?;
        self.ledger.load(Some(&user), std::slice::from_ref(&subject)).await;
        let tally = self.ledger.subject_stats(&subject.id);
        self.emit(&tally, || render::tally(&subject.name, &tally))
      }

      Command::Calendar { subject, month } => {
        let user = self.signed_in().await?;
        let subject = self.subject(&user, &subject).await?;
        self.ledger.load(Some(&user), std::slice::from_ref(&subject)).await;
        let today = Local::now().date_naive();
        let month = month.unwrap_or(today);
        let records = self.ledger.attendance_for_subject(&subject.id);
        self.emit(&render::in_month(&records, month), || {
          format!(
            "{}\n{}",
            subject.name,
            render::calendar(month, today, |d| {
              self.ledger.attendance_for_date(&subject.id, d)
            })
          )
        })
      }

      Command::ServerStats { subject } => {
        let user = self.signed_in().await?;
        let subject = self.subject(&user, &subject).await?;
        let stats = self.gateway.attendance_stats(subject.id.clone()).await?;
        self.emit(&stats, || render::server_stats(&subject.name, &stats))
      }
    }
  }

  async fn mark(
    &self,
    user: &User,
    subject: &Subject,
    date: NaiveDate,
    status: AttendanceStatus,
  ) -> Result<()> {
    self.ledger.load(Some(user), std::slice::from_ref(subject)).await;
    let previous = self.ledger.attendance_for_date(&subject.id, date);
    self.ledger.mark(Some(user), &subject.id, date, status).await?;
    let tally = self.ledger.subject_stats(&subject.id);

    self.emit(&tally, || {
      let change = match previous {
        Some(old) if old != status => format!("changed {old} → {status}"),
        Some(_) => format!("already {status}"),
        None => format!("marked {status}"),
      };
      format!("{} on {date}: {change}\n{}", subject.name, render::tally(&subject.name, &tally))
    })
  }
}
