//! Subject registry: the client's mirror of the user's subjects.
//!
//! The list only changes in three ways: a full reload, an append after the
//! backend confirms a create, and a removal after it confirms a delete.
//! Nothing is inserted optimistically.

use std::sync::{
  Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
  atomic::{AtomicU64, Ordering},
};

use crate::{
  Error, Result,
  gateway::Gateway,
  subject::{NewSubject, Subject},
  user::User,
};

#[derive(Default)]
struct State {
  subjects:   Vec<Subject>,
  loading:    bool,
  /// Generation of the most recent `load`; only its result may be applied.
  generation: u64,
}

pub struct SubjectRegistry<G> {
  gateway:     Arc<G>,
  state:       RwLock<State>,
  generations: AtomicU64,
}

impl<G: Gateway> SubjectRegistry<G> {
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

  /// Start a new load generation and mark the registry as loading.
  fn begin_load(&self) -> u64 {
    let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
    let mut state = self.write();
    state.generation = generation;
    state.loading = true;
    generation
  }

  /// Apply `subjects` if `generation` is still the latest load.
  fn finish_load(&self, generation: u64, subjects: Vec<Subject>) -> bool {
    let mut state = self.write();
    if state.generation != generation {
      return false;
    }
    state.subjects = subjects;
    state.loading = false;
    true
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Snapshot of the current list, in server order then append order.
  pub fn subjects(&self) -> Vec<Subject> { self.read().subjects.clone() }

  pub fn get(&self, id: &str) -> Option<Subject> {
    self.read().subjects.iter().find(|s| s.id == id).cloned()
  }

  pub fn len(&self) -> usize { self.read().subjects.len() }

  pub fn is_empty(&self) -> bool { self.read().subjects.is_empty() }

  pub fn is_loading(&self) -> bool { self.read().loading }

  // ── Sync ──────────────────────────────────────────────────────────────

  /// Replace the list with the backend's. Without a user the list is simply
  /// cleared. Failures are logged and leave an empty list.
  pub async fn load(&self, user: Option<&User>) {
    let generation = self.begin_load();

    let Some(user) = user else {
      self.finish_load(generation, Vec::new());
      return;
    };

    let subjects = match self.gateway.list_subjects().await {
      Ok(subjects) => subjects,
      Err(e) => {
        tracing::warn!(user = %user.id, error = %e, "failed to load subjects");
        Vec::new()
      }
    };

    if !self.finish_load(generation, subjects) {
      tracing::debug!(generation, "discarding stale subject load");
    }
  }

  /// Reload after changes made elsewhere.
  pub async fn refetch(&self, user: Option<&User>) { self.load(user).await }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Create a subject named `name` (surrounding whitespace trimmed).
  pub async fn add(&self, user: Option<&User>, name: &str) -> Result<Subject> {
    self.add_with(user, NewSubject::named(name)).await
  }

  /// Create a subject, optionally with an explicit colour.
  pub async fn add_with(&self, user: Option<&User>, new: NewSubject) -> Result<Subject> {
    if user.is_none() {
      return Err(Error::NotAuthenticated);
    }
    let name = new.name.trim().to_string();
    if name.is_empty() {
      return Err(Error::EmptySubjectName);
    }
    let new = NewSubject { name, color: new.color };

    let subject = self.gateway.create_subject(new).await?;
    self.write().subjects.push(subject.clone());
    Ok(subject)
  }

  /// Delete the subject `id`. The backend drops its attendance with it.
  pub async fn delete(&self, user: Option<&User>, id: &str) -> Result<()> {
    if user.is_none() {
      return Err(Error::NotAuthenticated);
    }
    self.gateway.delete_subject(id.to_string()).await?;
    self.write().subjects.retain(|s| s.id != id);
    Ok(())
  }
}
