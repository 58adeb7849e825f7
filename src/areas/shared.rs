//! Lock-guarded repository handle
//!
//! Every intent runs under one lock, so operations never interleave and each
//! returned snapshot reflects exactly the intents applied before it.

use crate::areas::repository::{Repository, RepositorySnapshot};
use crate::commands::intent::{Intent, Outcome};
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedRepository {
    inner: Arc<Mutex<Repository>>,
}

impl SharedRepository {
    pub fn new(repository: Repository) -> Self {
        SharedRepository {
            inner: Arc::new(Mutex::new(repository)),
        }
    }

    /// Apply an intent and capture the resulting state under the same lock
    pub fn apply(&self, intent: Intent) -> Result<(Outcome, RepositorySnapshot)> {
        let mut repository = self.inner.lock();
        let outcome = repository.apply(intent)?;

        Ok((outcome, repository.snapshot()))
    }

    pub fn snapshot(&self) -> RepositorySnapshot {
        self.inner.lock().snapshot()
    }

    /// Run a read-only query against the repository
    pub fn read<R>(&self, query: impl FnOnce(&Repository) -> R) -> R {
        query(&self.inner.lock())
    }
}
