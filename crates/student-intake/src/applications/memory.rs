use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::domain::{ApplicationId, NewApplication, StoredApplication};
use super::repository::{ApplicationRepository, RepositoryError};

/// Process-local gateway for tests and `serve --in-memory` demos. Contents vanish on exit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    records: Vec<StoredApplication>,
}

impl InMemoryApplicationStore {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
    }

    /// Number of stored applications. Panics if a writer panicked while holding the lock.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .expect("in-memory store poisoned")
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationStore {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn insert(
        &self,
        application: NewApplication,
    ) -> Result<StoredApplication, RepositoryError> {
        let mut state = self.lock()?;
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::InsertFailed("id sequence exhausted".to_string()))?;

        // Keep created_at strictly increasing so ordering never depends on clock resolution.
        let mut now = Utc::now();
        if let Some(latest) = state.records.iter().map(|record| record.created_at).max() {
            if now <= latest {
                now = latest + chrono::Duration::microseconds(1);
            }
        }

        let stored = StoredApplication::from_new(ApplicationId(next), application, now);
        state.last_id = next;
        state.records.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredApplication>, RepositoryError> {
        let state = self.lock()?;
        let mut records = state.records.clone();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<StoredApplication>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.iter().find(|record| record.id == id).cloned())
    }
}
