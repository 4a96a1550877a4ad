use async_trait::async_trait;

use super::domain::{ApplicationId, NewApplication, StoredApplication};

/// Storage gateway for the `student_applications` table.
///
/// Records are insert-only: there is no update or delete. Implementations assign the id and
/// both timestamps, and default `application_status` to "submitted".
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Create the backing table if it is missing. Safe to call on every startup.
    async fn initialize(&self) -> Result<(), RepositoryError>;
    async fn insert(&self, application: NewApplication)
        -> Result<StoredApplication, RepositoryError>;
    /// Every record, most recently created first.
    async fn list(&self) -> Result<Vec<StoredApplication>, RepositoryError>;
    async fn fetch(&self, id: ApplicationId) -> Result<Option<StoredApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("insert rejected by store: {0}")]
    InsertFailed(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
