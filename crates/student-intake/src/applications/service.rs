use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{is_known_program, ApplicationId, ApplicationSubmission, StoredApplication};
use super::repository::{ApplicationRepository, RepositoryError};
use super::schema::{self, SchemaViolation};

/// Service composing the record schema with a storage gateway.
pub struct ApplicationService<R> {
    repository: Arc<R>,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and persist a new application.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<StoredApplication, ApplicationServiceError> {
        let application = schema::validate(submission)?;
        if !is_known_program(&application.program_of_interest) {
            debug!(
                program = %application.program_of_interest,
                "application names a program outside the published list"
            );
        }

        let stored = self.repository.insert(application).await?;
        info!(application_id = %stored.id, "student application stored");
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<StoredApplication>, ApplicationServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Fetch one application by the raw id taken from a request path.
    pub async fn get(&self, raw_id: &str) -> Result<StoredApplication, ApplicationServiceError> {
        let id = ApplicationId::parse(raw_id).ok_or(RepositoryError::NotFound)?;
        let record = self
            .repository
            .fetch(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] SchemaViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApplicationServiceError::Repository(RepositoryError::NotFound)
        )
    }
}
