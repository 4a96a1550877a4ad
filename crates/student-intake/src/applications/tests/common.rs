use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::applications::domain::{
    ApplicationId, ApplicationSubmission, NewApplication, StoredApplication,
};
use crate::applications::memory::InMemoryApplicationStore;
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::{application_router, ApplicationService};

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        phone: Some("555-0100".to_string()),
        date_of_birth: Some("1815-12-10".to_string()),
        address: Some("1 Analytics Way".to_string()),
        city: Some("London".to_string()),
        state: Some("N/A".to_string()),
        zip_code: Some("00000".to_string()),
        country: None,
        program_of_interest: Some("Computer Science".to_string()),
        previous_education: Some("Self-taught".to_string()),
        gpa: None,
        test_scores: None,
        extracurricular_activities: None,
        personal_statement: Some("...".to_string()),
    }
}

pub(super) fn complete_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        country: Some("United Kingdom".to_string()),
        gpa: Some(Decimal::new(385, 2)),
        test_scores: Some("SAT 1520".to_string()),
        extracurricular_activities: Some("Mathematics society".to_string()),
        ..submission()
    }
}

pub(super) fn build_service() -> (
    ApplicationService<InMemoryApplicationStore>,
    InMemoryApplicationStore,
) {
    let repository = InMemoryApplicationStore::default();
    let service = ApplicationService::new(Arc::new(repository.clone()));
    (service, repository)
}

pub(super) fn router_with_service(
    service: ApplicationService<InMemoryApplicationStore>,
) -> axum::Router {
    application_router(Arc::new(service))
}

/// Gateway whose store is unreachable for every call.
pub(super) struct UnavailableRepository;

#[async_trait]
impl ApplicationRepository for UnavailableRepository {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn insert(
        &self,
        _application: NewApplication,
    ) -> Result<StoredApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<StoredApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(
        &self,
        _id: ApplicationId,
    ) -> Result<Option<StoredApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Gateway that refuses every row, as a constraint violation would.
pub(super) struct RejectingRepository;

#[async_trait]
impl ApplicationRepository for RejectingRepository {
    async fn initialize(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn insert(
        &self,
        _application: NewApplication,
    ) -> Result<StoredApplication, RepositoryError> {
        Err(RepositoryError::InsertFailed(
            "null value in column \"last_name\" violates not-null constraint".to_string(),
        ))
    }

    async fn list(&self) -> Result<Vec<StoredApplication>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn fetch(
        &self,
        _id: ApplicationId,
    ) -> Result<Option<StoredApplication>, RepositoryError> {
        Ok(None)
    }
}

pub(super) fn assert_error_body(payload: &Value, message: &str) {
    assert_eq!(
        payload.get("error").and_then(Value::as_str),
        Some(message),
        "unexpected error payload: {payload}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}
