//! Student application intake: record schema, storage gateways, service, and HTTP routes.

pub mod domain;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    is_known_program, ApplicationId, ApplicationSubmission, NewApplication, StoredApplication,
    SubmissionReceipt, DEFAULT_COUNTRY, KNOWN_PROGRAMS, SUBMITTED_STATUS,
};
pub use memory::InMemoryApplicationStore;
pub use postgres::PgApplicationStore;
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use schema::SchemaViolation;
pub use service::{ApplicationService, ApplicationServiceError};
