use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::domain::ApplicationSubmission;
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationService, ApplicationServiceError};

pub const SUBMIT_FAILED: &str = "Failed to submit application";
pub const LIST_FAILED: &str = "Failed to fetch applications";
pub const FETCH_FAILED: &str = "Failed to fetch application";
pub const NOT_FOUND: &str = "Application not found";
pub const INVALID_PAYLOAD: &str = "Invalid application payload";

/// Router builder exposing the submission and review endpoints.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/applications/:id", get(fetch_handler::<R>))
        .with_state(service)
}

// serde would otherwise build the struct from a positional array as well.
fn submission_from_body(body: Value) -> Result<ApplicationSubmission, String> {
    if !body.is_object() {
        return Err("body is not a JSON object".to_string());
    }
    serde_json::from_value(body).map_err(|err| err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let submission = match payload {
        Ok(Json(body)) => match submission_from_body(body) {
            Ok(submission) => submission,
            Err(reason) => {
                warn!(%reason, "rejected malformed application payload");
                return error_response(StatusCode::BAD_REQUEST, INVALID_PAYLOAD);
            }
        },
        Err(rejection) => {
            warn!(error = %rejection, "rejected malformed application payload");
            return error_response(StatusCode::BAD_REQUEST, INVALID_PAYLOAD);
        }
    };

    match service.submit(submission).await {
        Ok(record) => (StatusCode::OK, Json(record.receipt())).into_response(),
        Err(ApplicationServiceError::Validation(violation)) => {
            warn!(%violation, "application failed schema validation");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &violation.to_string())
        }
        Err(ApplicationServiceError::Repository(err)) => {
            error!(error = %err, "error inserting application");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SUBMIT_FAILED)
        }
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<ApplicationService<R>>>) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => {
            error!(error = %err, "error fetching applications");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, LIST_FAILED)
        }
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, NOT_FOUND)
        }
        Err(err) => {
            error!(application_id = %id, error = %err, "error fetching application");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED)
        }
    }
}
