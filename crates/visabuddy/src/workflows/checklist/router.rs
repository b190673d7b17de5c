use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::context::ApplicationContextProvider;
use super::domain::ApplicationId;
use super::gate::{ChecklistGateError, ChecklistRequestGate};
use super::generator::CompletionGateway;
use super::store::{ChecklistStore, StoreError};

/// Router builder exposing the checklist endpoints.
pub fn checklist_router<S, C, P>(gate: Arc<ChecklistRequestGate<S, C, P>>) -> Router
where
    S: ChecklistStore + 'static,
    C: CompletionGateway + 'static,
    P: ApplicationContextProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/:application_id/checklist",
            post(request_handler::<S, C, P>).get(peek_handler::<S, C, P>),
        )
        .with_state(gate)
}

/// POST handler: idempotent request-or-create. The gate may sit on a
/// long-latency model call, so it runs on the blocking pool.
pub(crate) async fn request_handler<S, C, P>(
    State(gate): State<Arc<ChecklistRequestGate<S, C, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ChecklistStore + 'static,
    C: CompletionGateway + 'static,
    P: ApplicationContextProvider + 'static,
{
    let id = ApplicationId(application_id);
    let result = tokio::task::spawn_blocking(move || gate.request_checklist(&id)).await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, axum::Json(response)).into_response(),
        Ok(Err(error)) => gate_error_response(error),
        Err(join_error) => {
            let payload = json!({ "error": format!("checklist worker failed: {join_error}") });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// GET handler: read-only view, never claims.
pub(crate) async fn peek_handler<S, C, P>(
    State(gate): State<Arc<ChecklistRequestGate<S, C, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ChecklistStore + 'static,
    C: CompletionGateway + 'static,
    P: ApplicationContextProvider + 'static,
{
    let id = ApplicationId(application_id);
    match gate.peek(&id) {
        Ok(Some(response)) => (StatusCode::OK, axum::Json(response)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("no checklist generation recorded for application {}", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => gate_error_response(error),
    }
}

fn gate_error_response(error: ChecklistGateError) -> Response {
    let status = match &error {
        ChecklistGateError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ChecklistGateError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
