use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{StatusCode, Uri},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::StorageBackend;
use crate::dto::intake_dto::{ApiInfoDto, EndpointsDto, RecordListDto, StatusResponseDto, SubmissionResponseDto};
use crate::model::submission::SubmissionKind;
use crate::service::intake_service::{IntakeService, NotificationOutcome};
use crate::util::error::{HandlerError, HandlerErrorKind, IntakeError};
use crate::validation::ViolationKind;

/// Shared state of the intake routes.
#[derive(Clone)]
pub struct IntakeState {
    pub service: Arc<dyn IntakeService>,
    /// Expose internal error detail in 5xx bodies.
    pub debug: bool,
}

type SubmissionResult = Result<(StatusCode, Json<SubmissionResponseDto>), HandlerError>;

pub async fn create_quote_handler(
    State(state): State<IntakeState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> SubmissionResult {
    handle_submission(&state, SubmissionKind::Quote, payload).await
}

pub async fn create_contact_handler(
    State(state): State<IntakeState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> SubmissionResult {
    handle_submission(&state, SubmissionKind::Contact, payload).await
}

pub async fn create_business_handler(
    State(state): State<IntakeState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> SubmissionResult {
    handle_submission(&state, SubmissionKind::Business, payload).await
}

fn failure_message(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Quote => "Failed to create quote",
        SubmissionKind::Contact => "Failed to send message",
        SubmissionKind::Business => "Failed to submit business inquiry",
    }
}

async fn handle_submission(
    state: &IntakeState,
    kind: SubmissionKind,
    payload: Result<Json<Value>, JsonRejection>,
) -> SubmissionResult {
    let Json(body) = payload.map_err(|rejection| {
        warn!(kind = %kind, "Rejected unreadable request body: {}", rejection);
        HandlerError::bad_request(rejection.body_text())
    })?;

    match state.service.submit(kind, &body).await {
        Ok(receipt) => {
            if let NotificationOutcome::Degraded(reason) = &receipt.notification {
                warn!(id = %receipt.id, "Responding success with degraded notification: {}", reason);
            }
            info!(id = %receipt.id, kind = %kind, "Submission accepted");
            Ok((StatusCode::CREATED, Json(SubmissionResponseDto::from(receipt))))
        }
        Err(IntakeError::Validation(failure)) => {
            // A body that is valid JSON but not an object is a malformed request, not a rule violation.
            if failure.errors.iter().any(|e| e.kind == ViolationKind::Malformed) {
                let reason = failure.first().map(|e| e.reason.clone()).unwrap_or_default();
                return Err(HandlerError::bad_request(reason));
            }
            Err(HandlerError::validation(failure))
        }
        Err(IntakeError::Store(e)) => {
            error!(kind = %kind, "Submission could not be stored: {}", e);
            Err(HandlerError::internal(failure_message(kind), &e, state.debug))
        }
    }
}

pub async fn root_handler(State(state): State<IntakeState>) -> Json<StatusResponseDto> {
    Json(StatusResponseDto {
        message: "Batimove API is running",
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
        mode: state.service.storage_backend().mode_name(),
    })
}

pub async fn api_info_handler() -> Json<ApiInfoDto> {
    Json(ApiInfoDto {
        message: "Batimove API",
        endpoints: EndpointsDto {
            quote: "/api/quote",
            contact: "/api/contact",
            business: "/api/business",
        },
    })
}

pub async fn health_handler() -> &'static str {
    "OK"
}

/// Diagnostic dump of one collection. Only served by the ephemeral backend.
pub async fn list_records_handler(
    State(state): State<IntakeState>,
    Path(collection): Path<String>,
) -> Result<Json<RecordListDto>, HandlerError> {
    if state.service.storage_backend() != StorageBackend::Ephemeral {
        return Err(HandlerError::not_found(&format!("/api/dev/{}", collection)));
    }
    let kind = SubmissionKind::from_collection_label(&collection).ok_or_else(|| {
        HandlerError::new(HandlerErrorKind::NotFound, "Unknown collection")
            .with_detail("expected one of: quotes, messages, business_leads")
    })?;

    let records = state.service.list_submissions(kind).await.map_err(|e| {
        error!("Failed to list {} records: {}", kind, e);
        HandlerError::internal("Failed to list records", &e, state.debug)
    })?;
    Ok(Json(RecordListDto {
        collection: kind.collection_label(),
        count: records.len(),
        records,
    }))
}

pub async fn fallback_handler(uri: Uri) -> HandlerError {
    HandlerError::not_found(uri.path())
}
