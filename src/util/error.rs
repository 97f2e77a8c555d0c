use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde::Serialize;
use std::any::Any;
use tower_http::catch_panic::ResponseForPanic;
use tracing::error;

use crate::repository::store_error::StoreError;
use crate::validation::{ValidationError, ValidationFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerErrorKind {
    BadRequest,
    Validation,
    NotFound,
    Internal,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

impl HandlerErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned by every endpoint: `{success:false, error, detail?, errors?}`.
#[derive(Debug, Serialize)]
pub struct HandlerError {
    #[serde(skip)]
    pub kind: HandlerErrorKind,
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl HandlerError {
    pub fn new(kind: HandlerErrorKind, error: impl Into<String>) -> Self {
        HandlerError {
            kind,
            success: false,
            error: error.into(),
            detail: None,
            errors: None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(HandlerErrorKind::BadRequest, "Invalid request body").with_detail(detail)
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(HandlerErrorKind::NotFound, "Not found").with_detail(format!("No route for {}", path))
    }

    pub fn validation(failure: ValidationFailure) -> Self {
        let detail = failure.first().map(ToString::to_string);
        HandlerError {
            detail,
            errors: Some(failure.errors),
            ..Self::new(HandlerErrorKind::Validation, "Validation failed")
        }
    }

    /// Internal failure; the cause is only exposed when `debug` is set.
    pub fn internal(error: impl Into<String>, cause: &dyn std::fmt::Display, debug: bool) -> Self {
        let err = Self::new(HandlerErrorKind::Internal, error);
        if debug {
            err.with_detail(cause.to_string())
        } else {
            err
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

/// Turns a panicking handler into the generic 500 body.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    pub debug: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let message = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic payload");
        error!("Request handler panicked: {}", message);
        HandlerError::internal("Internal server error", &message, self.debug).into_response()
    }
}

/// Failure of one intake request at the orchestrator boundary.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("failed to persist submission: {0}")]
    Store(#[from] StoreError),
}
