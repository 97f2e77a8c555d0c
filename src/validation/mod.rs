//! Submission validation.
//!
//! `validate` is a pure function of its input: it never touches storage or
//! the network. Violations are collected rather than short-circuited, and are
//! reported in schema field order with dotted paths (`contact.phone`).

pub mod rules;
pub(crate) mod schema;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::model::submission::{BusinessLead, ContactMessage, QuoteRequest, Submission, SubmissionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The payload as a whole is not a JSON object.
    Malformed,
    Missing,
    InvalidType,
    InvalidLength,
    OutOfRange,
    InvalidEnum,
    InvalidFormat,
}

/// One rule violation, addressed by field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub kind: ViolationKind,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ViolationKind, reason: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Every violation found in a rejected payload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid submission: {}", summarize(.errors))]
pub struct ValidationFailure {
    pub errors: Vec<ValidationError>,
}

impl ValidationFailure {
    fn single(error: ValidationError) -> Self {
        ValidationFailure { errors: vec![error] }
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.field == field)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Check `raw` against the schema of `kind` and return the typed submission.
pub fn validate(kind: SubmissionKind, raw: &Value) -> Result<Submission, ValidationFailure> {
    let object = raw.as_object().ok_or_else(|| {
        ValidationFailure::single(ValidationError::new(
            "body",
            ViolationKind::Malformed,
            "request body must be a JSON object",
        ))
    })?;

    let mut violations = schema::check(kind, object);
    if !violations.is_empty() {
        sort_by_schema_order(kind, &mut violations);
        return Err(ValidationFailure { errors: violations });
    }

    let mut normalized = object.clone();
    schema::coerce_integers(kind, &mut normalized);
    let raw = &Value::Object(normalized);

    match kind {
        SubmissionKind::Quote => typed::<QuoteRequest>(kind, raw).map(Submission::Quote),
        SubmissionKind::Contact => typed::<ContactMessage>(kind, raw).map(Submission::Contact),
        SubmissionKind::Business => typed::<BusinessLead>(kind, raw).map(Submission::Business),
    }
}

fn typed<T>(kind: SubmissionKind, raw: &Value) -> Result<T, ValidationFailure>
where
    T: DeserializeOwned + Validate,
{
    // The schema pass has already vetted presence and JSON types.
    let record: T = serde::Deserialize::deserialize(raw).map_err(|err: serde_json::Error| {
        ValidationFailure::single(ValidationError::new("body", ViolationKind::InvalidType, err.to_string()))
    })?;

    if let Err(errors) = record.validate() {
        let mut violations = Vec::new();
        collect_violations(&errors, "", &mut violations);
        sort_by_schema_order(kind, &mut violations);
        return Err(ValidationFailure { errors: violations });
    }
    Ok(record)
}

fn sort_by_schema_order(kind: SubmissionKind, violations: &mut [ValidationError]) {
    let order = schema::field_paths(kind);
    violations.sort_by_key(|violation| {
        order
            .iter()
            .position(|path| *path == violation.field)
            .unwrap_or(order.len())
    });
}

fn collect_violations(errors: &ValidationErrors, prefix: &str, out: &mut Vec<ValidationError>) {
    for (field, kind) in errors.errors() {
        let path = schema::join_path(prefix, &to_camel_case(&**field));
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|error| violation_from(&path, error)));
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Rust field idents are snake_case; payload fields are camelCase.
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn violation_from(path: &str, error: &validator::ValidationError) -> ValidationError {
    match &*error.code {
        "length" => ValidationError::new(path, ViolationKind::InvalidLength, length_reason(error)),
        "range" => ValidationError::new(path, ViolationKind::OutOfRange, range_reason(error)),
        _ => {
            let reason = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| "has an invalid format".to_string());
            ValidationError::new(path, ViolationKind::InvalidFormat, reason)
        }
    }
}

fn param<'a>(error: &'a validator::ValidationError, name: &str) -> Option<&'a Value> {
    error.params.get(name)
}

fn length_reason(error: &validator::ValidationError) -> String {
    let min = param(error, "min").and_then(Value::as_u64);
    let max = param(error, "max").and_then(Value::as_u64);
    let length = param(error, "value")
        .and_then(Value::as_str)
        .map(|value| value.chars().count() as u64);

    match (min, max, length) {
        (Some(min), _, Some(length)) if length < min => format!("must be at least {} characters", min),
        (_, Some(max), Some(length)) if length > max => format!("must be at most {} characters", max),
        (Some(min), Some(max), _) => format!("must be between {} and {} characters", min, max),
        (Some(min), None, _) => format!("must be at least {} characters", min),
        (None, Some(max), _) => format!("must be at most {} characters", max),
        (None, None, _) => "has an invalid length".to_string(),
    }
}

fn range_reason(error: &validator::ValidationError) -> String {
    match (param(error, "min"), param(error, "max")) {
        (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
        (Some(min), None) => format!("must be greater than or equal to {}", min),
        (None, Some(max)) => format!("must be less than or equal to {}", max),
        (None, None) => "is out of range".to_string(),
    }
}
