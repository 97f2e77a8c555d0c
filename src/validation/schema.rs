//! Presence and JSON-type checks run before the typed rule pass, so that
//! missing or mistyped fields are reported with their path instead of as a
//! single deserialization failure.

use serde_json::{Map, Value};
use std::str::FromStr;

use crate::model::submission::{ServiceId, SubmissionKind};
use crate::validation::{ValidationError, ViolationKind};

#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldType {
    Text,
    Integer,
    Number,
    Service,
    Object(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

const fn required(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty, required: true }
}

const fn optional(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty, required: false }
}

const CONTACT_INFO: &[FieldSpec] = &[
    required("name", FieldType::Text),
    required("email", FieldType::Text),
    required("phone", FieldType::Text),
];

const QUOTE_REQUEST: &[FieldSpec] = &[
    required("serviceId", FieldType::Service),
    required("date", FieldType::Text),
    required("contact", FieldType::Object(CONTACT_INFO)),
    optional("fromZip", FieldType::Text),
    optional("toZip", FieldType::Text),
    optional("volume", FieldType::Integer),
    optional("rooms", FieldType::Number),
    optional("housingType", FieldType::Text),
    optional("surface", FieldType::Integer),
    optional("duration", FieldType::Text),
    optional("floor", FieldType::Integer),
];

const CONTACT_MESSAGE: &[FieldSpec] = &[
    required("name", FieldType::Text),
    required("email", FieldType::Text),
    required("subject", FieldType::Text),
    required("message", FieldType::Text),
];

const BUSINESS_LEAD: &[FieldSpec] = &[
    required("companyName", FieldType::Text),
    required("contactName", FieldType::Text),
    required("email", FieldType::Text),
    required("phone", FieldType::Text),
    optional("employeeCount", FieldType::Text),
    required("serviceNeeds", FieldType::Text),
];

pub(crate) fn fields_of(kind: SubmissionKind) -> &'static [FieldSpec] {
    match kind {
        SubmissionKind::Quote => QUOTE_REQUEST,
        SubmissionKind::Contact => CONTACT_MESSAGE,
        SubmissionKind::Business => BUSINESS_LEAD,
    }
}

/// Every field path of a kind in declaration order, nested fields right
/// after their parent.
pub(crate) fn field_paths(kind: SubmissionKind) -> Vec<String> {
    fn walk(fields: &[FieldSpec], prefix: &str, out: &mut Vec<String>) {
        for field in fields {
            let path = join_path(prefix, field.name);
            out.push(path.clone());
            if let FieldType::Object(nested) = field.ty {
                walk(nested, &path, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(fields_of(kind), "", &mut out);
    out
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

pub(crate) fn check(kind: SubmissionKind, object: &Map<String, Value>) -> Vec<ValidationError> {
    let mut violations = Vec::new();
    check_fields(fields_of(kind), object, "", &mut violations);
    violations
}

fn check_fields(fields: &[FieldSpec], object: &Map<String, Value>, prefix: &str, out: &mut Vec<ValidationError>) {
    for field in fields {
        let path = join_path(prefix, field.name);
        let value = match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    out.push(ValidationError::new(path, ViolationKind::Missing, "field required"));
                }
                continue;
            }
            Some(value) => value,
        };

        match field.ty {
            FieldType::Text if !value.is_string() => {
                out.push(ValidationError::new(path, ViolationKind::InvalidType, "must be a string"));
            }
            FieldType::Integer if whole_number(value).is_none() => {
                out.push(ValidationError::new(path, ViolationKind::InvalidType, "must be an integer"));
            }
            FieldType::Number if !value.is_number() => {
                out.push(ValidationError::new(path, ViolationKind::InvalidType, "must be a number"));
            }
            FieldType::Service => match value.as_str() {
                None => out.push(ValidationError::new(path, ViolationKind::InvalidType, "must be a string")),
                Some(raw) if ServiceId::from_str(raw).is_err() => {
                    let allowed: Vec<&str> = ServiceId::ALL.iter().map(|id| id.as_str()).collect();
                    out.push(ValidationError::new(
                        path,
                        ViolationKind::InvalidEnum,
                        format!("must be one of: {}", allowed.join(", ")),
                    ));
                }
                Some(_) => {}
            },
            FieldType::Object(nested) => match value.as_object() {
                Some(inner) => check_fields(nested, inner, &path, out),
                None => out.push(ValidationError::new(path, ViolationKind::InvalidType, "must be an object")),
            },
            _ => {}
        }
    }
}

/// An integer, or a float with no fractional part such as `45.0`.
fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Rewrite whole-valued floats in integer fields as integers so the typed
/// pass can deserialize them.
pub(crate) fn coerce_integers(kind: SubmissionKind, object: &mut Map<String, Value>) {
    fn walk(fields: &[FieldSpec], object: &mut Map<String, Value>) {
        for field in fields {
            match (field.ty, object.get_mut(field.name)) {
                (FieldType::Integer, Some(value)) => {
                    if let Some(whole) = whole_number(value) {
                        *value = Value::from(whole);
                    }
                }
                (FieldType::Object(nested), Some(Value::Object(inner))) => walk(nested, inner),
                _ => {}
            }
        }
    }
    walk(fields_of(kind), object);
}
