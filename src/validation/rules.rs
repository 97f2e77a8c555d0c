//! Field rules plugged into `#[validate(custom(function = ...))]`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::borrow::Cow;
use validator::{ValidateEmail, ValidationError};

/// Code carried by every custom rule failure.
pub const INVALID_FORMAT: &str = "invalid_format";

const PHONE_SEPARATORS: [char; 4] = [' ', '-', '(', ')'];

const NAIVE_DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

// Offset forms RFC 3339 leaves out: minute precision and a space separator.
const OFFSET_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

fn format_error(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(INVALID_FORMAT);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// True when `phone`, once spaces, hyphens and parentheses are removed, is
/// decimal digits with at most one leading `+`.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| !PHONE_SEPARATORS.contains(c)).collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(format_error("must contain only digits, spaces, hyphens, parentheses and an optional leading +"))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let dotted_domain = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    dotted_domain && email.to_string().validate_email()
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(format_error("must be a valid email address"))
    }
}

/// Parse an ISO-8601 date or datetime. A trailing `Z` means UTC; naive
/// values are taken as UTC; a bare date is midnight UTC.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    let with_offset = match value.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(&with_offset, format) {
            return Some(instant.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn validate_iso8601_date(value: &str) -> Result<(), ValidationError> {
    match parse_iso8601(value) {
        Some(_) => Ok(()),
        None => Err(format_error("must be an ISO 8601 date or datetime")),
    }
}
