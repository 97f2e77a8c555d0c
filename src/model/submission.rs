use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::validation::rules::{validate_email_address, validate_iso8601_date, validate_phone_number};

/// The three kinds of form submission the intake pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Quote,
    Contact,
    Business,
}

impl SubmissionKind {
    pub const ALL: [SubmissionKind; 3] = [SubmissionKind::Quote, SubmissionKind::Contact, SubmissionKind::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Quote => "quote",
            SubmissionKind::Contact => "contact",
            SubmissionKind::Business => "business",
        }
    }

    /// Plural label used for collections and the diagnostic listing route.
    pub fn collection_label(&self) -> &'static str {
        match self {
            SubmissionKind::Quote => "quotes",
            SubmissionKind::Contact => "messages",
            SubmissionKind::Business => "business_leads",
        }
    }

    pub fn from_collection_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.collection_label() == label)
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown service id '{0}'")]
pub struct UnknownServiceId(pub String);

/// Services offered on the quote form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Priv,
    Pro,
    Clean,
    Storage,
    Lift,
    Inter,
    General,
}

impl ServiceId {
    pub const ALL: [ServiceId; 7] = [
        ServiceId::Priv,
        ServiceId::Pro,
        ServiceId::Clean,
        ServiceId::Storage,
        ServiceId::Lift,
        ServiceId::Inter,
        ServiceId::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Priv => "priv",
            ServiceId::Pro => "pro",
            ServiceId::Clean => "clean",
            ServiceId::Storage => "storage",
            ServiceId::Lift => "lift",
            ServiceId::Inter => "inter",
            ServiceId::General => "general",
        }
    }

    /// Name shown to the operator in notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceId::Priv => "Déménagement Privé",
            ServiceId::Pro => "Transfert Pro",
            ServiceId::Clean => "Nettoyage",
            ServiceId::Storage => "Garde-Meubles",
            ServiceId::Lift => "Monte-Meubles",
            ServiceId::Inter => "International",
            ServiceId::General => "Sur Mesure",
        }
    }
}

impl FromStr for ServiceId {
    type Err = UnknownServiceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownServiceId(s.to_string()))
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    /// Stored as submitted; separators are only stripped for the format check.
    #[validate(length(min = 8, max = 20), custom(function = "validate_phone_number"))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub service_id: ServiceId,

    #[validate(custom(function = "validate_iso8601_date"))]
    pub date: String,

    #[validate(nested)]
    pub contact: ContactInfo,

    #[validate(length(max = 10))]
    pub from_zip: Option<String>,

    #[validate(length(max = 10))]
    pub to_zip: Option<String>,

    /// Cubic meters.
    #[validate(range(min = 0))]
    pub volume: Option<i64>,

    /// Fractional values like 2.5 are allowed.
    #[validate(range(min = 0.0))]
    pub rooms: Option<f64>,

    #[validate(length(max = 50))]
    pub housing_type: Option<String>,

    /// Square meters.
    #[validate(range(min = 0))]
    pub surface: Option<i64>,

    pub duration: Option<String>,

    #[validate(range(min = 0, max = 100))]
    pub floor: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 10, max = 2000))]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessLead {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,

    #[validate(length(min = 1, max = 100))]
    pub contact_name: String,

    #[validate(custom(function = "validate_email_address"))]
    pub email: String,

    #[validate(length(min = 8, max = 20), custom(function = "validate_phone_number"))]
    pub phone: String,

    pub employee_count: Option<String>,

    #[validate(length(min = 10, max = 1000))]
    pub service_needs: String,
}

/// A validated submission. Immutable once produced by the validator.
///
/// Untagged so a stored document reads back as its flattened fields; the
/// required fields of each variant are disjoint enough to pick the right one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Submission {
    Quote(QuoteRequest),
    Contact(ContactMessage),
    Business(BusinessLead),
}

impl Submission {
    pub fn kind(&self) -> SubmissionKind {
        match self {
            Submission::Quote(_) => SubmissionKind::Quote,
            Submission::Contact(_) => SubmissionKind::Contact,
            Submission::Business(_) => SubmissionKind::Business,
        }
    }

    /// Email address of whoever sent the submission.
    pub fn submitter_email(&self) -> &str {
        match self {
            Submission::Quote(quote) => &quote.contact.email,
            Submission::Contact(message) => &message.email,
            Submission::Business(lead) => &lead.email,
        }
    }
}
