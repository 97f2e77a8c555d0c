use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::submission::{Submission, SubmissionKind};

pub const LEAD_TYPE_B2B: &str = "b2b";

/// Opaque identifier of a persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        RecordId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Initial triage status assigned at persistence time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Unread,
    New,
}

impl RecordStatus {
    pub fn initial_for(kind: SubmissionKind) -> Self {
        match kind {
            SubmissionKind::Quote => RecordStatus::Pending,
            SubmissionKind::Contact => RecordStatus::Unread,
            SubmissionKind::Business => RecordStatus::New,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(flatten)]
    pub submission: Submission,

    pub status: RecordStatus,

    #[serde(rename = "leadType", default, skip_serializing_if = "Option::is_none")]
    pub lead_type: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Attach identifier, persistence instant and lifecycle fields to a submission.
    pub fn stamp(id: RecordId, submission: Submission, created_at: DateTime<Utc>) -> Self {
        let kind = submission.kind();
        let lead_type = match kind {
            SubmissionKind::Business => Some(LEAD_TYPE_B2B.to_string()),
            _ => None,
        };
        StoredRecord {
            id,
            submission,
            status: RecordStatus::initial_for(kind),
            lead_type,
            created_at,
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        self.submission.kind()
    }
}
