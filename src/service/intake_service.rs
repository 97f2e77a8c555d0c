use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::StorageBackend;
use crate::model::record::{RecordId, StoredRecord};
use crate::model::submission::SubmissionKind;
use crate::repository::record_store::RecordStore;
use crate::repository::store_error::StoreError;
use crate::service::notification_service::Notifier;
use crate::util::error::IntakeError;
use crate::validation;

pub const QUOTE_CONFIRMATION: &str =
    "Votre demande de devis a été enregistrée avec succès. Nous vous contacterons sous 24h.";
pub const CONTACT_CONFIRMATION: &str =
    "Votre message a été envoyé avec succès. Nous vous répondrons dans les plus brefs délais.";
pub const BUSINESS_CONFIRMATION: &str =
    "Merci pour votre intérêt. Notre équipe commerciale vous contactera sous 48h pour discuter de vos besoins.";

pub fn confirmation_for(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Quote => QUOTE_CONFIRMATION,
        SubmissionKind::Contact => CONTACT_CONFIRMATION,
        SubmissionKind::Business => BUSINESS_CONFIRMATION,
    }
}

/// Lifecycle stages of a single submission, as they appear in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Rejected,
    Persisted,
    Notified,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Rejected => "rejected",
            Stage::Persisted => "persisted",
            Stage::Notified => "notified",
            Stage::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    /// Stored, but the operator was not told. Carries the delivery error.
    Degraded(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeReceipt {
    pub id: RecordId,
    pub kind: SubmissionKind,
    pub message: &'static str,
    pub notification: NotificationOutcome,
}

#[async_trait]
pub trait IntakeService: Send + Sync {
    /// Validate, persist, then notify. Notification is best-effort.
    async fn submit(&self, kind: SubmissionKind, payload: &Value) -> Result<IntakeReceipt, IntakeError>;

    async fn list_submissions(&self, kind: SubmissionKind) -> Result<Vec<StoredRecord>, StoreError>;

    fn storage_backend(&self) -> StorageBackend;
}

pub struct IntakeServiceImpl {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl IntakeServiceImpl {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        IntakeServiceImpl { store, notifier }
    }
}

#[async_trait]
impl IntakeService for IntakeServiceImpl {
    #[instrument(skip(self, payload), fields(kind = %kind))]
    async fn submit(&self, kind: SubmissionKind, payload: &Value) -> Result<IntakeReceipt, IntakeError> {
        debug!(stage = %Stage::Received, "Submission received");

        let submission = match validation::validate(kind, payload) {
            Ok(submission) => submission,
            Err(failure) => {
                info!(stage = %Stage::Rejected, violations = failure.errors.len(), "Submission rejected: {}", failure);
                return Err(IntakeError::Validation(failure));
            }
        };
        debug!(stage = %Stage::Validated, submitter = %submission.submitter_email(), "Submission validated");

        let record = self.store.insert(submission).await.map_err(|e| {
            error!("Failed to persist {} submission: {}", kind, e);
            IntakeError::Store(e)
        })?;
        let id = record.id.clone();
        info!(stage = %Stage::Persisted, id = %id, "Submission persisted");

        let notification = match self.notifier.notify(&record).await {
            Ok(()) => {
                info!(stage = %Stage::Notified, id = %id, "Operator notified");
                NotificationOutcome::Delivered
            }
            Err(e) => {
                warn!(id = %id, degraded = true, "Submission stored but operator notification failed: {}", e);
                NotificationOutcome::Degraded(e.to_string())
            }
        };

        info!(stage = %Stage::Completed, id = %id, "Submission completed");
        Ok(IntakeReceipt {
            id,
            kind,
            message: confirmation_for(kind),
            notification,
        })
    }

    async fn list_submissions(&self, kind: SubmissionKind) -> Result<Vec<StoredRecord>, StoreError> {
        self.store.list_all(kind).await
    }

    fn storage_backend(&self) -> StorageBackend {
        self.store.backend()
    }
}
