use async_trait::async_trait;

use crate::config::StorageBackend;
use crate::model::record::{RecordId, StoredRecord};
use crate::model::submission::{Submission, SubmissionKind};
use crate::repository::store_error::StoreResult;

/// Persistence for validated submissions.
///
/// `save` is all-or-nothing from the caller's point of view: either the
/// stamped record is fully visible under the returned identifier, or an error
/// is returned and nothing was written. A save never overwrites an existing
/// record. Implementations must be safe to call concurrently.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Allocate an identifier, stamp `createdAt` and lifecycle fields, write.
    /// Returns the record exactly as stored.
    async fn insert(&self, submission: Submission) -> StoreResult<StoredRecord>;

    async fn save(&self, submission: Submission) -> StoreResult<RecordId> {
        self.insert(submission).await.map(|record| record.id)
    }

    /// Every stored record of `kind`, oldest first. Diagnostic use only.
    async fn list_all(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredRecord>>;

    fn backend(&self) -> StorageBackend;
}
