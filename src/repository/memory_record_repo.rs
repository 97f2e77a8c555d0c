use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::StorageBackend;
use crate::model::record::{RecordId, StoredRecord};
use crate::model::submission::{Submission, SubmissionKind};
use crate::repository::id_allocator::{IdAllocator, UuidAllocator};
use crate::repository::record_store::RecordStore;
use crate::repository::store_error::{StoreError, StoreResult};

type Table = HashMap<RecordId, StoredRecord>;

/// Ephemeral in-process record store for local development.
///
/// **Not durable.** Records live only as long as this process, are lost on
/// restart, and are invisible to any other process. Never use it where
/// submissions must be kept.
pub struct InMemoryRecordRepository {
    tables: RwLock<HashMap<SubmissionKind, Table>>,
    ids: Arc<dyn IdAllocator>,
}

impl InMemoryRecordRepository {
    pub fn new(ids: Arc<dyn IdAllocator>) -> Self {
        warn!("Using in-memory record store: data will NOT be persisted and is lost on restart");
        InMemoryRecordRepository {
            tables: RwLock::new(HashMap::new()),
            ids,
        }
    }

    pub async fn len(&self, kind: SubmissionKind) -> usize {
        self.tables.read().await.get(&kind).map_or(0, HashMap::len)
    }
}

impl Default for InMemoryRecordRepository {
    fn default() -> Self {
        Self::new(Arc::new(UuidAllocator))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordRepository {
    #[tracing::instrument(skip(self, submission), fields(kind = %submission.kind()))]
    async fn insert(&self, submission: Submission) -> StoreResult<StoredRecord> {
        let kind = submission.kind();
        let id = self.ids.new_id();

        let mut tables = self.tables.write().await;
        let table = tables.entry(kind).or_default();
        if table.contains_key(&id) {
            return Err(StoreError::already_exists(format!("{} record {} already stored", kind, id)));
        }
        // Stamped under the lock so createdAt is the instant of persistence.
        let record = StoredRecord::stamp(id.clone(), submission, Utc::now());
        table.insert(id.clone(), record.clone());
        info!(id = %id, "[DEV MODE] Record stored in memory");
        Ok(record)
    }

    async fn list_all(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<StoredRecord> = tables
            .get(&kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        debug!(kind = %kind, count = records.len(), "Listed in-memory records");
        Ok(records)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Ephemeral
    }
}
