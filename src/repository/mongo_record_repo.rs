use async_trait::async_trait;
use bson::doc;
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::config::StorageBackend;
use crate::model::record::StoredRecord;
use crate::model::submission::{Submission, SubmissionKind};
use crate::repository::id_allocator::IdAllocator;
use crate::repository::record_store::RecordStore;
use crate::repository::store_error::{StoreError, StoreResult};

/// Durable record store backed by MongoDB: one collection per submission kind.
pub struct MongoRecordRepository {
    quotes: Collection<StoredRecord>,
    messages: Collection<StoredRecord>,
    business_leads: Collection<StoredRecord>,
    db: Database,
    ids: Arc<dyn IdAllocator>,
}

impl MongoRecordRepository {
    /// Create a new MongoRecordRepository using MongoConfig and check the
    /// server answers before accepting submissions.
    pub async fn new(config: &MongoConfig, ids: Arc<dyn IdAllocator>) -> StoreResult<Self> {
        use mongodb::{options::{ClientOptions, Credential, ResolverConfig}, Client};

        // Parse client options from URI
        let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
            .await
            .map_err(|e| StoreError::connection(format!("Invalid MongoDB URI: {}", e)))?;
        let timeout = std::time::Duration::from_secs(config.connection_timeout_secs);
        client_options.app_name = Some("BatimoveBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(timeout);
        client_options.server_selection_timeout = Some(timeout);

        // Set credentials if username and password are provided
        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }

        let client = Client::with_options(client_options)
            .map_err(|e| StoreError::connection(format!("Failed to create MongoDB client: {}", e)))?;
        let db = client.database(&config.database);

        let repo = MongoRecordRepository {
            quotes: db.collection::<StoredRecord>(config.collection_for(SubmissionKind::Quote)),
            messages: db.collection::<StoredRecord>(config.collection_for(SubmissionKind::Contact)),
            business_leads: db.collection::<StoredRecord>(config.collection_for(SubmissionKind::Business)),
            db,
            ids,
        };
        repo.ping().await?;
        info!(database = %config.database, "MongoDB record store initialized");
        Ok(repo)
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> StoreResult<()> {
        match self.db.run_command(doc! { "ping": 1 }, None).await {
            Ok(_) => {
                debug!("MongoDB ping successful");
                Ok(())
            }
            Err(e) => {
                error!("MongoDB ping failed: {}", e);
                Err(StoreError::connection(format!("MongoDB did not answer ping: {}", e)))
            }
        }
    }

    fn collection(&self, kind: SubmissionKind) -> &Collection<StoredRecord> {
        match kind {
            SubmissionKind::Quote => &self.quotes,
            SubmissionKind::Contact => &self.messages,
            SubmissionKind::Business => &self.business_leads,
        }
    }
}

#[async_trait]
impl RecordStore for MongoRecordRepository {
    #[tracing::instrument(skip(self, submission), fields(kind = %submission.kind()))]
    async fn insert(&self, submission: Submission) -> StoreResult<StoredRecord> {
        let kind = submission.kind();
        let id = self.ids.new_id();
        let record = StoredRecord::stamp(id.clone(), submission, Utc::now());

        // A single-document insert is atomic; _id uniqueness rejects collisions.
        match self.collection(kind).insert_one(&record, None).await {
            Ok(_) => {
                info!(id = %id, collection = %self.collection(kind).name(), "Record inserted");
                Ok(record)
            }
            Err(e) => {
                error!("Failed to insert {} record: {}", kind, e);
                Err(StoreError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredRecord>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": 1 }).build();
        let mut cursor = self.collection(kind).find(None, options).await.map_err(|e| {
            error!("Failed to list {} records: {}", kind, e);
            StoreError::from(e)
        })?;

        let mut records = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    error!("Error reading {} record from cursor: {}", kind, e);
                    return Err(StoreError::database(format!("Failed to read records: {}", e)));
                }
            }
        }
        info!(count = records.len(), "Listed records");
        Ok(records)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Durable
    }
}
