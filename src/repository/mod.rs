pub mod id_allocator;
pub mod memory_record_repo;
pub mod mongo_record_repo;
pub mod record_store;
pub mod store_error;

pub use id_allocator::{IdAllocator, UuidAllocator};
pub use memory_record_repo::InMemoryRecordRepository;
pub use mongo_record_repo::MongoRecordRepository;
pub use record_store::RecordStore;
pub use store_error::{StoreError, StoreResult};
