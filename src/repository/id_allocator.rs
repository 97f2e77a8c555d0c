use crate::model::record::RecordId;

/// Hands out identifiers for accepted submissions.
///
/// Implementations must never return the same identifier twice, including
/// under concurrent calls.
pub trait IdAllocator: Send + Sync {
    fn new_id(&self) -> RecordId;
}

/// Random UUID v4 identifiers. Collision-free with overwhelming probability
/// within and across process lifetimes; needs no shared state.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidAllocator;

impl IdAllocator for UuidAllocator {
    fn new_id(&self) -> RecordId {
        RecordId::new(uuid::Uuid::new_v4().to_string())
    }
}
