//! Fact record storage

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use leadqual_core::{ConversationId, FactRecord};

use crate::error::PersistenceError;

/// Storage for per-conversation fact records.
///
/// Callers serialize writes per conversation id; the store only guarantees
/// that each individual get/put is atomic.
#[async_trait]
pub trait FactStore: Send + Sync {
    async fn get(&self, conversation_id: ConversationId)
        -> Result<Option<FactRecord>, PersistenceError>;

    /// Insert or replace the record for its conversation.
    async fn put(&self, record: FactRecord) -> Result<(), PersistenceError>;
}

/// In-memory fact store for tests and local development.
#[derive(Default)]
pub struct InMemoryFactStore {
    records: RwLock<HashMap<ConversationId, FactRecord>>,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn get(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Option<FactRecord>, PersistenceError> {
        Ok(self.records.read().get(&conversation_id).cloned())
    }

    async fn put(&self, record: FactRecord) -> Result<(), PersistenceError> {
        self.records.write().insert(record.conversation_id, record);
        Ok(())
    }
}
