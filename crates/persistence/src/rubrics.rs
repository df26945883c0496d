//! Rubric configuration storage
//!
//! Rubrics are keyed by organization and agent. Only validated rubrics
//! reach `put`; the admin path runs `leadqual_config::validate` first and
//! nothing is stored on a validation failure. An update replaces the prior
//! configuration in a single step.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use leadqual_config::RubricConfig;

use crate::error::PersistenceError;

#[async_trait]
pub trait RubricStore: Send + Sync {
    /// Rubric configured for this organization's agent, if any.
    async fn get(&self, org_id: &str, agent_id: &str)
        -> Result<Option<RubricConfig>, PersistenceError>;

    /// Atomically replace the stored rubric.
    async fn put(
        &self,
        org_id: &str,
        agent_id: &str,
        rubric: RubricConfig,
    ) -> Result<(), PersistenceError>;
}

/// In-memory rubric store for tests and local development.
#[derive(Default)]
pub struct InMemoryRubricStore {
    rubrics: RwLock<HashMap<(String, String), RubricConfig>>,
}

impl InMemoryRubricStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RubricStore for InMemoryRubricStore {
    async fn get(
        &self,
        org_id: &str,
        agent_id: &str,
    ) -> Result<Option<RubricConfig>, PersistenceError> {
        let key = (org_id.to_string(), agent_id.to_string());
        Ok(self.rubrics.read().get(&key).cloned())
    }

    async fn put(
        &self,
        org_id: &str,
        agent_id: &str,
        rubric: RubricConfig,
    ) -> Result<(), PersistenceError> {
        let key = (org_id.to_string(), agent_id.to_string());
        self.rubrics.write().insert(key, rubric);
        tracing::debug!(org_id, agent_id, "Rubric replaced");
        Ok(())
    }
}
