use super::{StorageError, TendencyStore};
use crate::model::{PersonalTendencies, PersonalizationUpdate, PlayerHistory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Entry {
    history: Option<PlayerHistory>,
    tendencies: Option<PersonalTendencies>,
}

/// Process-local store; the default when no database is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, user_id: &str, history: PlayerHistory) {
        let mut map = self.inner.write().await;
        map.entry(user_id.to_string()).or_default().history = Some(history);
    }
}

#[async_trait]
impl TendencyStore for MemoryStore {
    async fn load_history(&self, user_id: &str) -> Result<Option<PlayerHistory>, StorageError> {
        let map = self.inner.read().await;
        Ok(map.get(user_id).and_then(|e| e.history.clone()))
    }

    async fn append_history(
        &self,
        user_id: &str,
        update: &PersonalizationUpdate,
    ) -> Result<(), StorageError> {
        let mut map = self.inner.write().await;
        map.entry(user_id.to_string())
            .or_default()
            .history
            .get_or_insert_with(PlayerHistory::default)
            .merge(update.clone());
        Ok(())
    }

    async fn load_tendencies(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError> {
        let map = self.inner.read().await;
        Ok(map.get(user_id).and_then(|e| e.tendencies.clone()))
    }

    async fn save_tendencies(
        &self,
        user_id: &str,
        tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError> {
        let mut map = self.inner.write().await;
        map.entry(user_id.to_string()).or_default().tendencies = Some(tendencies.clone());
        Ok(())
    }
}
