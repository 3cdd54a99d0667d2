//! In-memory document store.
//!
//! Used by tests and as the local fallback when no blob store is
//! configured. Documents do not survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::client::DocumentStore;
use crate::error::StoreResult;

/// Process-local [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, key: &str, document: Value) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.documents.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = MemoryStore::new();
        store.put("k1", json!({"status": "processing"})).await.unwrap();

        assert_eq!(
            store.get("k1").await.unwrap(),
            Some(json!({"status": "processing"}))
        );
        assert_eq!(store.get("k2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = MemoryStore::new();
        store.put("k1", json!({"status": "processing"})).await.unwrap();
        store.put("k1", json!({"status": "done"})).await.unwrap();

        assert_eq!(store.get("k1").await.unwrap(), Some(json!({"status": "done"})));
    }
}
