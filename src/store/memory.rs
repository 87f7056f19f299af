//! In-process run store
//!
//! Records live only as long as the store; nothing is written to disk.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{newest_first, RunRecord, RunStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryRunStore {
    records: RwLock<Vec<RunRecord>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn save(&self, record: &RunRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RunRecord>, StoreError> {
        let records = self.records.read().await.clone();
        Ok(newest_first(records, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::record;

    #[tokio::test]
    async fn test_recent_newest_first() {
        let store = MemoryRunStore::new();
        store.save(&record("a", 1)).await.unwrap();
        store.save(&record("b", 3)).await.unwrap();
        store.save(&record("c", 2)).await.unwrap();

        let recent = store.recent(2).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
