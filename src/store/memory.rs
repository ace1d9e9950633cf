use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::{RateKey, RateRecord, RateStore};

/// In-memory rate cache for tests and ephemeral runs.
pub struct MemoryRateStore {
    inner: Arc<Mutex<HashMap<RateKey, RateRecord>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn get(&self, key: &RateKey) -> Option<RateRecord> {
        let store = self.inner.lock().await;
        let record = store.get(key).cloned();
        if record.is_some() {
            debug!("Cache HIT for key: {:?}", key);
        } else {
            debug!("Cache MISS for key: {:?}", key);
        }
        record
    }

    async fn upsert(&self, record: RateRecord) -> Result<()> {
        let mut store = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", record.key());
        store.insert(record.key(), record);
        Ok(())
    }
}
