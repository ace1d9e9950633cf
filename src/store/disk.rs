use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::{RateKey, RateRecord, RateStore};

/// Rate cache persisted in a fjall keyspace, one `rates` partition.
/// Keys and values are serde_json encoded.
pub struct FjallRateStore {
    _keyspace: Arc<Keyspace>,
    rates: PartitionHandle,
}

impl FjallRateStore {
    pub fn new(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let keyspace = Arc::new(fjall::Config::new(path).open()?);
        let rates = keyspace.open_partition("rates", PartitionCreateOptions::default())?;
        Ok(Self {
            _keyspace: keyspace,
            rates,
        })
    }
}

#[async_trait]
impl RateStore for FjallRateStore {
    async fn get(&self, key: &RateKey) -> Option<RateRecord> {
        let res: Result<Option<RateRecord>> = (|| {
            if let Some(value) = self.rates.get(serde_json::to_vec(key)?)? {
                let record: RateRecord = serde_json::from_slice(&value)?;
                debug!("Cache HIT for key: {:?}", key);
                return Ok(Some(record));
            }
            debug!("Cache MISS for key: {:?}", key);
            Ok(None)
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("FjallRateStore get error: {}", e);
                None
            }
        }
    }

    async fn upsert(&self, record: RateRecord) -> Result<()> {
        let key = record.key();
        self.rates
            .insert(serde_json::to_vec(&key)?, serde_json::to_vec(&record)?)?;
        debug!("Cache PUT for key: {:?}", key);
        Ok(())
    }
}
