pub mod disk;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::Currency;

pub use disk::FjallRateStore;
pub use memory::MemoryRateStore;

/// Composite key a cached rate is stored under. One record per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    pub base: Currency,
    pub currency: Currency,
    pub rate_date: NaiveDate,
}

/// A cached historical exchange rate, quoted-currency per one base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub base: Currency,
    pub currency: Currency,
    pub rate_date: NaiveDate,
    pub rate: f64,
    pub source: String,
}

impl RateRecord {
    pub fn key(&self) -> RateKey {
        RateKey {
            base: self.base,
            currency: self.currency,
            rate_date: self.rate_date,
        }
    }
}

/// Persistent rate cache. Lookups are soft-failing: storage errors are
/// logged and reported as a miss so a broken cache never aborts a request.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn get(&self, key: &RateKey) -> Option<RateRecord>;

    /// Insert or replace the record stored under `record.key()`.
    async fn upsert(&self, record: RateRecord) -> Result<()>;
}
