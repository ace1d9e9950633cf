//! Historical rate lookup abstraction over external providers.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::Currency;

/// A source of point-in-time exchange rates, quoted-currency per one NOK.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Provenance tag reported back to callers.
    fn id(&self) -> &'static str;

    async fn rate_on(&self, currency: Currency, date: NaiveDate) -> Result<f64>;
}
