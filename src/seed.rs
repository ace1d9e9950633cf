//! Offline cache seeding.
//!
//! The resolver never writes provider responses back into the store; this
//! module is the only writer. It walks a year range, fetches the snapshot
//! rate for every foreign currency through that currency's fallback chain
//! and upserts the result.

use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{BASE_CURRENCY, FOREIGN_CURRENCIES, MIN_SUPPORTED_YEAR, snapshot_date};
use crate::resolver::ProviderSet;
use crate::store::{RateRecord, RateStore};

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub seeded: usize,
    pub skipped: usize,
}

pub struct Seeder {
    store: Arc<dyn RateStore>,
    providers: ProviderSet,
}

impl Seeder {
    pub fn new(store: Arc<dyn RateStore>, providers: ProviderSet) -> Self {
        Self { store, providers }
    }

    /// Seed snapshot rates for every foreign currency over an inclusive
    /// year range. A year no provider can answer is skipped, not fatal.
    pub async fn seed_years(&self, from_year: i32, to_year: i32) -> Result<SeedSummary> {
        if from_year < MIN_SUPPORTED_YEAR {
            bail!(
                "seeding starts at the minimum supported year {}, got {}",
                MIN_SUPPORTED_YEAR,
                from_year
            );
        }
        if from_year > to_year {
            bail!("invalid year range: {} > {}", from_year, to_year);
        }

        let mut summary = SeedSummary::default();
        for year in from_year..=to_year {
            let date = snapshot_date(year);
            for currency in FOREIGN_CURRENCIES {
                let mut fetched = None;
                for provider in self.providers.chain_for(currency) {
                    match provider.rate_on(currency, date).await {
                        Ok(rate) if rate.is_finite() && rate > 0.0 => {
                            fetched = Some((rate, provider.id()));
                            break;
                        }
                        Ok(rate) => {
                            warn!(
                                "Provider {} returned unusable rate {} for {} on {}",
                                provider.id(),
                                rate,
                                currency,
                                date
                            );
                        }
                        Err(e) => {
                            warn!(
                                "Provider {} failed for {} on {}: {}",
                                provider.id(),
                                currency,
                                date,
                                e
                            );
                        }
                    }
                }

                match fetched {
                    Some((rate, source)) => {
                        self.store
                            .upsert(RateRecord {
                                base: BASE_CURRENCY,
                                currency,
                                rate_date: date,
                                rate,
                                source: source.to_string(),
                            })
                            .await?;
                        summary.seeded += 1;
                    }
                    None => {
                        warn!("No provider could answer {} for {}", currency, date);
                        summary.skipped += 1;
                    }
                }
            }
        }

        info!(
            "Seeding finished: {} records written, {} skipped",
            summary.seeded, summary.skipped
        );
        Ok(summary)
    }
}
