//! Historical currency conversion.
//!
//! Converts an amount of a supported currency, anchored to a year, into NOK.
//! The persistent rate cache is consulted first; on a miss the external
//! providers are tried in a currency-dependent preference order. The resolver
//! only reads the cache; seeding it is an offline concern (see `seed`).

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{BASE_CURRENCY, ConvertError, Currency, MIN_SUPPORTED_YEAR, snapshot_date};
use crate::rate_provider::RateProvider;
use crate::store::{RateKey, RateStore};

/// Provenance tag for answers served from the persistent cache.
const SOURCE_DB: &str = "db";

/// Successful conversion into the base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub converted_amount: f64,
    pub rate: f64,
    /// Omitted on the identity (same-currency) path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The two external providers, held once and ordered per currency.
pub struct ProviderSet {
    pub frankfurter: Arc<dyn RateProvider>,
    pub exchangerate_host: Arc<dyn RateProvider>,
}

impl ProviderSet {
    /// Preference order per currency. Frankfurter's USD coverage for NOK
    /// crosses is deeper, exchangerate.host fills EUR gaps better, so the
    /// orders are deliberately asymmetric. A provider with no coverage for
    /// a currency would simply not appear in its chain.
    pub fn chain_for(&self, currency: Currency) -> Vec<Arc<dyn RateProvider>> {
        match currency {
            Currency::Usd => vec![
                Arc::clone(&self.frankfurter),
                Arc::clone(&self.exchangerate_host),
            ],
            Currency::Eur => vec![
                Arc::clone(&self.exchangerate_host),
                Arc::clone(&self.frankfurter),
            ],
            Currency::Nok => vec![],
        }
    }
}

pub struct Resolver {
    store: Arc<dyn RateStore>,
    providers: ProviderSet,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn usable(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

impl Resolver {
    pub fn new(store: Arc<dyn RateStore>, providers: ProviderSet) -> Self {
        Self { store, providers }
    }

    /// Convert `amount` of `currency` in `year` into the base currency.
    ///
    /// Inputs arrive in raw string form and are validated before any I/O.
    /// Cache problems are soft and advance to the providers; only exhaustion
    /// of the whole fallback chain is fatal.
    pub async fn convert(
        &self,
        currency: &str,
        amount: &str,
        year: &str,
    ) -> Result<Conversion, ConvertError> {
        let parsed_currency: Currency = currency
            .parse()
            .map_err(|()| ConvertError::InvalidInput(format!("unsupported currency: {currency}")))?;

        let parsed_amount: f64 = amount.parse().map_err(|_| {
            ConvertError::InvalidInput(format!("amount must be a number, got '{amount}'"))
        })?;
        if !parsed_amount.is_finite() {
            return Err(ConvertError::InvalidInput(format!(
                "amount must be finite, got '{amount}'"
            )));
        }

        let parsed_year: i32 = year.parse().map_err(|_| {
            ConvertError::InvalidInput(format!("year must be an integer, got '{year}'"))
        })?;
        if parsed_year < MIN_SUPPORTED_YEAR {
            return Err(ConvertError::UnsupportedYear(parsed_year));
        }

        // Identity short-circuit: no cache or provider round trip.
        if parsed_currency.is_base() {
            return Ok(Conversion {
                converted_amount: round2(parsed_amount),
                rate: 1.0,
                source: None,
            });
        }

        let date = snapshot_date(parsed_year);
        let key = RateKey {
            base: BASE_CURRENCY,
            currency: parsed_currency,
            rate_date: date,
        };

        if let Some(record) = self.store.get(&key).await {
            if usable(record.rate) {
                debug!(currency = %parsed_currency, year = parsed_year, rate = record.rate,
                    "Serving conversion from rate cache");
                return Ok(Conversion {
                    converted_amount: round2(parsed_amount / record.rate),
                    rate: record.rate,
                    source: Some(SOURCE_DB.to_string()),
                });
            }
            warn!(
                "Ignoring malformed cache record for {} on {}: rate {}",
                parsed_currency, date, record.rate
            );
        }

        for provider in self.providers.chain_for(parsed_currency) {
            match provider.rate_on(parsed_currency, date).await {
                Ok(rate) if usable(rate) => {
                    debug!(provider = provider.id(), rate, "Provider returned usable rate");
                    return Ok(Conversion {
                        converted_amount: round2(parsed_amount / rate),
                        rate,
                        source: Some(provider.id().to_string()),
                    });
                }
                Ok(rate) => {
                    warn!(
                        "Provider {} returned unusable rate {} for {} on {}",
                        provider.id(),
                        rate,
                        parsed_currency,
                        date
                    );
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed for {} on {}: {}",
                        provider.id(),
                        parsed_currency,
                        date,
                        e
                    );
                }
            }
        }

        Err(ConvertError::ProvidersExhausted {
            currency: parsed_currency,
            year: parsed_year,
        })
    }
}
