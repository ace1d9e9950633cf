use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::{BASE_CURRENCY, Currency};
use crate::rate_provider::RateProvider;

/// Historical rates from the exchangerate.host API.
pub struct ExchangerateHostProvider {
    base_url: String,
}

impl ExchangerateHostProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangerateHostProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangerateHostResponse {
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangerateHostProvider {
    fn id(&self) -> &'static str {
        "exchangerate.host"
    }

    async fn rate_on(&self, currency: Currency, date: NaiveDate) -> Result<f64> {
        let url = format!(
            "{}/{}?base={}&symbols={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            BASE_CURRENCY.code(),
            currency.code()
        );
        debug!("Requesting historical rate from {}", url);

        let client = reqwest::Client::builder().user_agent("histfx/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {} on {}", e, currency, date))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {} on {}",
                response.status(),
                currency,
                date
            ));
        }

        let text = response.text().await?;
        let data: ExchangerateHostResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse exchangerate.host response for {}: {}",
                currency,
                e
            )
        })?;

        if !data.success {
            return Err(anyhow!(
                "exchangerate.host reported failure for {} on {}",
                currency,
                date
            ));
        }

        data.rates.get(currency.code()).copied().ok_or_else(|| {
            anyhow!(
                "No rate in exchangerate.host response for {} on {}",
                currency,
                date
            )
        })
    }
}
