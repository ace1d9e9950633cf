use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::{BASE_CURRENCY, Currency};
use crate::rate_provider::RateProvider;

/// Historical rates from the Frankfurter API (ECB reference data).
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        "frankfurter"
    }

    async fn rate_on(&self, currency: Currency, date: NaiveDate) -> Result<f64> {
        let url = format!(
            "{}/v1/{}?base={}&symbols={}",
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
        let data: FrankfurterResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse Frankfurter response for {}: {}", currency, e))?;

        data.rates
            .get(currency.code())
            .copied()
            .ok_or_else(|| anyhow!("No rate in Frankfurter response for {} on {}", currency, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(date: &str, mock_response: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v1/{date}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "amount": 1.0,
            "base": "NOK",
            "date": "2010-01-15",
            "rates": { "USD": 0.1712 }
        }"#;
        let mock_server = create_mock_server("2010-01-15", mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let date = NaiveDate::from_ymd_opt(2010, 1, 15).unwrap();
        let rate = provider.rate_on(Currency::Usd, date).await.unwrap();
        assert_eq!(rate, 0.1712);
    }

    #[tokio::test]
    async fn test_query_parameters_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/2015-01-15"))
            .and(query_param("base", "NOK"))
            .and(query_param("symbols", "EUR"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.1102}}"#),
            )
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let date = NaiveDate::from_ymd_opt(2015, 1, 15).unwrap();
        let rate = provider.rate_on(Currency::Eur, date).await.unwrap();
        assert_eq!(rate, 0.1102);
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = create_mock_server("2010-01-15", "Server Error", 500).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let date = NaiveDate::from_ymd_opt(2010, 1, 15).unwrap();
        let result = provider.rate_on(Currency::Usd, date).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for USD on 2010-01-15"
        );
    }

    #[tokio::test]
    async fn test_missing_rate_in_response() {
        let mock_response = r#"{"rates": {"SEK": 1.05}}"#;
        let mock_server = create_mock_server("2010-01-15", mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let date = NaiveDate::from_ymd_opt(2010, 1, 15).unwrap();
        let result = provider.rate_on(Currency::Usd, date).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No rate in Frankfurter response for USD on 2010-01-15"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_response = r#"{"ratez": []}"#;
        let mock_server = create_mock_server("2010-01-15", mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let date = NaiveDate::from_ymd_opt(2010, 1, 15).unwrap();
        let result = provider.rate_on(Currency::Usd, date).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse Frankfurter response for USD")
        );
    }
}
