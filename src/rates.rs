//! Exchange rate fetching from the open.er-api.com public endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

const RATES_BASE: &str = "https://open.er-api.com";

/// Currency code to rate, relative to the requested base currency.
pub type RateTable = HashMap<String, f64>;

/// Trait for exchange rate retrieval - enables mocking for tests.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches current rates relative to `base` (a 3-letter currency code).
    ///
    /// `Ok(None)` covers malformed responses and non-success statuses; the
    /// caller degrades to an unconverted report rather than failing.
    async fn latest(&self, base: &str) -> Result<Option<RateTable>>;
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: Option<RateTable>,
}

/// open.er-api.com HTTP client.
pub struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    /// Creates a new rate client.
    pub fn new() -> Result<Self> {
        Self::with_base_url(RATES_BASE.to_string())
    }

    /// Creates a rate client with a custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl RateSource for RateClient {
    async fn latest(&self, base: &str) -> Result<Option<RateTable>> {
        let url = format!("{}/v6/latest/{}", self.base_url, base.to_uppercase());

        info!("Fetching exchange rates for base {}", base.to_uppercase());
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send rates request")?;

        let status = response.status();
        if !status.is_success() {
            warn!("Rates endpoint returned status {}", status);
            return Ok(None);
        }

        let body = response.text().await.context("Failed to read rates response body")?;

        let parsed: RatesResponse = match serde_json::from_str(&body) {
            Ok(p) => p,
            Err(e) => {
                warn!("Malformed rates response: {}", e);
                return Ok(None);
            }
        };

        Ok(parsed.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_latest_success() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "result": "success",
            "base_code": "USD",
            "rates": { "USD": 1.0, "EUR": 0.92, "JPY": 148.3 },
        });

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let client = RateClient::with_base_url(mock_server.uri()).unwrap();
        let rates = client.latest("usd").await.unwrap().unwrap();

        assert_eq!(rates.get("EUR"), Some(&0.92));
        assert_eq!(rates.get("JPY"), Some(&148.3));
        assert_eq!(rates.len(), 3);
    }

    #[tokio::test]
    async fn test_base_uppercased_in_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/EUR"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "rates": { "EUR": 1.0 } })),
            )
            .mount(&mock_server)
            .await;

        let client = RateClient::with_base_url(mock_server.uri()).unwrap();
        let rates = client.latest("eur").await.unwrap();
        assert!(rates.is_some());
    }

    #[tokio::test]
    async fn test_malformed_body_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&mock_server)
            .await;

        let client = RateClient::with_base_url(mock_server.uri()).unwrap();
        let rates = client.latest("USD").await.unwrap();
        assert!(rates.is_none());
    }

    #[tokio::test]
    async fn test_missing_rates_field_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": "error" })),
            )
            .mount(&mock_server)
            .await;

        let client = RateClient::with_base_url(mock_server.uri()).unwrap();
        let rates = client.latest("USD").await.unwrap();
        assert!(rates.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v6/latest/XXX"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = RateClient::with_base_url(mock_server.uri()).unwrap();
        let rates = client.latest("XXX").await.unwrap();
        assert!(rates.is_none());
    }
}
