//! HTTP client for App Store product pages using wreq for TLS fingerprint emulation.

use super::extract;
use super::models::AppSnapshot;
use super::regions::Region;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

const APP_STORE_BASE: &str = "https://apps.apple.com";

/// Trait for storefront snapshot fetching - enables mocking for tests.
#[async_trait]
pub trait StorefrontFetch: Send + Sync {
    /// Fetches and extracts the purchase snapshot for an app in one region.
    ///
    /// `Ok(None)` means the app is unlisted or the page carried no usable
    /// payload there; both are normal outcomes, not failures.
    async fn product_snapshot(&self, app_id: &str, region: &Region) -> Result<Option<AppSnapshot>>;
}

/// App Store HTTP client with browser impersonation.
pub struct StorefrontClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl StorefrontClient {
    /// Creates a new storefront client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(APP_STORE_BASE)
    }

    /// Fetches the raw product page for one region, or None on non-success status.
    async fn fetch_page(&self, app_id: &str, region: &Region) -> Result<Option<String>> {
        self.delay().await;

        let url = format!("{}/{}/app/id{}", self.base_url(), region.url_code(), app_id);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        // Unlisted apps routinely 404; treat any non-success as absence.
        if !status.is_success() {
            warn!("Storefront {} returned status {} for app {}", region.code, status, app_id);
            return Ok(None);
        }

        let body = response.text().await.context("Failed to read response body")?;
        Ok(Some(body))
    }

    /// Adds a small delay between requests to mimic human pacing.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl StorefrontFetch for StorefrontClient {
    async fn product_snapshot(&self, app_id: &str, region: &Region) -> Result<Option<AppSnapshot>> {
        info!("Checking storefront {} for app {}", region.code, app_id);

        let Some(html) = self.fetch_page(app_id, region).await? else {
            return Ok(None);
        };

        Ok(extract::extract_snapshot(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
    }

    fn shoebox_page() -> String {
        let inner = r#"{"d":[{"relationships":{"top-in-apps":{"data":[{"attributes":{"name":"Pro Monthly","offerName":"com.app.pro.monthly","offers":[{"price":9.99,"currencyCode":"USD","priceFormatted":"$9.99"}]}}]}}}]}"#;
        let outer = serde_json::json!({ "cache-key": inner });
        format!(
            r#"<html><head><script id="shoebox-media-api-cache-apps">{}</script></head></html>"#,
            serde_json::to_string(&outer).unwrap()
        )
    }

    #[tokio::test]
    async fn test_snapshot_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/us/app/id123456"))
            .respond_with(ResponseTemplate::new(200).set_body_string(shoebox_page()))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = StorefrontClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let region = Region::find("US").unwrap();
        let snapshot = client.product_snapshot("123456", region).await.unwrap();

        let snapshot = snapshot.expect("snapshot should be present");
        assert_eq!(snapshot.purchases.len(), 1);
        assert_eq!(snapshot.purchases[0].offer_name, "com.app.pro.monthly");
    }

    #[tokio::test]
    async fn test_unlisted_404_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jp/app/id123456"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = StorefrontClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let region = Region::find("JP").unwrap();
        let snapshot = client.product_snapshot("123456", region).await.unwrap();
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn test_page_without_shoebox_is_absence() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/de/app/id123456"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = StorefrontClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let region = Region::find("DE").unwrap();
        let snapshot = client.product_snapshot("123456", region).await.unwrap();
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn test_region_code_lowercased_in_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gb/app/id42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(shoebox_page()))
            .mount(&mock_server)
            .await;

        let config = make_test_config();
        let client = StorefrontClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let region = Region::find("GB").unwrap();
        let snapshot = client.product_snapshot("42", region).await.unwrap();
        assert!(snapshot.is_some());
    }
}
