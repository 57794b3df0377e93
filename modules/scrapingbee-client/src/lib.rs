pub mod error;

pub use error::{Result, ScrapingBeeError};

use std::time::Duration;

const BASE_URL: &str = "https://app.scrapingbee.com/api/v1/";

/// Options forwarded to ScrapingBee for a single page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub render_js: bool,
    pub premium_proxy: bool,
    /// ISO 3166-1 alpha-2 code for proxy geolocation, e.g. `gb`.
    pub country_code: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            render_js: true,
            premium_proxy: false,
            country_code: None,
        }
    }
}

impl RenderOptions {
    fn query_pairs<'a>(&'a self, api_key: &'a str, url: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut pairs = vec![
            ("api_key", api_key),
            ("url", url),
            ("render_js", bool_param(self.render_js)),
            ("premium_proxy", bool_param(self.premium_proxy)),
        ];
        if let Some(ref code) = self.country_code {
            pairs.push(("country_code", code.as_str()));
        }
        pairs
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub struct ScrapingBeeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ScrapingBeeClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_timeout(api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapingBeeError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Fetch the rendered page body for `url` through the ScrapingBee proxy.
    pub async fn content(&self, url: &str, options: &RenderOptions) -> Result<String> {
        tracing::debug!(
            url,
            render_js = options.render_js,
            premium_proxy = options.premium_proxy,
            country_code = options.country_code.as_deref().unwrap_or(""),
            "ScrapingBee request"
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&options.query_pairs(&self.api_key, url))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ScrapingBeeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}
