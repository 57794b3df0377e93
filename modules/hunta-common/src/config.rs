use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Credentials are optional: a missing key does not stop the server from
/// starting, it is reported by the health check and the affected pipeline
/// stage refuses to run.
#[derive(Debug, Clone)]
pub struct Config {
    // Scraping
    pub scrapingbee_api_key: Option<String>,

    // AI / LLM
    pub openai_api_key: Option<String>,
    pub openai_model: String,

    // Web server
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got {raw:?}"))?,
            None => 3001,
        };

        Ok(Self {
            scrapingbee_api_key: secret("SCRAPINGBEE_API_KEY"),
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn scrapingbee_configured(&self) -> bool {
        self.scrapingbee_api_key.is_some()
    }

    pub fn openai_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn log_keys(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let n = v.chars().take(5).map(char::len_utf8).sum::<usize>();
                    format!("{}...({} chars)", &v[..n], v.chars().count())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SCRAPINGBEE_API_KEY: {}", preview_opt(&self.scrapingbee_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);

        if !self.scrapingbee_configured() {
            tracing::warn!("SCRAPINGBEE_API_KEY is not set; searches will fail until it is configured");
        }
        if !self.openai_configured() {
            tracing::warn!("OPENAI_API_KEY is not set; searches will fail until it is configured");
        }
    }
}
