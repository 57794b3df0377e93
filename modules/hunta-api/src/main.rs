use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenAi;
use hunta_common::{Config, SiteProfile};
use hunta_scout::{CompletionModel, Extractor, Fetcher, RenderingProxy, SearchPipeline};
use scrapingbee_client::ScrapingBeeClient;

mod rest;

pub struct AppState {
    pub pipeline: SearchPipeline,
    pub scrapingbee_configured: bool,
    pub openai_configured: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hunta=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_keys();

    let site = SiteProfile::gumtree();

    let proxy: Option<Arc<dyn RenderingProxy>> = match config.scrapingbee_api_key.as_deref() {
        Some(key) => Some(Arc::new(ScrapingBeeClient::new(key)?) as Arc<dyn RenderingProxy>),
        None => None,
    };
    let model: Option<Arc<dyn CompletionModel>> = config
        .openai_api_key
        .as_deref()
        .map(|key| Arc::new(OpenAi::new(key, &config.openai_model)) as Arc<dyn CompletionModel>);

    let state = Arc::new(AppState {
        pipeline: SearchPipeline::new(
            Fetcher::new(proxy, site.clone()),
            Extractor::new(model, site),
        ),
        scrapingbee_configured: config.scrapingbee_configured(),
        openai_configured: config.openai_configured(),
    });

    let app = rest::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Hunta API starting on {addr}");
    info!("Health check: http://{addr}/health");
    info!("Search endpoint: POST http://{addr}/search");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
