// Seams around the two outbound services.
//
// RenderingProxy — fetch a rendered page for a URL (ScrapingBee in production).
// CompletionModel — one system+user chat completion (OpenAI in production).
//
// Pipeline tests swap both for the mocks in `testing`.

use anyhow::Result;
use async_trait::async_trait;

use ai_client::{CompletionOptions, OpenAi};
use scrapingbee_client::{RenderOptions, ScrapingBeeClient};

#[async_trait]
pub trait RenderingProxy: Send + Sync {
    /// Return the rendered body of `url`.
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<String>;
}

#[async_trait]
impl RenderingProxy for ScrapingBeeClient {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<String> {
        Ok(self.content(url, options).await?)
    }
}

/// A single chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Return the raw text of the model's reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[async_trait]
impl CompletionModel for OpenAi {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let options = CompletionOptions {
            temperature: Some(request.temperature),
            max_tokens: Some(request.max_tokens),
        };
        Ok(self
            .chat_completion_with(request.system.as_str(), request.user.as_str(), &options)
            .await?)
    }
}
