mod client;
pub(crate) mod types;

use std::time::Duration;

use crate::error::{AiError, Result};

use client::OpenAiClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling configuration for a single chat completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    model: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> Result<OpenAiClient> {
        let client = OpenAiClient::new(&self.api_key, self.timeout)?;
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    fn build_request(
        &self,
        system: String,
        user: String,
        options: &CompletionOptions,
    ) -> types::ChatRequest {
        let mut request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user));

        if types::uses_max_completion_tokens(&self.model) {
            if let Some(max) = options.max_tokens {
                request = request.max_completion_tokens(max);
            }
        } else {
            if let Some(max) = options.max_tokens {
                request = request.max_tokens(max);
            }
            if let Some(temp) = options.temperature {
                request = request.temperature(temp);
            }
        }

        request
    }

    /// Chat completion with explicit sampling options. Returns the text of the first choice.
    pub async fn chat_completion_with(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
        options: &CompletionOptions,
    ) -> Result<String> {
        let request = self.build_request(system.into(), user.into(), options);
        let response = self.client()?.chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AiError::EmptyResponse)
    }
}
