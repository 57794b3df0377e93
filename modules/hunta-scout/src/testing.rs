// Test doubles for the two outbound seams.
//
// - MockProxy (RenderingProxy) — fixed page body or failure, records requests
// - MockModel (CompletionModel) — fixed completion text or failure, records requests
//
// Plus fixture builders for page bodies and model output.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use hunta_common::SiteProfile;
use scrapingbee_client::RenderOptions;

use crate::extractor::Extractor;
use crate::fetcher::Fetcher;
use crate::pipeline::SearchPipeline;
use crate::traits::{CompletionModel, CompletionRequest, RenderingProxy};

// ---------------------------------------------------------------------------
// MockProxy
// ---------------------------------------------------------------------------

pub struct MockProxy {
    response: std::result::Result<String, String>,
    calls: Mutex<Vec<(String, RenderOptions)>>,
}

impl MockProxy {
    pub fn returning(body: impl Into<String>) -> Self {
        Self {
            response: Ok(body.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(url, options)` pair this proxy was asked to render.
    pub fn calls(&self) -> Vec<(String, RenderOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RenderingProxy for MockProxy {
    async fn render(&self, url: &str, options: &RenderOptions) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        self.response.clone().map_err(|e| anyhow!(e))
    }
}

// ---------------------------------------------------------------------------
// MockModel
// ---------------------------------------------------------------------------

pub struct MockModel {
    response: std::result::Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockModel {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone().map_err(|e| anyhow!(e))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An HTML-ish page body of exactly `len` characters.
pub fn page_of_len(len: usize) -> String {
    let shell = "<html><body></body></html>";
    if len <= shell.len() {
        return "x".repeat(len);
    }
    format!("<html><body>{}</body></html>", "x".repeat(len - shell.len()))
}

/// A JSON array of `n` well-formed candidates titled `Item 1`..`Item n`.
pub fn candidates_json(n: usize) -> String {
    let items: Vec<serde_json::Value> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "title": format!("Item {i}"),
                "image": format!("https://img.example.com/{i}.jpg"),
                "price": format!("£{}", i * 10),
                "link": format!("/p/item/{i}"),
                "source": "Gumtree"
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// A Gumtree pipeline wired to the given mocks.
pub fn pipeline_with(proxy: &Arc<MockProxy>, model: &Arc<MockModel>) -> SearchPipeline {
    let site = SiteProfile::gumtree();
    SearchPipeline::new(
        Fetcher::new(Some(proxy.clone() as Arc<dyn RenderingProxy>), site.clone()),
        Extractor::new(Some(model.clone() as Arc<dyn CompletionModel>), site),
    )
}
