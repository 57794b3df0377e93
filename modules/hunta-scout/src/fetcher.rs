use std::sync::Arc;

use tracing::{info, warn};

use hunta_common::{RawContent, SearchQuery, SiteProfile, MIN_CONTENT_CHARS};
use scrapingbee_client::RenderOptions;

use crate::error::FetchError;
use crate::traits::RenderingProxy;

/// Retrieves the rendered search results page for a query. One attempt, no retry.
pub struct Fetcher {
    proxy: Option<Arc<dyn RenderingProxy>>,
    site: SiteProfile,
}

impl Fetcher {
    /// `proxy` is `None` when the proxy credential is not configured; every
    /// fetch then fails without an outbound call.
    pub fn new(proxy: Option<Arc<dyn RenderingProxy>>, site: SiteProfile) -> Self {
        Self { proxy, site }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            render_js: true,
            premium_proxy: true,
            country_code: Some(self.site.country_code.clone()),
        }
    }

    pub async fn fetch(&self, query: &SearchQuery) -> Result<RawContent, FetchError> {
        let proxy = self
            .proxy
            .as_ref()
            .ok_or(FetchError::NotConfigured("SCRAPINGBEE_API_KEY"))?;

        let url = self.site.search_url(query);
        info!(url, site = %self.site.label, "Fetching search page");

        let body = proxy
            .render(&url, &self.render_options())
            .await
            .map_err(|e| FetchError::Proxy(format!("{e:#}")))?;

        let content = RawContent::from_body(body).map_err(|len| {
            warn!(url, len, "Rendered page too short");
            FetchError::InsufficientContent {
                len,
                min: MIN_CONTENT_CHARS,
            }
        })?;

        info!(chars = content.len(), "Fetched search page");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_of_len, MockProxy};

    fn fetcher(proxy: &Arc<MockProxy>) -> Fetcher {
        Fetcher::new(
            Some(proxy.clone() as Arc<dyn RenderingProxy>),
            SiteProfile::gumtree(),
        )
    }

    #[tokio::test]
    async fn requests_rendered_page_with_regional_proxy() {
        let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
        let query = SearchQuery::parse("garden table").unwrap();

        let content = fetcher(&proxy).fetch(&query).await.unwrap();
        assert_eq!(content.len(), 500);

        let calls = proxy.calls();
        assert_eq!(calls.len(), 1);
        let (url, options) = &calls[0];
        assert_eq!(
            url,
            "https://www.gumtree.com/search?search_category=all&q=garden%20table"
        );
        assert!(options.render_js);
        assert!(options.premium_proxy);
        assert_eq!(options.country_code.as_deref(), Some("gb"));
    }

    #[tokio::test]
    async fn short_page_is_fetch_error() {
        let proxy = Arc::new(MockProxy::returning(page_of_len(50)));
        let query = SearchQuery::parse("lamp").unwrap();

        let err = fetcher(&proxy).fetch(&query).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::InsufficientContent { len: 50, min: 100 }
        ));
    }

    #[tokio::test]
    async fn proxy_failure_carries_cause() {
        let proxy = Arc::new(MockProxy::failing("Request timed out: operation timed out"));
        let query = SearchQuery::parse("lamp").unwrap();

        let err = fetcher(&proxy).fetch(&query).await.unwrap_err();
        match err {
            FetchError::Proxy(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected proxy error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_proxy_fails_closed() {
        let query = SearchQuery::parse("lamp").unwrap();
        let err = Fetcher::new(None, SiteProfile::gumtree())
            .fetch(&query)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured("SCRAPINGBEE_API_KEY")));
    }
}
