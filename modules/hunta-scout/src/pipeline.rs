use tracing::{info, warn};

use hunta_common::{ListingResult, SearchQuery};

use crate::error::PipelineError;
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;

/// Fetch → extract for one search. Holds no per-request state, so one
/// instance serves concurrent requests.
pub struct SearchPipeline {
    fetcher: Fetcher,
    extractor: Extractor,
}

impl SearchPipeline {
    pub fn new(fetcher: Fetcher, extractor: Extractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Run both stages in order. A fetch failure returns before extraction
    /// starts; either stage's error is returned as-is.
    pub async fn run(&self, query: &SearchQuery) -> Result<ListingResult, PipelineError> {
        info!(query = %query, "Starting search");

        let result = self.stages(query).await;
        match &result {
            Ok(listings) => info!(query = %query, count = listings.len(), "Search complete"),
            Err(e) => warn!(query = %query, kind = e.kind(), error = %e, "Search failed"),
        }
        result
    }

    async fn stages(&self, query: &SearchQuery) -> Result<ListingResult, PipelineError> {
        let content = self.fetcher.fetch(query).await?;
        Ok(self.extractor.extract(&content).await?)
    }
}
