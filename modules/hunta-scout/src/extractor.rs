use std::sync::Arc;

use tracing::{debug, info, warn};

use hunta_common::{Listing, ListingCandidate, ListingResult, RawContent, SiteProfile, MAX_LISTINGS};

use crate::error::ExtractError;
use crate::prompts::ExtractionPrompt;
use crate::traits::CompletionModel;

const PREVIEW_CHARS: usize = 500;

/// Turns a rendered page into listings by asking a completion model for a
/// JSON array and validating what comes back.
pub struct Extractor {
    model: Option<Arc<dyn CompletionModel>>,
    prompt: ExtractionPrompt,
    site: SiteProfile,
}

impl Extractor {
    /// `model` is `None` when the completion credential is not configured.
    pub fn new(model: Option<Arc<dyn CompletionModel>>, site: SiteProfile) -> Self {
        Self {
            model,
            prompt: ExtractionPrompt::v1(&site),
            site,
        }
    }

    pub fn with_prompt(mut self, prompt: ExtractionPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub async fn extract(&self, content: &RawContent) -> Result<ListingResult, ExtractError> {
        let model = self
            .model
            .as_ref()
            .ok_or(ExtractError::NotConfigured("OPENAI_API_KEY"))?;

        let request = self.prompt.completion_request(content);
        info!(prompt_version = self.prompt.version, "Extracting listings");

        let text = model
            .complete(&request)
            .await
            .map_err(|e| ExtractError::Extraction(format!("{e:#}")))?;

        let candidates = parse_candidates(&text).inspect_err(|e| {
            let preview = ai_client::truncate_to_char_count(&text, PREVIEW_CHARS);
            warn!(error = %e, preview, "Completion output is not a JSON array of objects");
        })?;

        let total = candidates.len();
        let limit = self.prompt.max_items.min(MAX_LISTINGS);
        let listings = normalize_listings(candidates, &self.site, limit);

        info!(
            candidates = total,
            kept = listings.len(),
            dropped = total - listings.len(),
            "Extracted listings"
        );
        Ok(listings)
    }
}

/// Parse model output into candidates: strip an optional code fence, then
/// require a JSON array. Non-object elements are skipped, but a non-empty
/// array with no objects at all is a parse error.
pub fn parse_candidates(text: &str) -> Result<Vec<ListingCandidate>, ExtractError> {
    let cleaned = ai_client::strip_code_blocks(text);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let serde_json::Value::Array(items) = value else {
        return Err(ExtractError::Parse("expected a JSON array".to_string()));
    };

    let total = items.len();
    let candidates = items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .map(|item| serde_json::from_value(item).map_err(|e| ExtractError::Parse(e.to_string())))
        .collect::<Result<Vec<ListingCandidate>, _>>()?;

    if total > 0 && candidates.is_empty() {
        return Err(ExtractError::Parse(
            "array contains no JSON objects".to_string(),
        ));
    }
    if candidates.len() < total {
        debug!(skipped = total - candidates.len(), "Skipped non-object array elements");
    }
    Ok(candidates)
}

/// Keep valid candidates in order, normalized, up to `limit`.
pub fn normalize_listings(
    candidates: Vec<ListingCandidate>,
    site: &SiteProfile,
    limit: usize,
) -> Vec<Listing> {
    candidates
        .into_iter()
        .filter_map(|c| normalize_candidate(c, site))
        .take(limit)
        .collect()
}

/// Validate one candidate. Returns `None` if title, price, or link is missing,
/// not a string, or blank, or if the link does not resolve to a web URL.
pub fn normalize_candidate(candidate: ListingCandidate, site: &SiteProfile) -> Option<Listing> {
    let title = required_text(candidate.title.as_ref())?;
    let price = required_text(candidate.price.as_ref())?;
    let link = required_text(candidate.link.as_ref())?;

    let image = match candidate.image {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    };

    Some(Listing {
        title: title.to_string(),
        image,
        price: price.to_string(),
        link: site.absolute_link(link)?,
        source: site.label.clone(),
    })
}

fn required_text(value: Option<&serde_json::Value>) -> Option<&str> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then_some(text)
}
