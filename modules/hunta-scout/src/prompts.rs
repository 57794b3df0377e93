use hunta_common::{RawContent, SiteProfile, MAX_LISTINGS};

use crate::traits::CompletionRequest;

/// Versioned instruction set for listing extraction.
///
/// The rendered system instruction is built from these options, so changing
/// what the model is asked for never touches request construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPrompt {
    pub version: &'static str,
    pub assistant_name: String,
    /// Fields requested per listing, in the order the model should emit them.
    pub fields: Vec<String>,
    pub max_items: usize,
    /// Filtering and clean-up rules, rendered as a numbered list. The item
    /// limit is appended as the last rule.
    pub rules: Vec<String>,
    pub output_format: String,
    /// Page text beyond this many characters is not sent.
    pub content_char_limit: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ExtractionPrompt {
    pub fn v1(site: &SiteProfile) -> Self {
        Self {
            version: "v1",
            assistant_name: "Hunta".to_string(),
            fields: vec![
                "title".to_string(),
                "image URL (if available)".to_string(),
                "price".to_string(),
                "link".to_string(),
                format!("source ({})", site.label),
            ],
            max_items: MAX_LISTINGS,
            rules: vec![
                "Only extract actual product listings, not ads or navigation elements".to_string(),
                "Clean up titles to remove extra whitespace and HTML entities".to_string(),
                "Ensure image URLs are complete and valid".to_string(),
                format!("Convert relative URLs to absolute URLs for {}", site.label),
                "Extract price as a string with currency symbol".to_string(),
                format!("Set source as \"{}\" for all listings", site.label),
                "Skip listings with missing essential data (title, price, or link)".to_string(),
            ],
            output_format: "Return ONLY a valid JSON array, no additional text or explanation."
                .to_string(),
            content_char_limit: 15_000,
            temperature: 0.1,
            max_tokens: 2000,
        }
    }

    pub fn system_instruction(&self) -> String {
        let limit = format!("Limit to maximum {} listings", self.max_items);
        let rules = self
            .rules
            .iter()
            .chain(std::iter::once(&limit))
            .enumerate()
            .map(|(i, rule)| format!("{}. {}", i + 1, rule))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are {name}, an AI assistant. From this raw HTML page, extract listings with: \
             {fields}. Output as an array of JSON objects.\n\nRules:\n{rules}\n\n{format}",
            name = self.assistant_name,
            fields = self.fields.join(", "),
            rules = rules,
            format = self.output_format,
        )
    }

    pub fn user_message(&self, content: &RawContent) -> String {
        format!(
            "Extract product listings from this HTML content:\n\n{}",
            ai_client::truncate_to_char_count(content.as_str(), self.content_char_limit)
        )
    }

    pub fn completion_request(&self, content: &RawContent) -> CompletionRequest {
        CompletionRequest {
            system: self.system_instruction(),
            user: self.user_message(content),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
