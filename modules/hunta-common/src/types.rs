use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// Pages shorter than this (in characters) are treated as a failed fetch.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Upper bound on listings returned for one search.
pub const MAX_LISTINGS: usize = 10;

// --- Search input ---

/// A validated, whitespace-trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySearchTerm);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Validate the `search_term` field of a JSON request body.
    pub fn from_json_field(body: &serde_json::Value) -> Result<Self, ValidationError> {
        match body.get("search_term") {
            None | Some(serde_json::Value::Null) => Err(ValidationError::MissingSearchTerm),
            Some(serde_json::Value::String(s)) => Self::parse(s),
            Some(_) => Err(ValidationError::NotAString),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Fetched page ---

/// Page body returned by the rendering proxy, at least [`MIN_CONTENT_CHARS`] long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent(String);

impl RawContent {
    /// Accept a page body, or hand back its character count if it is too short.
    pub fn from_body(body: String) -> Result<Self, usize> {
        let chars = body.chars().count();
        if chars < MIN_CONTENT_CHARS {
            return Err(chars);
        }
        Ok(Self(body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, the unit the minimum is measured in.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// --- Listings ---

/// One object from the model's JSON array, before validation.
///
/// Fields stay as raw JSON values so that wrong-typed entries can be
/// filtered out instead of failing the whole array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingCandidate {
    #[serde(default)]
    pub title: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub link: Option<serde_json::Value>,
    #[serde(default)]
    pub source: Option<serde_json::Value>,
}

/// A validated listing returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub image: Option<String>,
    pub price: String,
    pub link: String,
    pub source: String,
}

/// Listings for one search, in model output order, at most [`MAX_LISTINGS`].
pub type ListingResult = Vec<Listing>;

impl From<&Listing> for ListingCandidate {
    fn from(listing: &Listing) -> Self {
        Self {
            title: Some(listing.title.clone().into()),
            image: listing.image.clone().map(Into::into),
            price: Some(listing.price.clone().into()),
            link: Some(listing.link.clone().into()),
            source: Some(listing.source.clone().into()),
        }
    }
}

// --- Source site ---

/// The marketplace searched through the rendering proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    /// Constant label stamped on every listing's `source`.
    pub label: String,
    /// Scheme + host, no trailing slash.
    pub origin: String,
    /// Search path and fixed query prefix; the encoded term is appended.
    pub search_path: String,
    /// Proxy geolocation for the site's region.
    pub country_code: String,
}

impl SiteProfile {
    pub fn gumtree() -> Self {
        Self {
            label: "Gumtree".to_string(),
            origin: "https://www.gumtree.com".to_string(),
            search_path: "/search?search_category=all&q=".to_string(),
            country_code: "gb".to_string(),
        }
    }

    pub fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}{}{}",
            self.origin,
            self.search_path,
            encode_component(query.as_str())
        )
    }

    /// Resolve a listing link against the site origin.
    ///
    /// Absolute and protocol-relative links keep their own host; anything else
    /// is joined onto the origin. Returns `None` when the link cannot be
    /// resolved to an `http`/`https` URL.
    pub fn absolute_link(&self, link: &str) -> Option<String> {
        let base = Url::parse(&self.origin).ok()?;
        let resolved = base.join(link).ok()?;
        matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
    }
}

fn encode_component(term: &str) -> String {
    // form encoding writes spaces as '+'; a literal '+' is already %2B
    url::form_urlencoded::byte_serialize(term.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
