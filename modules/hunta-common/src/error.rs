use thiserror::Error;

/// Rejected caller input. Never reaches an outbound service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("search_term is missing")]
    MissingSearchTerm,

    #[error("search_term must be a string")]
    NotAString,

    #[error("search_term is empty")]
    EmptySearchTerm,

    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),
}

impl ValidationError {
    /// Message returned to HTTP callers for any invalid search input.
    pub const CLIENT_MESSAGE: &'static str =
        "Invalid search term. Please provide a non-empty string.";
}
