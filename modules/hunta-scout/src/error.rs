use thiserror::Error;

/// The rendering proxy could not produce a usable page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch search page: {0}")]
    Proxy(String),

    #[error("Received empty or invalid page content ({len} chars, need at least {min})")]
    InsufficientContent { len: usize, min: usize },

    #[error("Rendering proxy is not configured ({0} is not set)")]
    NotConfigured(&'static str),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The completion call itself failed or timed out.
    #[error("Failed to extract listings: {0}")]
    Extraction(String),

    /// The completion succeeded but its text is not a JSON array of objects.
    #[error("Invalid JSON response from completion service: {0}")]
    Parse(String),

    #[error("Completion service is not configured ({0} is not set)")]
    NotConfigured(&'static str),
}

/// Failure of one search run, tagged with the stage that produced it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl PipelineError {
    /// Stage label for logs. Callers outside the service never see it.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch(_) => "fetch",
            PipelineError::Extract(ExtractError::Parse(_)) => "parse",
            PipelineError::Extract(_) => "extraction",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_distinguishes_stages() {
        let fetch: PipelineError = FetchError::Proxy("timeout".into()).into();
        let extract: PipelineError = ExtractError::Extraction("500".into()).into();
        let parse: PipelineError = ExtractError::Parse("eof".into()).into();
        let unconfigured: PipelineError = ExtractError::NotConfigured("OPENAI_API_KEY").into();

        assert_eq!(fetch.kind(), "fetch");
        assert_eq!(extract.kind(), "extraction");
        assert_eq!(parse.kind(), "parse");
        assert_eq!(unconfigured.kind(), "extraction");
    }

    #[test]
    fn display_is_forwarded_unchanged() {
        let err: PipelineError = FetchError::InsufficientContent { len: 50, min: 100 }.into();
        assert_eq!(
            err.to_string(),
            "Received empty or invalid page content (50 chars, need at least 100)"
        );
    }
}
