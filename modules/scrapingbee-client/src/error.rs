use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapingBeeError>;

#[derive(Debug, Error)]
pub enum ScrapingBeeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ScrapingBeeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapingBeeError::Timeout(err.to_string())
        } else {
            ScrapingBeeError::Network(err.to_string())
        }
    }
}
