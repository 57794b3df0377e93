pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod prompts;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use error::{ExtractError, FetchError, PipelineError};
pub use extractor::Extractor;
pub use fetcher::Fetcher;
pub use pipeline::SearchPipeline;
pub use prompts::ExtractionPrompt;
pub use traits::{CompletionModel, CompletionRequest, RenderingProxy};
