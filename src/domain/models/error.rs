use thiserror::Error;

/// Prefix attached to errors surfaced after the retry budget is exhausted.
pub const OVERLOADED_HINT: &str =
    "The reasoning service appears to be overloaded. Please try again later.";

/// Classified failures from the analysis pipeline. Everything else crossing an
/// anyhow boundary (reqwest, serde) is treated as a transient service problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    #[error("reasoning service failure: {0}")]
    Service(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Deterministic failures must not consume the retry budget. Unknown error
/// types are assumed to come from the network layer and stay retryable.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::Validation(_)) => return false,
        Some(PipelineError::UnsupportedMedia(_)) => return false,
        Some(PipelineError::NotFound(_)) => return false,
        Some(PipelineError::Service(_)) => return true,
        None => return true,
    }
}
