use thiserror::Error;

/// Failures along the fetch -> persist -> transcribe -> summarize pipeline.
///
/// `Transcription` carries the backend's own message verbatim; the webhook
/// handler prepends its user-facing prefix, so `Display` must not decorate it.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to fetch media: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("audio file i/o failed: {0}")]
    Io(#[source] std::io::Error),

    #[error("{0}")]
    Transcription(String),

    #[error("chat completion failed: {0}")]
    Completion(String),

    #[error("unable to detect transcript language")]
    Detection,
}
