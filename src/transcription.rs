use crate::error::AppError;
use crate::summarize::TranscriptSummarizer;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

/// The speech-to-text boundary.  Production talks to whisper; tests fake it.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe_file(&self, path: &Path) -> Result<String, AppError>;
}

/// Turns a persisted audio payload into reply text and disposes of the
/// payload.
pub struct TranscriptionService {
    stt: Arc<dyn SpeechToText>,
    summarizer: TranscriptSummarizer,
}

impl TranscriptionService {
    pub fn new(stt: Arc<dyn SpeechToText>, summarizer: TranscriptSummarizer) -> Self {
        Self { stt, summarizer }
    }

    /// Transcribe the file at `path`, condensing long transcripts.  The file
    /// is removed exactly once on every exit path; a failed removal is logged
    /// but never masks the pipeline outcome.
    pub async fn transcribe_and_summarize(&self, path: &Path) -> Result<String, AppError> {
        let outcome = self.run(path).await;
        if let Err(e) = fs::remove_file(path).await {
            warn!(path=%path.display(), error=%e, "failed to remove transient audio file");
        }
        outcome
    }

    async fn run(&self, path: &Path) -> Result<String, AppError> {
        let transcript = self.stt.transcribe_file(path).await?;
        debug!(words = transcript.split_whitespace().count(), "got transcript");
        self.summarizer.maybe_summarize(&transcript).await
    }
}
