use crate::consts::{SUMMARY_TOKEN_THRESHOLD, SUMMARY_WORD_LIMIT};
use crate::error::AppError;
use crate::openai_types::{OpenAIMessage, SummaryPayload};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// The LLM boundary.  Takes a full message list, returns the first choice's
/// content.  Output is model-dependent; tests substitute a fake.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: Vec<OpenAIMessage>) -> Result<String, AppError>;
}

/// Condenses long transcripts.  Anything at or under the token threshold
/// passes through untouched.
pub struct TranscriptSummarizer {
    chat: Arc<dyn ChatCompletion>,
}

impl TranscriptSummarizer {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    pub async fn maybe_summarize(&self, transcript: &str) -> Result<String, AppError> {
        if transcript.split_whitespace().count() <= SUMMARY_TOKEN_THRESHOLD {
            return Ok(transcript.to_string());
        }
        let transcript = transcript.trim();

        let info = whatlang::detect(transcript).ok_or(AppError::Detection)?;
        let language = info.lang().eng_name();
        debug!(language, "detected transcript language");

        let prompt = format!(
            "Summarize the following text in no more than {SUMMARY_WORD_LIMIT} words, \
             keeping the summary in {language}. \
             Respond with a JSON object of the form {{\"summary\": \"...\"}}.\n\n\
             Text:\n{transcript}"
        );
        let messages = vec![
            OpenAIMessage::system("You are a helpful assistant."),
            OpenAIMessage::user(prompt),
        ];
        let content = self.chat.complete(messages).await?;

        Ok(extract_summary(&content))
    }
}

/// Pull the summary text out of a completion.  The prompt asks for a
/// fixed-shape JSON object; models that answer in prose instead sometimes
/// prefix a "Summary:" marker, in which case only the portion after the last
/// marker is kept.
fn extract_summary(content: &str) -> String {
    let content = content.trim();
    if let Ok(payload) = serde_json::from_str::<SummaryPayload>(content) {
        return payload.summary.trim().to_string();
    }
    content
        .rsplit("Summary:")
        .next()
        .unwrap_or(content)
        .trim()
        .to_string()
}
